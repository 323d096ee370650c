//! `shapecheck.json`: named symbols and validation limits.
//!
//! ```json
//! {
//!   "symbols": {
//!     "UserId": "int",
//!     "User": { "record": { "fields": { "id": "UserId", "tags": "List[str]" } } },
//!     "Tree": "Dict[str, Union[int, 'Tree']]",
//!     "Clock": { "custom": "Clock" }
//!   },
//!   "options": { "maxDepth": 128 }
//! }
//! ```

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use shapecheck_solver::{RecordDef, SymbolEnv, TypeExpr, ValidationOptions};

pub const CONFIG_FILE_NAME: &str = "shapecheck.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShapecheckConfig {
    #[serde(default)]
    pub symbols: IndexMap<String, SymbolDecl>,
    #[serde(default)]
    pub options: ValidationOptions,
}

/// A symbol binding: an expression string, a record, or a custom class.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SymbolDecl {
    Expr(String),
    Record { record: RecordDecl },
    Custom { custom: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecordDecl {
    pub fields: IndexMap<String, String>,
    #[serde(default = "default_total")]
    pub total: bool,
}

fn default_total() -> bool {
    true
}

impl SymbolDecl {
    pub fn to_type_expr(&self, name: &str) -> Result<TypeExpr> {
        match self {
            Self::Expr(source) => TypeExpr::parse(source)
                .with_context(|| format!("invalid type expression for symbol `{name}`")),
            Self::Record { record } => {
                let mut def = RecordDef::new(name).total(record.total);
                for (field, source) in &record.fields {
                    let ty = TypeExpr::parse(source)
                        .with_context(|| format!("invalid type for field `{name}.{field}`"))?;
                    def = def.field(field.clone(), ty);
                }
                Ok(def.into_expr())
            }
            Self::Custom { custom } => Ok(TypeExpr::custom(custom.clone())),
        }
    }
}

impl ShapecheckConfig {
    /// Build the symbol environment, keeping declaration order.
    pub fn symbol_env(&self) -> Result<SymbolEnv> {
        let mut env = SymbolEnv::new();
        for (name, decl) in &self.symbols {
            if !shapecheck_solver::is_identifier(name) {
                bail!("symbol name `{name}` is not an identifier");
            }
            env.define(name.clone(), decl.to_type_expr(name)?);
        }
        Ok(env)
    }
}

pub fn parse_config(source: &str) -> Result<ShapecheckConfig> {
    serde_json::from_str(source).context("failed to parse shapecheck config JSON")
}

pub fn load_config(path: &Path) -> Result<ShapecheckConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

pub(crate) fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Resolve `--config`, falling back to `shapecheck.json` in `cwd`.
pub(crate) fn resolve_config_path(cwd: &Path, config: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(config) = config else {
        return Ok(find_config(cwd));
    };

    let mut candidate = if config.is_absolute() {
        config.to_path_buf()
    } else {
        cwd.join(config)
    };
    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }
    if !candidate.is_file() {
        bail!("config not found at {}", candidate.display());
    }
    Ok(Some(candidate))
}
