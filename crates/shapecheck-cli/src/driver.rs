use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use shapecheck_solver::{
    ArrayKind, Descriptor, DiagnosticTracer, Mismatch, SymbolEnv, TypeError, TypeExpr,
    ValidationOptions, Validator, Value, extract, normalize,
};

use crate::args::{CheckArgs, DescribeArgs};
use crate::config::{load_config, resolve_config_path};

/// Result of `shapecheck check`.
#[derive(Debug, PartialEq)]
pub enum CheckOutcome {
    Conforms,
    /// The value does not conform; carries the first mismatch when
    /// `--explain` was given.
    Mismatch(Option<Mismatch>),
    /// The type expression itself is malformed.
    TypeError { expr: String, error: TypeError },
}

/// Result of `shapecheck describe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub expr: String,
    pub heads: Vec<String>,
    pub subtypes: Vec<String>,
    pub descriptor: String,
}

struct Project {
    env: SymbolEnv,
    options: ValidationOptions,
}

fn load_project(cwd: &Path, config: Option<&Path>) -> Result<Project> {
    let Some(path) = resolve_config_path(cwd, config)? else {
        debug!("no config found, using an empty symbol environment");
        return Ok(Project {
            env: SymbolEnv::new(),
            options: ValidationOptions::default(),
        });
    };

    info!(config = %path.display(), "loading config");
    let config = load_config(&path)?;
    let env = config
        .symbol_env()
        .with_context(|| format!("invalid symbols in {}", path.display()))?;
    debug!(symbols = env.len(), "symbol environment ready");
    Ok(Project {
        env,
        options: config.options,
    })
}

pub fn run_check(args: &CheckArgs, cwd: &Path) -> Result<CheckOutcome> {
    let project = load_project(cwd, args.config.as_deref())?;
    let value = read_value(args, cwd)?;

    let expr = match TypeExpr::parse(&args.type_expr) {
        Ok(expr) => expr,
        Err(error) => return Ok(type_error(&args.type_expr, error)),
    };

    let verdict = if args.explain {
        let mut validator = Validator::with_tracer(&project.env, DiagnosticTracer::new())
            .with_options(project.options);
        validator
            .conforms(&value, &expr)
            .map(|ok| (ok, validator.into_tracer().into_mismatch()))
    } else {
        Validator::new(&project.env)
            .with_options(project.options)
            .conforms(&value, &expr)
            .map(|ok| (ok, None))
    };

    Ok(match verdict {
        Ok((true, _)) => CheckOutcome::Conforms,
        Ok((false, mismatch)) => CheckOutcome::Mismatch(mismatch),
        Err(error) => type_error(&args.type_expr, error),
    })
}

fn type_error(expr: &str, error: TypeError) -> CheckOutcome {
    debug!(expr, kind = %error.kind(), "type expression rejected");
    CheckOutcome::TypeError {
        expr: expr.to_string(),
        error,
    }
}

/// Describe an expression. Malformed expressions come back as the error.
pub fn run_describe(
    args: &DescribeArgs,
    cwd: &Path,
) -> Result<std::result::Result<Description, TypeError>> {
    let project = load_project(cwd, args.config.as_deref())?;
    Ok(describe(&args.type_expr, &project.env))
}

pub fn describe(source: &str, env: &SymbolEnv) -> std::result::Result<Description, TypeError> {
    let expr = TypeExpr::parse(source)?;
    let heads = normalize(&expr, env)?;
    let subtypes = extract(&expr, &heads, env)?;
    let descriptor = Descriptor::build(&expr, env)?;

    Ok(Description {
        expr: expr.to_string(),
        heads: heads.iter().map(ToString::to_string).collect(),
        subtypes: subtypes.iter().map(ToString::to_string).collect(),
        descriptor: descriptor.to_string(),
    })
}

fn read_value(args: &CheckArgs, cwd: &Path) -> Result<Value> {
    let source = match (&args.value, &args.value_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read value from stdin")?;
            buffer
        }
        (None, Some(path)) => {
            let path = resolve_path(cwd, path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read value file: {}", path.display()))?
        }
        (None, None) => anyhow::bail!("no value given: pass --value or --value-file"),
    };
    parse_value(&source, args.array_kind.into())
}

pub fn parse_value(source: &str, arrays: ArrayKind) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(source).context("value is not valid JSON")?;
    Ok(Value::from_json_with(json, arrays))
}

fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
