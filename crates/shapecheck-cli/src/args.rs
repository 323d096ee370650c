use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use shapecheck_solver::ArrayKind;

/// CLI arguments for the shapecheck binary.
#[derive(Parser, Debug)]
#[command(
    name = "shapecheck",
    version,
    about = "Check JSON values against structural type expressions"
)]
pub struct CliArgs {
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a value against a type expression.
    Check(CheckArgs),
    /// Print the normalized heads and subtype slots of a type expression.
    Describe(DescribeArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Type expression, e.g. `Dict[str, List[int]]`.
    #[arg(short = 't', long = "type")]
    pub type_expr: String,

    /// The value to check, as inline JSON.
    #[arg(long, conflicts_with = "value_file", required_unless_present = "value_file")]
    pub value: Option<String>,

    /// Read the value from a JSON file (`-` for stdin).
    #[arg(long)]
    pub value_file: Option<PathBuf>,

    /// Path to shapecheck.json or a directory containing it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// How JSON arrays are read.
    #[arg(long, value_enum, default_value_t = ArrayKindArg::List)]
    pub array_kind: ArrayKindArg,

    /// On mismatch, report where the value stops conforming.
    #[arg(long)]
    pub explain: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Type expression to describe.
    #[arg(short = 't', long = "type")]
    pub type_expr: String,

    /// Path to shapecheck.json or a directory containing it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Emit the description as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ArrayKindArg {
    List,
    Tuple,
    Set,
}

impl From<ArrayKindArg> for ArrayKind {
    fn from(arg: ArrayKindArg) -> Self {
        match arg {
            ArrayKindArg::List => Self::List,
            ArrayKindArg::Tuple => Self::Tuple,
            ArrayKindArg::Set => Self::Set,
        }
    }
}
