#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use shapecheck_cli::args::{CliArgs, Command};
use shapecheck_cli::driver::{self, CheckOutcome};
use shapecheck_cli::reporter::Reporter;

const EXIT_CONFORMS: i32 = 0;
const EXIT_MISMATCH: i32 = 1;
const EXIT_TYPE_ERROR: i32 = 2;
const EXIT_FAILURE: i32 = 3;

fn main() {
    // Only installs a subscriber when SHAPECHECK_LOG or RUST_LOG is set.
    shapecheck_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: &CliArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let color = !args.no_color && std::io::stdout().is_terminal();
    let reporter = Reporter::new(color);

    match &args.command {
        Command::Check(check) => {
            let outcome = driver::run_check(check, &cwd)?;
            println!("{}", reporter.render_check(&outcome));
            Ok(match outcome {
                CheckOutcome::Conforms => EXIT_CONFORMS,
                CheckOutcome::Mismatch(_) => EXIT_MISMATCH,
                CheckOutcome::TypeError { .. } => EXIT_TYPE_ERROR,
            })
        }
        Command::Describe(describe) => match driver::run_describe(describe, &cwd)? {
            Ok(description) if describe.json => {
                let json = serde_json::to_string_pretty(&description)
                    .context("failed to serialize description")?;
                println!("{json}");
                Ok(EXIT_CONFORMS)
            }
            Ok(description) => {
                println!("{}", reporter.render_description(&description));
                Ok(EXIT_CONFORMS)
            }
            Err(error) => {
                println!("{}", reporter.format_type_error(&describe.type_expr, &error));
                Ok(EXIT_TYPE_ERROR)
            }
        },
    }
}
