//! `boolex`: evaluate boolean expressions from the command line.
//!
//! ```bash
//! boolex eval "true & false | true" "!(true & false)"
//! boolex tree "true | false & !false"
//! boolex check suites/precedence.yaml --format json
//! ```
//!
//! Exit code is 1 when any expression is rejected or any suite case fails.
//! Logging goes to stderr and honours `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use boolex_core::{Evaluator, Expectation, Expression, Suite, SuiteReport, ValidationError};

#[derive(Parser, Debug)]
#[command(name = "boolex", version, about = "Validate and evaluate boolean expressions")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one or more expressions
    Eval {
        #[arg(required = true, value_name = "EXPR")]
        expressions: Vec<String>,
    },

    /// Print the canonical form of an expression's tree
    Tree {
        #[arg(value_name = "EXPR")]
        expression: String,
    },

    /// Run a YAML or JSON suite file
    Check {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct EvalRecord<'a> {
    expression: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ValidationError>,
}

#[derive(Serialize)]
struct TreeRecord<'a> {
    expression: &'a str,
    canonical: String,
    value: bool,
    depth: usize,
    tree: &'a Expression,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let evaluator = Evaluator::new();
    let success = match &cli.command {
        Command::Eval { expressions } => {
            let mut all_accepted = true;
            for expression in expressions {
                let result = evaluator.evaluate(expression);
                all_accepted &= result.is_ok();
                println!("{}", render_eval(expression, result, cli.format)?);
            }
            all_accepted
        }
        Command::Tree { expression } => match evaluator.parse(expression) {
            Ok(tree) => {
                println!("{}", render_tree(expression, &tree, cli.format)?);
                true
            }
            Err(error) => {
                println!("{}", render_eval(expression, Err(error), cli.format)?);
                false
            }
        },
        Command::Check { path } => {
            let report = run_suite(&evaluator, path)?;
            println!("{}", render_report(&report, cli.format)?);
            report.is_success()
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_suite(evaluator: &Evaluator, path: &Path) -> Result<SuiteReport> {
    let suite = Suite::from_path(path)
        .with_context(|| format!("Failed to load suite {}", path.display()))?;
    tracing::debug!(suite = %suite.name, cases = suite.cases.len(), "Suite loaded");
    Ok(suite.run(evaluator))
}

fn render_eval(
    expression: &str,
    result: Result<bool, ValidationError>,
    format: Format,
) -> Result<String> {
    match format {
        Format::Text => Ok(match result {
            Ok(value) => format!("{expression} = {value}"),
            Err(error) => format!("Syntax error in '{expression}' - {error}"),
        }),
        Format::Json => {
            let record = EvalRecord {
                expression,
                value: result.ok(),
                error: result.err(),
            };
            Ok(serde_json::to_string(&record)?)
        }
    }
}

fn render_tree(expression: &str, tree: &Expression, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(format!(
            "{tree}\nnodes: {}, depth: {}, value: {}",
            tree.node_count(),
            tree.depth(),
            tree.eval()
        )),
        Format::Json => {
            let record = TreeRecord {
                expression,
                canonical: tree.to_string(),
                value: tree.eval(),
                depth: tree.depth(),
                tree,
            };
            Ok(serde_json::to_string_pretty(&record)?)
        }
    }
}

fn render_report(report: &SuiteReport, format: Format) -> Result<String> {
    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|outcome| {
            if outcome.passed {
                format!("PASS {}: {}", outcome.id, outcome.expression)
            } else {
                format!(
                    "FAIL {}: {} (expected {}, got {})",
                    outcome.id,
                    outcome.expression,
                    describe(&outcome.expected),
                    describe(&outcome.actual)
                )
            }
        })
        .collect();
    lines.push(format!(
        "{}: {} passed, {} failed",
        report.suite, report.passed, report.failed
    ));
    Ok(lines.join("\n"))
}

fn describe(expectation: &Expectation) -> String {
    match expectation {
        Expectation::Value(value) => value.to_string(),
        Expectation::Error(error) => error.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eval_args() {
        let cli = Cli::try_parse_from(["boolex", "eval", "true & false", "!true"]).unwrap();
        assert_eq!(cli.format, Format::Text);
        assert!(!cli.verbose);
        match cli.command {
            Command::Eval { expressions } => assert_eq!(expressions, ["true & false", "!true"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["boolex", "check", "cases.yaml", "--format", "json", "-v"])
            .unwrap();
        assert_eq!(cli.format, Format::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_eval_requires_expression() {
        assert!(Cli::try_parse_from(["boolex", "eval"]).is_err());
    }

    #[test]
    fn test_render_eval_text() {
        assert_eq!(
            render_eval("true | false", Ok(true), Format::Text).unwrap(),
            "true | false = true"
        );
        assert_eq!(
            render_eval("true $", Err(ValidationError::InvalidCharacters), Format::Text).unwrap(),
            "Syntax error in 'true $' - Invalid character(s) found in expression"
        );
    }

    #[test]
    fn test_render_eval_json() {
        assert_eq!(
            render_eval("true", Ok(true), Format::Json).unwrap(),
            r#"{"expression":"true","value":true}"#
        );
        assert_eq!(
            render_eval("(true", Err(ValidationError::MismatchedParentheses), Format::Json)
                .unwrap(),
            r#"{"expression":"(true","error":"mismatched_parentheses"}"#
        );
    }

    #[test]
    fn test_render_tree_text() {
        let evaluator = Evaluator::new();
        let tree = evaluator.parse("true | false & !false").unwrap();
        assert_eq!(
            render_tree("true | false & !false", &tree, Format::Text).unwrap(),
            "(true | (false & !false))\nnodes: 6, depth: 4, value: true"
        );
    }

    #[test]
    fn test_render_report_text() {
        let suite = Suite::from_yaml(
            r#"
name: "Demo"
cases:
  - id: "D1"
    expression: "true"
    expect: true
  - id: "D2"
    expression: "trrue"
    expect: false
"#,
        )
        .unwrap();
        let report = suite.run(&Evaluator::new());

        assert_eq!(
            render_report(&report, Format::Text).unwrap(),
            "PASS D1: true\nFAIL D2: trrue (expected false, got invalid_syntax)\nDemo: 1 passed, 1 failed"
        );
    }
}
