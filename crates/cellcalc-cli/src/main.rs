//! cellcalc CLI
//!
//! Evaluate and inspect spreadsheet formulas from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cellcalc::prelude::*;
use cellcalc::{parse_formula, tokenize};
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(author, version, about = "Evaluate spreadsheet formulas", long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one or more formulas
    Eval {
        /// Formulas to evaluate, with or without a leading '='
        #[arg(required = true)]
        formulas: Vec<String>,

        /// Set a cell before evaluating (e.g. A1=10, B2=hello, C3=TRUE)
        #[arg(short, long = "cell", value_name = "ADDR=VALUE")]
        cells: Vec<String>,

        /// Load cells from a JSON object keyed by address
        #[arg(long = "cells", value_name = "FILE")]
        cells_file: Option<PathBuf>,

        /// Treat references to unset cells as empty instead of #REF!
        #[arg(long)]
        missing_as_empty: bool,
    },

    /// Print the tokens of a formula
    Tokens {
        /// Formula to tokenize
        formula: String,
    },

    /// Print the parsed syntax tree of a formula
    #[command(alias = "parse")]
    Ast {
        /// Formula to parse
        formula: String,
    },

    /// List the built-in functions
    Functions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Eval {
            formulas,
            cells,
            cells_file,
            missing_as_empty,
        } => {
            let policy = if missing_as_empty {
                MissingCellPolicy::Empty
            } else {
                MissingCellPolicy::RefError
            };
            let mut calc = CalcEngine::with_options(EvaluationOptions::new().missing_cell(policy));

            if let Some(path) = cells_file {
                load_cells_file(&mut calc, &path)?;
            }
            for assignment in &cells {
                let (address, value) = parse_assignment(assignment)?;
                calc.set_value(&address, value);
            }
            log::debug!("evaluating against {} cells", calc.sheet().len());

            for formula in &formulas {
                let value = calc
                    .evaluate(formula)
                    .with_context(|| format!("Failed to evaluate: {}", formula))?;
                if formulas.len() > 1 {
                    println!("{}\t{}", formula, value);
                } else {
                    println!("{}", value);
                }
            }
        }

        Commands::Tokens { formula } => {
            let text = formula.trim();
            let text = text.strip_prefix('=').unwrap_or(text);
            let tokens =
                tokenize(text).with_context(|| format!("Failed to tokenize: {}", formula))?;
            for token in tokens {
                println!("{:>4}  {:<16} {}", token.position, token.kind.describe(), token.text);
            }
        }

        Commands::Ast { formula } => {
            let ast =
                parse_formula(&formula).with_context(|| format!("Failed to parse: {}", formula))?;
            println!("{}", ast);
            println!("{:#?}", ast);
        }

        Commands::Functions => {
            let calc = CalcEngine::new();
            for name in calc.engine().registry().names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Split `ADDR=VALUE` and interpret the value
fn parse_assignment(assignment: &str) -> Result<(String, CellValue)> {
    let Some((address, raw)) = assignment.split_once('=') else {
        bail!("Expected ADDR=VALUE, got '{}'", assignment);
    };
    let address = address.trim();
    CellAddress::parse(address).with_context(|| format!("Invalid cell address: {}", address))?;
    Ok((address.to_string(), parse_cell_value(raw)))
}

/// Interpret a command-line cell value
///
/// Numbers, `TRUE`/`FALSE` and error codes get their own types; a value wrapped
/// in double quotes is always text.
fn parse_cell_value(raw: &str) -> CellValue {
    if let Some(quoted) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return CellValue::string(quoted);
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return CellValue::Number(n);
        }
    }
    if trimmed.eq_ignore_ascii_case("TRUE") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("FALSE") {
        return CellValue::Boolean(false);
    }
    if let Some(err) = CellError::from_code(trimmed) {
        return CellValue::Error(err);
    }
    CellValue::string(raw)
}

fn load_cells_file(calc: &mut CalcEngine, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cells file: {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse cells file: {}", path.display()))?;

    let serde_json::Value::Object(entries) = json else {
        bail!("Cells file must contain a JSON object: {}", path.display());
    };

    for (address, value) in entries {
        CellAddress::parse(&address)
            .with_context(|| format!("Invalid cell address in {}: {}", path.display(), address))?;
        calc.set_value(&address, json_to_cell_value(&value)?);
    }
    log::info!("loaded cells from {}", path.display());
    Ok(())
}

fn json_to_cell_value(value: &serde_json::Value) -> Result<CellValue> {
    Ok(match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(n) => CellValue::Number(n),
            None => bail!("Number out of range: {}", n),
        },
        serde_json::Value::String(s) => match CellError::from_code(s) {
            Some(err) => CellValue::Error(err),
            None => CellValue::string(s.as_str()),
        },
        other => bail!("Unsupported cell value: {}", other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value("10"), CellValue::Number(10.0));
        assert_eq!(parse_cell_value(" 2.5 "), CellValue::Number(2.5));
        assert_eq!(parse_cell_value("true"), CellValue::Boolean(true));
        assert_eq!(parse_cell_value("#N/A"), CellValue::Error(CellError::Na));
        assert_eq!(parse_cell_value("\"10\""), CellValue::string("10"));
        assert_eq!(parse_cell_value("hello"), CellValue::string("hello"));
        assert_eq!(parse_cell_value("inf"), CellValue::string("inf"));
        assert_eq!(parse_cell_value(""), CellValue::Empty);
    }

    #[test]
    fn test_parse_assignment() {
        let (address, value) = parse_assignment("b2=x=y").unwrap();
        assert_eq!(address, "b2");
        assert_eq!(value, CellValue::string("x=y"));

        assert!(parse_assignment("A1").is_err());
        assert!(parse_assignment("1A=3").is_err());
    }

    #[test]
    fn test_json_to_cell_value() {
        let json: serde_json::Value =
            serde_json::from_str(r##"[1.5, "abc", false, null, "#DIV/0!", [1]]"##).unwrap();
        let items = json.as_array().unwrap();

        assert_eq!(json_to_cell_value(&items[0]).unwrap(), CellValue::Number(1.5));
        assert_eq!(json_to_cell_value(&items[1]).unwrap(), CellValue::string("abc"));
        assert_eq!(json_to_cell_value(&items[2]).unwrap(), CellValue::Boolean(false));
        assert_eq!(json_to_cell_value(&items[3]).unwrap(), CellValue::Empty);
        assert_eq!(
            json_to_cell_value(&items[4]).unwrap(),
            CellValue::Error(CellError::Div0)
        );
        assert!(json_to_cell_value(&items[5]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
