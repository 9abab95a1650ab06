//! Gridcalc - a formula-driven spreadsheet on the command line

mod config;
mod error;

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gridcalc_core::{CellValue, Document, Formula, Spreadsheet};

use error::ArgsError;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.grd)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <NAME=CONTENT>  Set a cell (can be repeated)");
    eprintln!("  -g, --get <NAME>          Print the value of a cell (can be repeated)");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against the sheet");
    eprintln!("  -d, --dump                Print every non-empty cell");
    eprintln!("  -o, --output <FILE>       Save the sheet after edits");
    eprintln!("  --config <FILE>           Read settings from a TOML file");
    eprintln!("  --no-config               Ignore the user config.toml");
    eprintln!("  -v, --verbose             Print progress to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Get(String),
    Command(String),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    file: Option<PathBuf>,
    edits: Vec<(String, String)>,
    queries: Vec<Query>,
    dump: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

/// Parse the arguments after the program name. `None` means help was asked for.
fn parse_args(args: &[String]) -> std::result::Result<Option<Options>, ArgsError> {
    let mut opts = Options::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i).cloned().ok_or_else(|| ArgsError::MissingValue(arg.to_string()))
        };
        match arg {
            "-h" | "--help" => return Ok(None),
            "-s" | "--set" => {
                let edit = value()?;
                let Some((name, contents)) = edit.split_once('=') else {
                    return Err(ArgsError::InvalidEdit(edit));
                };
                opts.edits.push((name.trim().to_string(), contents.to_string()));
            }
            "-g" | "--get" => opts.queries.push(Query::Get(value()?)),
            "-c" | "--command" => opts.queries.push(Query::Command(value()?)),
            "-o" | "--output" => opts.output = Some(PathBuf::from(value()?)),
            "--config" => opts.config = Some(PathBuf::from(value()?)),
            "-d" | "--dump" => opts.dump = true,
            "--no-config" => opts.no_config = true,
            "-v" | "--verbose" => opts.verbose = true,
            arg if arg.starts_with('-') => return Err(ArgsError::UnknownOption(arg.to_string())),
            arg => {
                if opts.file.is_some() {
                    return Err(ArgsError::UnexpectedArgument(arg.to_string()));
                }
                opts.file = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(Some(opts))
}

/// Evaluate a free-standing formula, looking its variables up in `sheet`.
fn evaluate_command(sheet: &mut dyn Spreadsheet, formula: &str) -> Result<CellValue> {
    let formula = formula.trim();
    let formula = formula.strip_prefix('=').unwrap_or(formula);
    let formula = Formula::parse(formula).with_context(|| format!("invalid formula '{}'", formula))?;
    let result = formula.evaluate(|name| sheet.value(name).ok().and_then(|v| v.as_number()));
    Ok(match result {
        Ok(n) => CellValue::Number(n),
        Err(e) => CellValue::Error(e),
    })
}

fn apply_edits(sheet: &mut dyn Spreadsheet, edits: &[(String, String)], verbose: bool) -> Result<()> {
    for (name, contents) in edits {
        let affected = sheet
            .set_contents(name, contents)
            .with_context(|| format!("cannot set {}", name))?;
        if verbose {
            eprintln!("Set {} (affects: {})", name, affected.join(", "));
        }
    }
    Ok(())
}

/// Print each answer; returns false if any of them is an error value.
fn answer_queries(sheet: &mut dyn Spreadsheet, queries: &[Query]) -> Result<bool> {
    let mut all_ok = true;
    for query in queries {
        let value = match query {
            Query::Get(name) => sheet.value(name).with_context(|| format!("cannot read {}", name))?,
            Query::Command(formula) => evaluate_command(sheet, formula)?,
        };
        all_ok &= !value.is_error();
        println!("{}", value);
    }
    Ok(all_ok)
}

fn dump(sheet: &mut dyn Spreadsheet) -> Result<()> {
    for name in sheet.names_of_nonempty() {
        let contents = sheet
            .contents(&name)?
            .map(|c| c.to_input_string())
            .unwrap_or_default();
        let value = sheet.value(&name)?;
        println!("{}: {} => {}", name, contents, value);
    }
    Ok(())
}

fn run(opts: Options) -> Result<bool> {
    let config = config::load_config(opts.config.as_deref(), !opts.no_config)
        .context("failed to load configuration")?;

    let mut doc = match &opts.file {
        Some(path) => {
            let doc = Document::load(path, config)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if opts.verbose {
                eprintln!("Loaded {} (version {})", path.display(), doc.version());
            }
            doc
        }
        None => Document::with_config(config),
    };

    apply_edits(&mut doc, &opts.edits, opts.verbose)?;
    let all_ok = answer_queries(&mut doc, &opts.queries)?;
    if opts.dump {
        dump(&mut doc)?;
    }

    if let Some(output) = &opts.output {
        let file = File::create(output).with_context(|| format!("cannot create {}", output.display()))?;
        let mut writer = BufWriter::new(file);
        Spreadsheet::save(&mut doc, &mut writer)
            .with_context(|| format!("failed to save {}", output.display()))?;
        if opts.verbose {
            eprintln!("Saved to {}", output.display());
        }
    } else if opts.verbose && doc.is_modified() {
        eprintln!("Edits not saved (use --output)");
    }

    Ok(all_ok)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match run(opts) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
