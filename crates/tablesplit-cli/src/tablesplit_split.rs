//! Table split CLI
//!
//! Usage: tablesplit_split <file> <column> [options]
//!
//! Options:
//!   --prefix <TEXT>       Text placed before the value in each file name
//!   --postfix <TEXT>      Text placed after the value in each file name
//!   --output-dir <PATH>   Directory in which the output folder is created (default: .)
//!   --help, -h            Show help
//!
//! Example: tablesplit_split orders.xlsx city --prefix 2024

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tablesplit::{LoadFailure, SplitRequest, TableError, init_logging, split_table_with_progress};

struct Args {
    source: String,
    column: String,
    prefix: String,
    postfix: String,
    output_dir: PathBuf,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <file> <column> [options]", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <file>                Table to split (.xlsx or .csv)");
    eprintln!("  <column>              Column whose values decide the output files");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --prefix <TEXT>       Text placed before the value in each file name");
    eprintln!("  --postfix <TEXT>      Text placed after the value in each file name");
    eprintln!("  --output-dir <PATH>   Directory in which the output folder is created (default: .)");
    eprintln!("  --help, -h            Show this help message");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut positional: Vec<String> = Vec::new();
    let mut prefix = String::new();
    let mut postfix = String::new();
    let mut output_dir = PathBuf::from(".");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--prefix" | "--postfix" | "--output-dir" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("Missing value for {}", args[i]))?
                    .clone();
                match args[i].as_str() {
                    "--prefix" => prefix = value,
                    "--postfix" => postfix = value,
                    _ => output_dir = PathBuf::from(value),
                }
                i += 1;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                std::process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if positional.len() == 2 {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                positional.push(arg.to_string());
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let source = positional.next().ok_or("Missing file argument")?;
    let column = positional.next().ok_or("Missing column argument")?;

    Ok(Args {
        source,
        column,
        prefix,
        postfix,
        output_dir,
    })
}

fn describe_error(err: &TableError) -> String {
    match err {
        TableError::PathNotFound(path) => {
            format!("The specified path was not found: {}", path.display())
        }
        TableError::TableLoad(LoadFailure::UnreadableExtension(ext)) => format!(
            "Table does not exist: files with extension '{}' cannot be read (use .xlsx or .csv).",
            ext
        ),
        TableError::TableLoad(LoadFailure::MissingColumn(column)) => format!(
            "Table does not exist: column '{}' was not found in the file.",
            column
        ),
        other => other.to_string(),
    }
}

fn main() {
    init_logging();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(&env::args().next().unwrap_or_default());
            std::process::exit(1);
        }
    };

    let request = SplitRequest::new(args.source, args.column)
        .with_prefix(args.prefix)
        .with_postfix(args.postfix)
        .with_output_root(args.output_dir);

    println!("Splitting {} by column '{}'...", request.source, request.column);

    let start = Instant::now();

    let progress_callback = |current: usize, total: usize| {
        let progress = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            100.0
        };
        print!(
            "\r[Split] Progress: {:.2}% ({}/{})",
            progress, current, total
        );
        io::stdout().flush().ok();
    };

    match split_table_with_progress(&request, progress_callback) {
        Ok(report) => {
            println!();
            println!("Created folder {}", report.output_dir.display());
            for output in &report.outputs {
                println!("  {} ({} rows)", output.path.display(), output.rows);
            }
            println!();
            println!(
                "Done! Wrote {} files in {:.2} seconds",
                report.outputs.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Err(failure) => {
            println!();
            eprintln!("Error: {}", describe_error(&failure.error));
            if failure.is_partial() {
                eprintln!(
                    "Note: {} file(s) were written before the error and were left in place.",
                    failure.written.len()
                );
            }
            std::process::exit(1);
        }
    }
}
