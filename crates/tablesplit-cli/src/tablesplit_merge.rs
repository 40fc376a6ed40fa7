//! Table merge CLI
//!
//! Usage: tablesplit_merge <directory> <name>
//!
//! The output is written to `<name>.xlsx` or `<name>.csv`, following the
//! extension of the last file in the directory (by file name).
//!
//! Example: tablesplit_merge ./orders orders_all

use std::env;
use std::io::{self, Write};
use std::time::Instant;
use tablesplit::{MergeRequest, TableError, init_logging, merge_tables_with_progress};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() != 3 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: {} <directory> <name>", args[0]);
        eprintln!("  <directory>  Folder of same-shaped .xlsx or .csv tables");
        eprintln!("  <name>       Output file name without extension");
        std::process::exit(1);
    }

    let request = MergeRequest::new(args[1].clone(), args[2].clone());

    println!("Merging tables in {}...", request.source_dir);

    let start = Instant::now();

    let progress_callback = |current: usize, total: usize| {
        print!("\r[Merge] Loaded {}/{} files", current, total);
        io::stdout().flush().ok();
    };

    let report = match merge_tables_with_progress(&request, progress_callback) {
        Ok(r) => r,
        Err(e) => {
            println!();
            match e {
                TableError::PathNotFound(path) => {
                    eprintln!("Error: The specified path was not found: {}", path.display())
                }
                other => eprintln!("Error: {}", other),
            }
            std::process::exit(1);
        }
    };

    println!();
    println!(
        "Merged {} rows from {} files into {}",
        report.table.len(),
        report.sources.len(),
        report.output_path.display()
    );
    println!("Done! Total time: {:.2} seconds", start.elapsed().as_secs_f64());
}
