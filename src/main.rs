use std::path::Path;

use dbforge::config::load_default_config;
use dbforge::core::{ForgeError, Result};
use dbforge::events::{Event, Reporter};
use dbforge::ops;
use tracing::info;

/// Reporter that prints operation progress to standard output.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, event: Event) {
        match event {
            Event::DatabaseCreated { path } => {
                println!("Created database {}", path.display());
            }
            Event::ScriptQueued { path, category } => {
                println!("{} queued as {:?} script", path.display(), category);
            }
            Event::ScriptSkipped { path } => {
                println!("Unrecognized script type: {}", path.display());
            }
            Event::ScriptExecuting { path } => {
                println!("Executing {}", path.display());
            }
            Event::ObjectExported { kind, name } => {
                println!("Exported {:?} {}", kind, name);
            }
            Event::RowSkipped { name, reason, .. } => {
                println!("Skipping {} ({})", name, reason);
            }
            Event::ProcedureExportFinished { visited, exported } => {
                println!("Procedures visited: {}, exported: {}", visited, exported);
            }
        }
    }
}

fn print_usage() {
    println!("Usage:");
    println!("  build-db --db-dir <path> --scripts-dir <path>");
    println!("  export-scripts --connection-string <connStr> --output-dir <path>");
    println!("  update-db --connection-string <connStr> --scripts-dir <path>");
}

/// Reads the value following a `--flag`. Every flag is required and takes
/// exactly one value.
fn get_arg_value(args: &[String], name: &str) -> Result<String> {
    match args.iter().position(|a| a == name) {
        Some(idx) if idx + 1 < args.len() => Ok(args[idx + 1].clone()),
        _ => Err(ForgeError::Argument(format!(
            "missing required parameter {name}"
        ))),
    }
}

fn run(args: &[String]) -> Result<String> {
    let command = args[0].to_lowercase();
    let reporter = ConsoleReporter;

    match command.as_str() {
        "build-db" => {
            let db_dir = get_arg_value(args, "--db-dir")?;
            let scripts_dir = get_arg_value(args, "--scripts-dir")?;
            let config = load_default_config()?;
            ops::build_database(
                Path::new(&db_dir),
                Path::new(&scripts_dir),
                &config,
                &reporter,
            )?;
            Ok("Database built successfully.".to_string())
        }
        "export-scripts" => {
            let connection_string = get_arg_value(args, "--connection-string")?;
            let output_dir = get_arg_value(args, "--output-dir")?;
            let config = load_default_config()?;
            ops::export_scripts(
                &connection_string,
                Path::new(&output_dir),
                &config,
                &reporter,
            )?;
            Ok("Scripts exported successfully.".to_string())
        }
        "update-db" => {
            let connection_string = get_arg_value(args, "--connection-string")?;
            let scripts_dir = get_arg_value(args, "--scripts-dir")?;
            let config = load_default_config()?;
            ops::update_database(
                &connection_string,
                Path::new(&scripts_dir),
                &config,
                &reporter,
            )?;
            Ok("Database updated successfully.".to_string())
        }
        _ => Err(ForgeError::Argument(format!("unknown command: {command}"))),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    info!(command = %args[0], "starting dbforge");

    match run(&args) {
        Ok(message) => {
            println!("{message}");
        }
        Err(ForgeError::Argument(message)) => {
            println!("Error: {message}");
            std::process::exit(1);
        }
        Err(error) => {
            println!("Error: {error}");
            std::process::exit(-1);
        }
    }
}
