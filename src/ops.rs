/// Orchestrator Module
///
/// Sequences the classifier, loader, rewriter, batch executor and
/// reflector into the three public operations. Category ordering is fixed:
/// domain scripts run first, then table scripts, then one concatenated
/// procedure blob. Build executes autonomously (each statement commits as
/// it runs, a mid-sequence failure leaves partial state); update runs the
/// whole sequence inside a single transaction that rolls back on any
/// failure; export only reads.
use crate::batch::BatchExecutor;
use crate::classifier::ProcedureMatch;
use crate::config::Config;
use crate::core::db::connection::{create_database, open_database};
use crate::core::Result;
use crate::events::{Event, Reporter};
use crate::reflect::{
    process_procedure_row, reflect_domains, reflect_procedures, reflect_tables, render_domain,
    render_table, RowOutcome,
};
use crate::rewrite::wrap_procedure_scripts;
use crate::scripts::{scan_scripts, ScriptSet};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Counters produced by one export run. Skipped rows count as visited,
/// never as exported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub domains: usize,
    pub tables: usize,
    pub procedures_visited: usize,
    pub procedures_exported: usize,
}

/// Builds a brand-new database under `db_dir` from the scripts directory.
///
/// The database file path is deterministic: `<db_dir>/<database_file>`
/// from the configuration, `database.db` by default. No transaction wraps
/// the run; a failure part-way leaves the partially built file in place
/// and propagates.
pub fn build_database(
    db_dir: &Path,
    scripts_dir: &Path,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    let (conn, db_path) = create_database(db_dir, config.database_file(), &config.sqlite())?;
    info!(path = %db_path.display(), "created database");
    reporter.report(Event::DatabaseCreated {
        path: db_path.clone(),
    });

    let set = scan_scripts(scripts_dir, ProcedureMatch::Exact)?;
    report_scan(&set, reporter);
    run_script_sequence(&conn, &set, reporter)?;
    Ok(db_path)
}

/// Replays the scripts directory against an existing database inside one
/// transaction. Any failure rolls the whole sequence back, leaving the
/// target unchanged.
pub fn update_database(
    connection_string: &str,
    scripts_dir: &Path,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<()> {
    let mut conn = open_database(connection_string, &config.sqlite())?;

    let set = scan_scripts(scripts_dir, ProcedureMatch::Loose)?;
    report_scan(&set, reporter);

    // The transaction is a scoped value: commit is explicit, and every
    // early return below rolls back on drop.
    let tx = conn.transaction()?;
    run_script_sequence(&tx, &set, reporter)?;
    tx.commit()?;
    Ok(())
}

/// Reverse-engineers the database schema into one file per object under
/// `output_dir` (created if absent). Reflection never modifies the
/// database; a malformed procedure row is skipped, not fatal.
pub fn export_scripts(
    connection_string: &str,
    output_dir: &Path,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<ExportSummary> {
    let conn = open_database(connection_string, &config.sqlite())?;
    fs::create_dir_all(output_dir)?;

    let mut summary = ExportSummary::default();

    for domain in reflect_domains(&conn)? {
        let object = render_domain(&domain);
        fs::write(output_dir.join(&object.file_name), &object.content)?;
        reporter.report(Event::ObjectExported {
            kind: object.kind,
            name: object.name,
        });
        summary.domains += 1;
    }

    for table in reflect_tables(&conn)? {
        let object = render_table(&table);
        fs::write(output_dir.join(&object.file_name), &object.content)?;
        reporter.report(Event::ObjectExported {
            kind: object.kind,
            name: object.name,
        });
        summary.tables += 1;
    }

    for row in reflect_procedures(&conn)? {
        summary.procedures_visited += 1;
        match process_procedure_row(&row) {
            RowOutcome::Rendered(object) => {
                // Per-row processing is recoverable end to end: a failed
                // write skips this routine, not the rest of the export.
                match fs::write(output_dir.join(&object.file_name), &object.content) {
                    Ok(()) => {
                        reporter.report(Event::ObjectExported {
                            kind: object.kind,
                            name: object.name,
                        });
                        summary.procedures_exported += 1;
                    }
                    Err(error) => {
                        warn!(procedure = %object.name, %error, "failed to write routine file");
                        reporter.report(Event::RowSkipped {
                            kind: object.kind,
                            name: object.name,
                            reason: error.to_string(),
                        });
                    }
                }
            }
            RowOutcome::Skipped { name, reason } => {
                warn!(procedure = %name, %reason, "skipping routine row");
                reporter.report(Event::RowSkipped {
                    kind: crate::reflect::ObjectKind::Procedure,
                    name,
                    reason,
                });
            }
        }
    }
    reporter.report(Event::ProcedureExportFinished {
        visited: summary.procedures_visited,
        exported: summary.procedures_exported,
    });

    Ok(summary)
}

/// Emits classification events for one scanned directory.
fn report_scan(set: &ScriptSet, reporter: &dyn Reporter) {
    for script in set
        .domains
        .iter()
        .chain(set.tables.iter())
        .chain(set.procedures.iter())
    {
        reporter.report(Event::ScriptQueued {
            path: script.path.clone(),
            category: script.category,
        });
    }
    for path in &set.unrecognized {
        info!(path = %path.display(), "unrecognized script type");
        reporter.report(Event::ScriptSkipped { path: path.clone() });
    }
}

/// Executes one scanned script set in category order: every domain script
/// as its own batch, every table script as its own batch, then all
/// procedure scripts concatenated through the rewriter as one blob.
fn run_script_sequence(conn: &Connection, set: &ScriptSet, reporter: &dyn Reporter) -> Result<()> {
    let executor = BatchExecutor::new(conn);

    for script in set.domains.iter().chain(set.tables.iter()) {
        reporter.report(Event::ScriptExecuting {
            path: script.path.clone(),
        });
        executor.execute(&script.text)?;
    }

    if !set.procedures.is_empty() {
        for script in &set.procedures {
            reporter.report(Event::ScriptExecuting {
                path: script.path.clone(),
            });
        }
        let blob = wrap_procedure_scripts(set.procedures.iter().map(|s| s.text.as_str()));
        executor.execute(&blob)?;
    }
    Ok(())
}
