/// Script Loader Module
///
/// Scans a directory (non-recursively) for `*.sql` files, classifies each
/// by name, and loads the contents of every recognized script. Files are
/// ordered lexicographically by file name so that multi-file categories
/// execute in a stable, platform-independent order.
use crate::classifier::{classify, ProcedureMatch, ScriptCategory};
use crate::core::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A classified script with its raw SQL text. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub category: ScriptCategory,
    pub text: String,
}

/// The result of one directory scan: scripts grouped by category, in
/// lexicographic file-name order within each group.
#[derive(Debug, Default)]
pub struct ScriptSet {
    pub domains: Vec<ScriptFile>,
    pub tables: Vec<ScriptFile>,
    pub procedures: Vec<ScriptFile>,
    /// `.sql` files matching no category; reported and never executed.
    pub unrecognized: Vec<PathBuf>,
}

impl ScriptSet {
    /// Total number of scripts queued for execution.
    pub fn recognized_count(&self) -> usize {
        self.domains.len() + self.tables.len() + self.procedures.len()
    }
}

/// Scans `scripts_dir` for `*.sql` files and loads every recognized script.
///
/// Unrecognized files are collected but not read. Subdirectories are not
/// descended into. Unreadable files and non-UTF-8 contents are fatal.
pub fn scan_scripts(scripts_dir: &Path, procedure_match: ProcedureMatch) -> Result<ScriptSet> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(scripts_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_sql = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("sql"))
            .unwrap_or(false);
        if is_sql {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut set = ScriptSet::default();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let category = classify(&file_name, procedure_match);
        if category == ScriptCategory::Unrecognized {
            set.unrecognized.push(path);
            continue;
        }

        let text = fs::read_to_string(&path)?;
        let script = ScriptFile {
            path,
            category,
            text,
        };
        match category {
            ScriptCategory::Domain => set.domains.push(script),
            ScriptCategory::Table => set.tables.push(script),
            ScriptCategory::Procedure => set.procedures.push(script),
            ScriptCategory::Unrecognized => unreachable!(),
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_scan_groups_and_orders_scripts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "TABLE_B.sql", "CREATE TABLE b (id INTEGER);");
        write(dir.path(), "TABLE_A.sql", "CREATE TABLE a (id INTEGER);");
        write(dir.path(), "DOMAIN_X.sql", "CREATE DOMAIN x AS INTEGER;");
        write(dir.path(), "readme.txt", "not sql");
        write(dir.path(), "notes.sql", "-- uncategorized");

        let set = scan_scripts(dir.path(), ProcedureMatch::Exact).unwrap();
        assert_eq!(set.domains.len(), 1);
        assert_eq!(set.tables.len(), 2);
        assert_eq!(set.procedures.len(), 0);
        assert_eq!(set.unrecognized.len(), 1);
        assert_eq!(set.recognized_count(), 3);

        // Lexicographic order within the category
        assert!(set.tables[0].path.ends_with("TABLE_A.sql"));
        assert!(set.tables[1].path.ends_with("TABLE_B.sql"));

        // Contents are loaded for recognized scripts
        assert!(set.domains[0].text.contains("CREATE DOMAIN"));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        write(&sub, "TABLE_HIDDEN.sql", "CREATE TABLE hidden (id INTEGER);");
        write(dir.path(), "TABLE_TOP.sql", "CREATE TABLE top (id INTEGER);");

        let set = scan_scripts(dir.path(), ProcedureMatch::Exact).unwrap();
        assert_eq!(set.tables.len(), 1);
        assert!(set.tables[0].path.ends_with("TABLE_TOP.sql"));
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir");
        assert!(scan_scripts(&missing, ProcedureMatch::Exact).is_err());
    }

    #[test]
    fn test_procedure_match_mode_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "myproc.sql", "CREATE PROCEDURE p\nBEGIN END");

        let strict = scan_scripts(dir.path(), ProcedureMatch::Exact).unwrap();
        assert_eq!(strict.procedures.len(), 0);
        assert_eq!(strict.unrecognized.len(), 1);

        let loose = scan_scripts(dir.path(), ProcedureMatch::Loose).unwrap();
        assert_eq!(loose.procedures.len(), 1);
        assert_eq!(loose.unrecognized.len(), 0);
    }
}
