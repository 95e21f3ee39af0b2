/// Script Classifier Module
///
/// Assigns a script file to one of three ordered categories based on its
/// file name. Classification is a pure string operation: case-insensitive
/// substring matching with a fixed precedence of domain, then table, then
/// procedure. A name matching none of the three is Unrecognized; such files
/// are reported and skipped, never executed.

/// Classification bucket for a script file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCategory {
    Domain,
    Table,
    Procedure,
    Unrecognized,
}

/// Which substring counts as a procedure script.
///
/// Build matches the full word "procedure"; update also accepts the short
/// "proc". The asymmetry is long-standing behavior kept for compatibility
/// between existing script directories and the two operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureMatch {
    /// Only names containing "procedure" (build mode)
    Exact,
    /// Any name containing "proc" (update mode)
    Loose,
}

/// Classifies a script file name.
///
/// Matching is case-insensitive and positional: the first rule that matches
/// wins, in the fixed order domain, table, procedure.
pub fn classify(file_name: &str, procedure_match: ProcedureMatch) -> ScriptCategory {
    let name = file_name.to_lowercase();
    if name.contains("domain") {
        ScriptCategory::Domain
    } else if name.contains("table") {
        ScriptCategory::Table
    } else if match procedure_match {
        ProcedureMatch::Exact => name.contains("procedure"),
        ProcedureMatch::Loose => name.contains("proc"),
    } {
        ScriptCategory::Procedure
    } else {
        ScriptCategory::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_basic_categories() {
        assert_eq!(
            classify("DOMAIN_STATUS.sql", ProcedureMatch::Exact),
            ScriptCategory::Domain
        );
        assert_eq!(
            classify("TABLE_ITEMS.sql", ProcedureMatch::Exact),
            ScriptCategory::Table
        );
        assert_eq!(
            classify("PROC_CALC.sql", ProcedureMatch::Loose),
            ScriptCategory::Procedure
        );
        assert_eq!(
            classify("notes.sql", ProcedureMatch::Exact),
            ScriptCategory::Unrecognized
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("my_Domain_defs.SQL", ProcedureMatch::Exact),
            ScriptCategory::Domain
        );
        assert_eq!(
            classify("CREATE_TABLES.sql", ProcedureMatch::Exact),
            ScriptCategory::Table
        );
        assert_eq!(
            classify("StoredProcedures.sql", ProcedureMatch::Exact),
            ScriptCategory::Procedure
        );
    }

    #[test]
    fn test_classify_substring_anywhere() {
        assert_eq!(
            classify("001_core_domains.sql", ProcedureMatch::Exact),
            ScriptCategory::Domain
        );
        assert_eq!(
            classify("all_tables_v2.sql", ProcedureMatch::Exact),
            ScriptCategory::Table
        );
    }

    #[test]
    fn test_classify_precedence_is_fixed() {
        // "domain" outranks "table", "table" outranks "procedure"
        assert_eq!(
            classify("domain_table.sql", ProcedureMatch::Exact),
            ScriptCategory::Domain
        );
        assert_eq!(
            classify("table_procedures.sql", ProcedureMatch::Exact),
            ScriptCategory::Table
        );
        assert_eq!(
            classify("proc_domains.sql", ProcedureMatch::Loose),
            ScriptCategory::Domain
        );
    }

    #[test]
    fn test_proc_matching_differs_between_modes() {
        // The short form is only recognized by the loose (update) rule.
        assert_eq!(
            classify("myproc.sql", ProcedureMatch::Loose),
            ScriptCategory::Procedure
        );
        assert_eq!(
            classify("myproc.sql", ProcedureMatch::Exact),
            ScriptCategory::Unrecognized
        );
        // The full word is recognized by both.
        assert_eq!(
            classify("myprocedure.sql", ProcedureMatch::Exact),
            ScriptCategory::Procedure
        );
        assert_eq!(
            classify("myprocedure.sql", ProcedureMatch::Loose),
            ScriptCategory::Procedure
        );
    }
}
