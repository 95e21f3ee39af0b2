//! Property-based tests for script classification and statement splitting
//!
//! These tests verify the core invariants of the script pipeline:
//! - Classification is stable under case changes and substring position
//! - The strict/loose procedure rules differ exactly on the short form
//! - The statement splitter preserves statement counts and contents
//!   regardless of spacing, comments, and terminator switching

use proptest::prelude::*;

use dbforge::batch::split_statements;
use dbforge::classifier::{classify, ProcedureMatch, ScriptCategory};
use dbforge::rewrite::wrap_procedure_scripts;

/// Filler that can never spell out a category word.
fn arb_filler() -> impl Strategy<Value = String> {
    "[xyz0-9_]{0,12}".prop_map(|s: String| s)
}

/// Random re-capitalization of a fixed word.
fn arb_cased(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), word.len()).prop_map(move |caps| {
        word.chars()
            .zip(caps)
            .map(|(c, up)| {
                if up {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

proptest! {
    /// A name containing "domain" classifies as Domain in any case and
    /// position, under both procedure rules.
    #[test]
    fn prop_domain_substring_wins(prefix in arb_filler(), word in arb_cased("domain"), suffix in arb_filler()) {
        let name = format!("{prefix}{word}{suffix}.sql");
        prop_assert_eq!(classify(&name, ProcedureMatch::Exact), ScriptCategory::Domain);
        prop_assert_eq!(classify(&name, ProcedureMatch::Loose), ScriptCategory::Domain);
    }

    /// A name containing "table" (and no "domain") classifies as Table.
    #[test]
    fn prop_table_substring(prefix in arb_filler(), word in arb_cased("table"), suffix in arb_filler()) {
        let name = format!("{prefix}{word}{suffix}.sql");
        prop_assert_eq!(classify(&name, ProcedureMatch::Exact), ScriptCategory::Table);
    }

    /// The short "proc" form is only recognized by the loose rule; the
    /// full "procedure" form is recognized by both.
    #[test]
    fn prop_procedure_rules_differ_on_short_form(prefix in arb_filler(), suffix in arb_filler()) {
        let short = format!("{prefix}proc{suffix}.sql");
        prop_assert_eq!(classify(&short, ProcedureMatch::Loose), ScriptCategory::Procedure);

        let long = format!("{prefix}procedure{suffix}.sql");
        prop_assert_eq!(classify(&long, ProcedureMatch::Exact), ScriptCategory::Procedure);
        prop_assert_eq!(classify(&long, ProcedureMatch::Loose), ScriptCategory::Procedure);
    }

    /// A name containing none of the category substrings is Unrecognized
    /// under both rules.
    #[test]
    fn prop_unmatched_names_are_unrecognized(name in "[xyz0-9_]{1,20}") {
        let file = format!("{name}.sql");
        prop_assert_eq!(classify(&file, ProcedureMatch::Exact), ScriptCategory::Unrecognized);
        prop_assert_eq!(classify(&file, ProcedureMatch::Loose), ScriptCategory::Unrecognized);
    }

    /// Joining N generated statements with terminators and splitting again
    /// yields the same statements, whatever spacing separates them.
    #[test]
    fn prop_split_round_trips_statement_counts(
        count in 1usize..8,
        spacing in prop::sample::select(vec![" ", "\n", "\n\n", "\t\n"]),
    ) {
        let statements: Vec<String> = (0..count)
            .map(|i| format!("CREATE TABLE t{i} (id INTEGER)"))
            .collect();
        let text: String = statements
            .iter()
            .map(|s| format!("{s};{spacing}"))
            .collect();

        let block = split_statements(&text).unwrap();
        prop_assert_eq!(block.statements.clone(), statements);
    }

    /// Terminators inside string literals never split a statement.
    #[test]
    fn prop_split_ignores_terminator_in_strings(payload in "[a-z;]{0,10}") {
        let text = format!("INSERT INTO t VALUES ('{payload}');");
        let block = split_statements(&text).unwrap();
        prop_assert_eq!(block.statements.len(), 1);
        prop_assert!(block.statements[0].contains(&payload));
    }

    /// The rewriter envelope always comes back out of the splitter as one
    /// statement per input body, even with internal terminators.
    #[test]
    fn prop_envelope_round_trip(count in 1usize..5) {
        let bodies: Vec<String> = (0..count)
            .map(|i| format!("CREATE PROCEDURE p{i}\nAS\nBEGIN\n  SELECT {i};\nEND"))
            .collect();
        let blob = wrap_procedure_scripts(bodies.iter().map(|s| s.as_str()));

        let block = split_statements(&blob).unwrap();
        prop_assert_eq!(block.statements.clone(), bodies);
    }
}
