/// Statement Delimiter Rewriter Module
///
/// Routine bodies legally contain the statement terminator, so a procedure
/// script cannot be split on `;` as-is. Each script is wrapped in a
/// terminator-switch envelope: the terminator becomes `^` before the body
/// and is restored afterwards. The statement splitter consumes the
/// `SET TERM` directives; the body travels through it as one unit.

/// The sentinel terminator used while a routine body is active.
pub const BODY_TERMINATOR: &str = "^";

/// Wraps procedure script texts into a single executable blob.
///
/// Each input gets its own switch/restore pair. Inputs are concatenated in
/// the order given, which is the classification (file-name) order — not a
/// dependency order; a routine referencing a not-yet-created routine is a
/// known limitation.
pub fn wrap_procedure_scripts<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blob = String::new();
    for text in texts {
        blob.push_str(&format!("SET TERM {BODY_TERMINATOR} ;\n"));
        blob.push_str(text);
        blob.push('\n');
        blob.push_str(BODY_TERMINATOR);
        blob.push('\n');
        blob.push_str(&format!("SET TERM ; {BODY_TERMINATOR}\n"));
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_single_script() {
        let body = "CREATE PROCEDURE p\nBEGIN\n  SELECT 1;\nEND";
        let blob = wrap_procedure_scripts([body]);

        assert!(blob.starts_with("SET TERM ^ ;\n"));
        assert!(blob.contains(body));
        assert!(blob.ends_with("SET TERM ; ^\n"));
    }

    #[test]
    fn test_wrap_each_script_gets_its_own_envelope() {
        let blob = wrap_procedure_scripts(["CREATE PROCEDURE a\nBEGIN END", "CREATE PROCEDURE b\nBEGIN END"]);
        assert_eq!(blob.matches("SET TERM ^ ;").count(), 2);
        assert_eq!(blob.matches("SET TERM ; ^").count(), 2);

        // Concatenation preserves input order
        let a = blob.find("PROCEDURE a").unwrap();
        let b = blob.find("PROCEDURE b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_wrap_empty_input() {
        let blob = wrap_procedure_scripts([]);
        assert!(blob.is_empty());
    }
}
