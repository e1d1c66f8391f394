//! # Statement Classifier
//!
//! Lexical classification of raw source lines. Each physical line of a
//! RedCode program is exactly one of: blank, comment, import directive,
//! control-structure header, or a terminated simple statement. The
//! classifier decides which, using only lexical cues; it never parses
//! expression syntax.
//!
//! Classification precedence: import directive, then control header, then
//! terminator enforcement. Control headers are exempt from the terminator
//! rule because they introduce an indented block whose body arrives on
//! subsequent lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Keyword that introduces an import directive.
pub const IMPORT_KEYWORD: &str = "redexternal";

/// Trailing marker that closes an ordinary single-line statement.
pub const STATEMENT_TERMINATOR: char = ';';

/// Line prefix that marks a comment.
pub const COMMENT_MARKER: char = '#';

/// Leading tokens that identify a control-structure header, in match order.
pub const CONTROL_PREFIXES: [&str; 11] = [
    "if ", "elif ", "else:", "for ", "while ", "def ", "class ", "try:", "except", "finally:",
    "with ",
];

lazy_static! {
    static ref IMPORT_DIRECTIVE: Regex =
        Regex::new(r"^redexternal (.*);$").expect("import directive pattern");
}

/// The classification of a single raw input line.
///
/// Produced fresh per line and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// Whitespace-only line.
    Blank,
    /// Line starting with the comment marker.
    Comment,
    /// `redexternal <facility>;` — carries the trimmed facility name.
    ImportDirective(String),
    /// A control-structure header, verbatim and un-terminated.
    ControlHeader(String),
    /// A terminated simple statement, with the terminator stripped.
    Statement(String),
    /// A non-control, non-import line missing its terminator.
    SyntaxError(String),
}

/// Classify one raw source line.
pub fn classify(raw_line: &str) -> ClassifiedLine {
    let line = raw_line.trim();

    if line.is_empty() {
        return ClassifiedLine::Blank;
    }
    if line.starts_with(COMMENT_MARKER) {
        return ClassifiedLine::Comment;
    }
    if let Some(captures) = IMPORT_DIRECTIVE.captures(line) {
        return ClassifiedLine::ImportDirective(captures[1].trim().to_string());
    }
    if CONTROL_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return ClassifiedLine::ControlHeader(line.to_string());
    }
    match line.strip_suffix(STATEMENT_TERMINATOR) {
        Some(body) => ClassifiedLine::Statement(body.to_string()),
        None => ClassifiedLine::SyntaxError(format!(
            "missing semicolon at end of line: {}",
            line
        )),
    }
}

/// Width of a raw line's leading whitespace, in characters.
///
/// Used by the run driver to thread block structure; tabs count as one
/// column each.
pub fn indent_width(raw_line: &str) -> usize {
    raw_line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blank_and_comment() {
        assert_eq!(classify(""), ClassifiedLine::Blank);
        assert_eq!(classify("   \t  "), ClassifiedLine::Blank);
        assert_eq!(classify("# a comment"), ClassifiedLine::Comment);
        assert_eq!(classify("   # indented comment"), ClassifiedLine::Comment);
    }

    #[test]
    fn test_import_directive() {
        assert_eq!(
            classify("redexternal time;"),
            ClassifiedLine::ImportDirective("time".to_string())
        );
        // surrounding whitespace in the facility name is trimmed
        assert_eq!(
            classify("redexternal   requests ;"),
            ClassifiedLine::ImportDirective("requests".to_string())
        );
    }

    #[test]
    fn test_import_requires_terminator() {
        // without the terminator the import shape does not match, and the
        // line falls through to terminator enforcement
        assert!(matches!(
            classify("redexternal time"),
            ClassifiedLine::SyntaxError(_)
        ));
    }

    #[test]
    fn test_control_headers_pass_through_unterminated() {
        for header in [
            "if x > 1:",
            "elif x < 0:",
            "else:",
            "for item in items:",
            "while running:",
            "def helper():",
            "class Thing:",
            "try:",
            "except ValueError:",
            "finally:",
            "with handle:",
        ] {
            assert_eq!(
                classify(header),
                ClassifiedLine::ControlHeader(header.to_string()),
                "header: {}",
                header
            );
        }
    }

    #[test]
    fn test_statement_terminator_stripped() {
        assert_eq!(
            classify("x = 5;"),
            ClassifiedLine::Statement("x = 5".to_string())
        );
        assert_eq!(
            classify("  redprint(\"hi\");  "),
            ClassifiedLine::Statement("redprint(\"hi\")".to_string())
        );
    }

    #[test]
    fn test_missing_terminator_is_syntax_error() {
        assert_eq!(
            classify("x = 5"),
            ClassifiedLine::SyntaxError("missing semicolon at end of line: x = 5".to_string())
        );
    }

    #[test]
    fn test_import_precedence_over_terminator() {
        // `redexternal x;` is an import, never a plain statement
        assert!(matches!(
            classify("redexternal json;"),
            ClassifiedLine::ImportDirective(_)
        ));
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("x = 1;"), 0);
        assert_eq!(indent_width("    x = 1;"), 4);
        assert_eq!(indent_width("\tx = 1;"), 1);
        assert_eq!(indent_width("  \t y"), 4);
    }

    proptest! {
        /// For ordinary statement bodies, the terminator decides everything:
        /// absent => syntax error, present => stripped verbatim.
        #[test]
        fn prop_terminator_rule(body in "[a-z][a-z0-9_ =+()]{0,30}") {
            let body = body.trim().to_string();
            prop_assume!(!body.is_empty());
            prop_assume!(!body.starts_with(IMPORT_KEYWORD));
            prop_assume!(!CONTROL_PREFIXES.iter().any(|p| body.starts_with(p)));

            match classify(&body) {
                ClassifiedLine::SyntaxError(_) => {}
                other => prop_assert!(false, "expected syntax error, got {:?}", other),
            }

            let terminated = format!("{};", body);
            prop_assert_eq!(classify(&terminated), ClassifiedLine::Statement(body));
        }
    }
}
