//! Structured Feedback Module
//!
//! Machine-readable output for editors and other front ends:
//! - JSON error reports with fix suggestions
//! - Compilation statistics

use serde::{Deserialize, Serialize};

use crate::compiler::Compilation;
use crate::frontend::symbols::BlockCounters;
use crate::utils::{Error, ErrorKind};

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,

    pub severity: Severity,

    /// Lexical, syntactic or I/O
    pub stage: Stage,

    /// Human-readable message
    pub message: String,

    /// Location information
    pub location: Option<Location>,

    /// Suggested fixes, most likely first
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Lexer,
    Parser,
    Io,
}

impl From<ErrorKind> for Stage {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Lex => Stage::Lexer,
            ErrorKind::Parse => Stage::Parser,
            ErrorKind::Io => Stage::Io,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Description of the fix
    pub message: String,

    /// The replacement text
    pub replacement: Option<String>,

    /// Confidence in this suggestion (0.0 - 1.0)
    pub confidence: f64,
}

impl Suggestion {
    fn new(message: impl Into<String>, replacement: Option<String>, confidence: f64) -> Self {
        Self {
            message: message.into(),
            replacement,
            confidence,
        }
    }
}

// ==================== Compilation Feedback ====================

/// Complete result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationFeedback {
    pub success: bool,

    pub source_file: String,

    /// All errors and warnings
    pub diagnostics: Vec<ErrorReport>,

    pub stats: CompilationStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationStats {
    /// Total time in milliseconds
    pub total_time_ms: u64,

    pub token_count: usize,

    pub statement_count: usize,

    /// Variables declared with a value
    pub variable_count: usize,

    /// Whether an assembly program was produced
    pub emitted_assembly: bool,

    /// Lines of code
    pub loc: usize,
}

impl CompilationStats {
    pub fn from_compilation(compilation: &Compilation, source: &str) -> Self {
        Self {
            total_time_ms: compilation.elapsed_ms,
            token_count: compilation.tokens.len(),
            statement_count: compilation.program.statements.len(),
            variable_count: compilation.variables.len(),
            emitted_assembly: compilation.has_print(),
            loc: source.lines().count(),
        }
    }
}

// ==================== Error Conversion ====================

impl ErrorReport {
    /// Create an error report from a compiler error
    pub fn from_error(error: &Error, file_name: &str) -> Self {
        let (code, mut suggestions) = generate_error_info(error);
        sort_by_confidence(&mut suggestions);

        Self {
            code: code.to_string(),
            severity: Severity::Error,
            stage: error.kind().into(),
            message: error.to_string(),
            location: error.line().map(|line| Location {
                file: file_name.to_string(),
                line,
            }),
            suggestions,
        }
    }

    /// Warning for `init` blocks still open at the end of the input
    pub fn unclosed_blocks(blocks: BlockCounters) -> Option<Self> {
        if blocks.is_balanced() {
            return None;
        }
        let open = blocks.opened - blocks.closed;
        Some(Self {
            code: "W0001".to_string(),
            severity: Severity::Warning,
            stage: Stage::Parser,
            message: format!("{} 'init' block(s) never closed with 'end'", open),
            location: None,
            suggestions: vec![Suggestion::new(
                "Close every 'init' with 'end'",
                Some("end\n".repeat(open)),
                0.6,
            )],
        })
    }
}

fn sort_by_confidence(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Error code and fix suggestions for an error
fn generate_error_info(error: &Error) -> (&'static str, Vec<Suggestion>) {
    match error {
        Error::TypeMismatch { name, declared, got, .. } => {
            let mut suggestions = vec![Suggestion::new(
                format!("Assign a '{}' value to '{}'", declared, name),
                None,
                0.7,
            )];
            if is_type_word(got) {
                suggestions.push(Suggestion::new(
                    format!("Declare '{}' as '{}'", name, got),
                    Some(format!("{} {}", got, name)),
                    0.6,
                ));
            }
            ("E0001", suggestions)
        }

        Error::UndefinedVariable { name, .. } => (
            "E0002",
            vec![
                Suggestion::new(
                    format!("Declare '{}' before using it", name),
                    Some(format!("string {}\n", name)),
                    0.8,
                ),
                Suggestion::new(format!("Check the spelling of '{}'", name), None, 0.4),
            ],
        ),

        Error::BlockMismatch { opened, closed, .. } => (
            "E0003",
            vec![
                Suggestion::new(
                    format!("Remove the extra 'end' ({} 'end' for {} 'init')", closed, opened),
                    Some(String::new()),
                    0.6,
                ),
                Suggestion::new("Add the missing 'init' before this 'end'", None, 0.5),
            ],
        ),

        Error::MissingValue { name, declared, .. } => (
            "E0004",
            vec![Suggestion::new(
                format!("Write a '{}' value after '{} ='", declared, name),
                None,
                0.8,
            )],
        ),

        Error::UnexpectedChar { ch, .. } => (
            "E0005",
            vec![Suggestion::new(
                format!("Remove '{}'; it is not part of the language", ch),
                Some(String::new()),
                0.7,
            )],
        ),

        Error::ExpectedVariableName { ty, .. } => (
            "E0006",
            vec![Suggestion::new(
                format!("Name the variable after '{}'", ty),
                Some(format!("{} value", ty)),
                0.8,
            )],
        ),

        Error::Expected { expected, .. } => (
            "E0007",
            vec![Suggestion::new(format!("Insert {}", expected), None, 0.5)],
        ),

        Error::UnexpectedToken { .. } => (
            "E0008",
            vec![Suggestion::new(
                "Statements start with a type, a literal, '=', '==', 'init' or 'end'",
                None,
                0.3,
            )],
        ),

        Error::Io(_) => ("E0009", vec![]),
    }
}

fn is_type_word(word: &str) -> bool {
    matches!(word, "bol" | "int" | "double" | "char" | "string")
}

impl CompilationFeedback {
    /// Create a successful feedback
    pub fn success(source_file: String, stats: CompilationStats) -> Self {
        Self {
            success: true,
            source_file,
            diagnostics: vec![],
            stats,
        }
    }

    /// Successful feedback for a full compile, with its warnings
    pub fn from_compilation(source_file: String, compilation: &Compilation, source: &str) -> Self {
        let stats = CompilationStats::from_compilation(compilation, source);
        let mut feedback = Self::success(source_file, stats);
        feedback
            .diagnostics
            .extend(ErrorReport::unclosed_blocks(compilation.blocks));
        feedback
    }

    /// Create a failed feedback
    pub fn failure(source_file: String, errors: Vec<ErrorReport>, stats: CompilationStats) -> Self {
        Self {
            success: false,
            source_file,
            diagnostics: errors,
            stats,
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::frontend::parser::ParserOptions;

    #[test]
    fn test_undefined_variable_report() {
        let err = compile("age", ParserOptions::default()).unwrap_err();
        let report = ErrorReport::from_error(&err, "main.il");
        assert_eq!(report.code, "E0002");
        assert_eq!(report.stage, Stage::Parser);
        assert_eq!(report.message, "Variable 'age' is not defined at line 1");
        assert_eq!(
            report.location,
            Some(Location {
                file: "main.il".to_string(),
                line: 1
            })
        );
        assert!(report.suggestions[0].confidence >= report.suggestions[1].confidence);
    }

    #[test]
    fn test_type_mismatch_suggests_matching_type() {
        let err = compile("int age = 'x'\n", ParserOptions::default()).unwrap_err();
        let report = ErrorReport::from_error(&err, "main.il");
        assert_eq!(report.code, "E0001");
        assert!(report
            .suggestions
            .iter()
            .any(|s| s.replacement.as_deref() == Some("string age")));
    }

    #[test]
    fn test_io_report_has_no_location() {
        let report = ErrorReport::from_error(&Error::Io("missing".to_string()), "x.il");
        assert_eq!(report.stage, Stage::Io);
        assert!(report.location.is_none());
    }

    #[test]
    fn test_feedback_json() {
        let source = "print('Welcome!')";
        let compilation = compile(source, ParserOptions::default()).unwrap();
        let stats = CompilationStats::from_compilation(&compilation, source);
        let feedback = CompilationFeedback::success("hello.il".to_string(), stats);

        let value: serde_json::Value = serde_json::from_str(&feedback.to_json()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["stats"]["token_count"], 4);
        assert_eq!(value["stats"]["emitted_assembly"], true);
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unclosed_init_is_a_warning() {
        let source = "int a = 1\ninit";
        let compilation = compile(source, ParserOptions::default()).unwrap();
        let feedback = CompilationFeedback::from_compilation("open.il".to_string(), &compilation, source);
        assert!(feedback.success);
        assert_eq!(feedback.diagnostics.len(), 1);
        let warning = &feedback.diagnostics[0];
        assert_eq!(warning.code, "W0001");
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.suggestions[0].replacement.as_deref(), Some("end\n"));

        let balanced = compile("init end", ParserOptions::default()).unwrap();
        let feedback = CompilationFeedback::from_compilation("ok.il".to_string(), &balanced, "init end");
        assert!(feedback.diagnostics.is_empty());
    }

    #[test]
    fn test_failure_json_carries_code() {
        let err = compile("init\nend\nend", ParserOptions::default()).unwrap_err();
        let report = ErrorReport::from_error(&err, "blocks.il");
        let feedback = CompilationFeedback::failure(
            "blocks.il".to_string(),
            vec![report],
            CompilationStats::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&feedback.to_json()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["diagnostics"][0]["code"], "E0003");
        assert_eq!(value["diagnostics"][0]["location"]["line"], 3);
    }
}
