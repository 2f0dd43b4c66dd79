//! Compilation pipeline
//!
//! Runs the stages over one source string: the parse, a token listing, and
//! the print emitter. The first error stops everything.

use std::time::Instant;

use log::info;

use crate::backend::generate_assembly_print;
use crate::frontend::ast::Program;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::{Parser, ParserOptions};
use crate::frontend::symbols::{BlockCounters, DeclaredVariables};
use crate::frontend::token::Token;
use crate::utils::Result;

/// Everything produced from a successful run
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub variables: DeclaredVariables,
    pub blocks: BlockCounters,
    /// Empty when the source has no `print(...)`
    pub assembly: String,
    pub elapsed_ms: u64,
}

impl Compilation {
    pub fn has_print(&self) -> bool {
        !self.assembly.is_empty()
    }
}

/// Tokenize a whole source string
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Parse only
pub fn check(source: &str, options: ParserOptions) -> Result<Program> {
    Parser::with_options(Lexer::new(source), options)?.parse()
}

/// Tokenize, parse and emit assembly for one source string
pub fn compile(source: &str, options: ParserOptions) -> Result<Compilation> {
    let started = Instant::now();

    // parse first so the earliest error in the source is the one reported
    let mut parser = Parser::with_options(Lexer::new(source), options)?;
    let program = parser.parse()?;
    let tokens = tokenize(source)?;
    let variables = parser.variables().clone();
    let assembly = generate_assembly_print(source, &variables);

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        "compiled {} tokens into {} statements, {} names declared, in {} ms",
        tokens.len(),
        program.statements.len(),
        parser.symbols().len(),
        elapsed_ms
    );

    Ok(Compilation {
        tokens,
        program,
        variables,
        blocks: parser.blocks(),
        assembly,
        elapsed_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::ConditionalMode;
    use crate::utils::{Error, ErrorKind};

    const PROGRAM: &str = "
int age = 10
string name = 'John'

if age == 10 init
  print(name)
end else init
  print('You are wrong, please quit this place')
end";

    #[test]
    fn test_compile_program() {
        let compilation = compile(PROGRAM, ParserOptions::default()).unwrap();
        assert!(compilation.has_print());
        assert!(compilation.assembly.contains("msg db 'John', 0xA"));
        assert_eq!(compilation.variables.len(), 2);
        assert!(compilation.blocks.is_balanced());
        assert_eq!(compilation.tokens.first().map(|t| t.lexeme.as_str()), Some("int"));
    }

    #[test]
    fn test_concatenation_is_not_parsed() {
        // the emitter understands `+`, the parser does not
        let err = compile("print('a' + 'b')", ParserOptions::default()).unwrap_err();
        assert_eq!(err, Error::UnexpectedToken { line: 1 });
    }

    #[test]
    fn test_compile_without_print() {
        let compilation = compile("int a = 1", ParserOptions::default()).unwrap();
        assert!(!compilation.has_print());
        assert_eq!(compilation.program.statements.len(), 1);
    }

    #[test]
    fn test_lex_error_stops_compile() {
        let err = compile("int a = 1\nint b = 2;x", ParserOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_parse_error_stops_compile() {
        let err = compile("age\nprint(age)", ParserOptions::default()).unwrap_err();
        assert_eq!(
            err,
            Error::UndefinedVariable {
                name: "age".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_earliest_error_wins() {
        let source = "age\n#";
        let expected = Error::UndefinedVariable {
            name: "age".to_string(),
            line: 1,
        };
        assert_eq!(check(source, ParserOptions::default()).unwrap_err(), expected);
        assert_eq!(compile(source, ParserOptions::default()).unwrap_err(), expected);
    }

    #[test]
    fn test_check_structured() {
        let options = ParserOptions {
            conditionals: ConditionalMode::Structured,
        };
        assert!(check(PROGRAM, options).is_err());
        let structured = PROGRAM.replace("if age == 10", "if (age == 10)");
        assert!(check(&structured, options).is_ok());
    }
}
