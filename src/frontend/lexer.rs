//! Lexer for initlang
//!
//! Pulls one token at a time out of the source using the ordered rule table
//! in [`crate::frontend::patterns`].

use log::trace;

use crate::frontend::patterns::{first_match, Action};
use crate::frontend::token::Token;
use crate::utils::{Error, Result, Span};

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// 1-based line at `pos`
    line: usize,
    /// Last token handed out by `next_token`
    previous: Option<Token>,
}

/// Where a scan stopped
struct Scan {
    token: Option<Token>,
    pos: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            previous: None,
        }
    }

    /// Check if any input is left to scan (trivia included)
    pub fn has_more(&self) -> bool {
        self.pos < self.source.len()
    }

    /// Check if the cursor sits exactly on the end of the input
    pub fn at_end(&self) -> bool {
        self.pos == self.source.len()
    }

    /// The token returned by the last call to `next_token`
    pub fn previous_token(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    /// Get the next significant token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let scan = self.scan(self.pos, self.line)?;
        self.pos = scan.pos;
        self.line = scan.line;
        if let Some(token) = &scan.token {
            trace!("token {} {:?} at line {}", token.category, token.lexeme, token.line());
            self.previous = Some(token.clone());
        }
        Ok(scan.token)
    }

    /// Get the token the next `next_token` call would return, without moving
    pub fn peek_token(&self) -> Result<Option<Token>> {
        Ok(self.scan(self.pos, self.line)?.token)
    }

    /// Tokenize the rest of the source and return all tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Match rules from `pos` until a significant token or the end of input
    fn scan(&self, mut pos: usize, mut line: usize) -> Result<Scan> {
        while pos < self.source.len() {
            let rest = &self.source[pos..];
            let Some((rule, len)) = first_match(rest) else {
                return Err(Error::UnexpectedChar { ch: rest[0], line });
            };
            let start = pos;
            let start_line = line;
            pos += len;
            line += rest[..len].iter().filter(|c| **c == '\n').count();

            if let Action::Emit(category) = rule.action {
                let lexeme: String = rest[..len].iter().collect();
                let token = Token::new(category, lexeme, Span::new(start, pos, start_line));
                return Ok(Scan { token: Some(token), pos, line });
            }
        }
        Ok(Scan { token: None, pos, line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::Category;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<(Category, String)> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| (t.category, t.lexeme))
            .collect()
    }

    #[test]
    fn test_trivia_only() {
        let mut lexer = Lexer::new("  // note\n /* block\n comment */\t\n");
        assert_eq!(lexer.next_token().unwrap(), None);
        assert!(!lexer.has_more());
        assert!(lexer.at_end());
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        assert_eq!(
            lex("\u{feff}int a = 1\u{feff}"),
            vec![
                (Category::DataType, "int".to_string()),
                (Category::Identifier, "a".to_string()),
                (Category::SimpleAssign, "=".to_string()),
                (Category::Int, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            lex("int age = 10"),
            vec![
                (Category::DataType, "int".to_string()),
                (Category::Identifier, "age".to_string()),
                (Category::SimpleAssign, "=".to_string()),
                (Category::Int, "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_keyword_vs_identifier() {
        assert_eq!(lex("if"), vec![(Category::ReservedKeyword, "if".to_string())]);
        assert_eq!(lex("iffy"), vec![(Category::Identifier, "iffy".to_string())]);
    }

    #[test]
    fn test_deterministic() {
        let source = "string name = 'John'\nif age >= 30 and name == 'John' init print(name) end";
        let first = Lexer::new(source).tokenize().unwrap();
        let second = Lexer::new(source).tokenize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lexemes_reconstruct_source() {
        let source = "int(x)==y.z<=(3.5)+'a b'-q*=w/empty,end";
        let joined: String = Lexer::new(source)
            .tokenize()
            .unwrap()
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Lexer::new("int a = 1\n/* two\nlines */ bol b\n\n  c").tokenize().unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line()).collect();
        assert_eq!(lines, vec![1, 1, 1, 1, 3, 3, 5]);
    }

    #[test]
    fn test_unknown_character() {
        let mut lexer = Lexer::new("int a\n# oops");
        assert!(lexer.next_token().unwrap().is_some());
        assert!(lexer.next_token().unwrap().is_some());
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err, Error::UnexpectedChar { ch: '#', line: 2 });
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut lexer = Lexer::new("  // lead\n age = 3");
        let first = lexer.peek_token().unwrap();
        let second = lexer.peek_token().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_ref().map(|t| t.category), Some(Category::Identifier));
        assert_eq!(lexer.next_token().unwrap(), first);
        assert_eq!(lexer.previous_token(), first.as_ref());
        assert_eq!(
            lexer.peek_token().unwrap().map(|t| t.category),
            Some(Category::SimpleAssign)
        );
    }

    #[test]
    fn test_peek_at_end() {
        let lexer = Lexer::new("   ");
        assert_eq!(lexer.peek_token().unwrap(), None);
        assert!(lexer.has_more());
    }

    #[test]
    fn test_import_from() {
        assert_eq!(
            lex("import io from 'std'"),
            vec![
                (Category::Import, "import".to_string()),
                (Category::Identifier, "io".to_string()),
                (Category::From, "from".to_string()),
                (Category::Str, "'std'".to_string()),
            ]
        );
    }

    #[test]
    fn test_print_call() {
        assert_eq!(
            lex("print('Welcome!')"),
            vec![
                (Category::ReservedKeyword, "print".to_string()),
                (Category::OpenParen, "(".to_string()),
                (Category::Str, "'Welcome!'".to_string()),
                (Category::CloseParen, ")".to_string()),
            ]
        );
    }
}
