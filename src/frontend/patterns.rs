//! Lexical grammar for initlang
//!
//! An ordered table of anchored patterns. The lexer tries the rules from top
//! to bottom at the cursor and takes the first one that matches, no matter
//! how long a later match would have been.

use crate::frontend::token::Category;

/// What the lexer does with a matched lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Trivia: consume and keep scanning
    Skip,
    Emit(Category),
}

/// An anchored recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Whitespace,
    /// `//` up to the end of the line
    LineComment,
    /// `/* ... */`, shortest match, may span lines
    BlockComment,
    /// First listed text that prefixes the input
    Text(&'static [&'static str]),
    /// First listed word that prefixes the input and is not followed by a word character
    Word(&'static [&'static str]),
    /// `-?\d+` followed by whitespace, `)`, `;` or end of input
    Integer,
    /// `-?\d+\.\d+` with the same trailing condition as [`Pattern::Integer`]
    Decimal,
    /// One character between the quotes, and nothing after the closing quote
    CharLiteral(char),
    /// A run of non-quote characters between the quotes
    QuotedRun(char),
    /// `[A-Za-z_]\w*`
    Identifier,
}

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub action: Action,
}

const fn skip(pattern: Pattern) -> Rule {
    Rule { pattern, action: Action::Skip }
}

const fn emit(pattern: Pattern, category: Category) -> Rule {
    Rule { pattern, action: Action::Emit(category) }
}

/// Words lexed as `RESERVED_KEYWORD`.
///
/// `import` is deliberately absent so the dedicated `import` rule below is reachable.
pub const RESERVED_WORDS: &[&str] = &[
    "if", "pass", "else", "then", "break", "return", "print", "read", "this", "for", "while",
    "in", "try", "handler", "class", "public", "private", "void", "static", "object", "func",
    "abstract", "inherits", "interface", "global", "constructor", "new",
];

/// The lexical grammar, in precedence order
pub const RULES: &[Rule] = &[
    // Trivia
    skip(Pattern::Whitespace),
    skip(Pattern::LineComment),
    skip(Pattern::BlockComment),
    // Equality and assignment
    emit(Pattern::Text(&["==", "!="]), Category::EqualityOperator),
    emit(Pattern::Text(&["="]), Category::SimpleAssign),
    emit(Pattern::Text(&["*=", "/=", "+=", "-="]), Category::ComplexAssign),
    // Arithmetic
    emit(Pattern::Text(&["+"]), Category::AdditionOperator),
    emit(Pattern::Text(&["-"]), Category::SubtractionOperator),
    emit(Pattern::Text(&["/"]), Category::DivisionOperator),
    emit(Pattern::Text(&["*"]), Category::MultiplicationOperator),
    emit(Pattern::Text(&["."]), Category::Point),
    emit(Pattern::Text(&["<=", "<", ">=", ">"]), Category::RelationalOperator),
    // Keywords
    emit(Pattern::Word(RESERVED_WORDS), Category::ReservedKeyword),
    emit(Pattern::Word(&["from"]), Category::From),
    emit(Pattern::Word(&["import"]), Category::Import),
    // Literals, each followed by the type word that names it
    emit(Pattern::Text(&["true", "false"]), Category::Bol),
    emit(Pattern::Word(&["bol"]), Category::DataType),
    emit(Pattern::Integer, Category::Int),
    emit(Pattern::Word(&["int"]), Category::DataType),
    emit(Pattern::Decimal, Category::Double),
    emit(Pattern::Word(&["double"]), Category::DataType),
    emit(Pattern::CharLiteral('\''), Category::Char),
    emit(Pattern::CharLiteral('"'), Category::Char),
    emit(Pattern::Word(&["char"]), Category::DataType),
    emit(Pattern::QuotedRun('\''), Category::Str),
    emit(Pattern::QuotedRun('"'), Category::Str),
    emit(Pattern::Word(&["string"]), Category::DataType),
    emit(Pattern::Text(&["empty"]), Category::DataType),
    emit(Pattern::Text(&["object"]), Category::DataType),
    // Logic
    emit(Pattern::Word(&["and", "or", "not"]), Category::LogicalOperator),
    // Delimiters
    emit(Pattern::Text(&["init"]), Category::OpenBlock),
    emit(Pattern::Text(&["end"]), Category::CloseBlock),
    emit(Pattern::Text(&["("]), Category::OpenParen),
    emit(Pattern::Text(&[")"]), Category::CloseParen),
    emit(Pattern::Text(&[","]), Category::Comma),
    emit(Pattern::Identifier, Category::Identifier),
];

/// `\w`
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn starts_with(input: &[char], text: &str) -> bool {
    let mut len = 0;
    for expected in text.chars() {
        if input.get(len) != Some(&expected) {
            return false;
        }
        len += 1;
    }
    true
}

fn digits(input: &[char], from: usize) -> usize {
    input[from.min(input.len())..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count()
}

/// The lookahead shared by numeric literals
/// `\s`: Unicode white space plus the byte order mark
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn ends_number(next: Option<&char>) -> bool {
    match next {
        None => true,
        Some(c) => is_space(*c) || *c == ')' || *c == ';',
    }
}

impl Pattern {
    /// Length in characters of the match at the start of `input`, if any
    pub fn match_len(&self, input: &[char]) -> Option<usize> {
        match *self {
            Pattern::Whitespace => {
                let len = input.iter().take_while(|c| is_space(**c)).count();
                (len > 0).then_some(len)
            }
            Pattern::LineComment => {
                if !starts_with(input, "//") {
                    return None;
                }
                let body = input[2..].iter().take_while(|c| !is_line_terminator(**c)).count();
                Some(2 + body)
            }
            Pattern::BlockComment => {
                if !starts_with(input, "/*") {
                    return None;
                }
                (2..input.len().saturating_sub(1))
                    .find(|&i| input[i] == '*' && input[i + 1] == '/')
                    .map(|i| i + 2)
            }
            Pattern::Text(alternatives) => alternatives
                .iter()
                .find(|text| starts_with(input, text))
                .map(|text| text.chars().count()),
            Pattern::Word(words) => words
                .iter()
                .map(|word| (word, word.chars().count()))
                .find(|(word, len)| {
                    starts_with(input, word) && !input.get(*len).copied().is_some_and(is_word_char)
                })
                .map(|(_, len)| len),
            Pattern::Integer => {
                let sign = usize::from(input.first() == Some(&'-'));
                let len = digits(input, sign);
                if len == 0 || !ends_number(input.get(sign + len)) {
                    return None;
                }
                Some(sign + len)
            }
            Pattern::Decimal => {
                let sign = usize::from(input.first() == Some(&'-'));
                let whole = digits(input, sign);
                if whole == 0 || input.get(sign + whole) != Some(&'.') {
                    return None;
                }
                let fraction = digits(input, sign + whole + 1);
                let len = sign + whole + 1 + fraction;
                if fraction == 0 || !ends_number(input.get(len)) {
                    return None;
                }
                Some(len)
            }
            Pattern::CharLiteral(quote) => match input {
                [open, c, close] if *open == quote && *close == quote && !is_line_terminator(*c) => {
                    Some(3)
                }
                _ => None,
            },
            Pattern::QuotedRun(quote) => {
                if input.first() != Some(&quote) {
                    return None;
                }
                input[1..].iter().position(|c| *c == quote).map(|i| i + 2)
            }
            Pattern::Identifier => match input.first() {
                Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                    Some(1 + input[1..].iter().take_while(|c| is_word_char(**c)).count())
                }
                _ => None,
            },
        }
    }
}

/// Find the first rule matching at the start of `input`
pub fn first_match(input: &[char]) -> Option<(&'static Rule, usize)> {
    RULES
        .iter()
        .find_map(|rule| rule.pattern.match_len(input).map(|len| (rule, len)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn action_of(s: &str) -> Option<(Action, usize)> {
        first_match(&chars(s)).map(|(rule, len)| (rule.action, len))
    }

    #[test]
    fn test_integer_needs_trailing_boundary() {
        assert_eq!(Pattern::Integer.match_len(&chars("42")), Some(2));
        assert_eq!(Pattern::Integer.match_len(&chars("42)")), Some(2));
        assert_eq!(Pattern::Integer.match_len(&chars("42;")), Some(2));
        assert_eq!(Pattern::Integer.match_len(&chars("-7 ")), Some(2));
        assert_eq!(Pattern::Integer.match_len(&chars("42,")), None);
        assert_eq!(Pattern::Integer.match_len(&chars("4.2")), None);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(Pattern::Decimal.match_len(&chars("3.14\n")), Some(4));
        assert_eq!(Pattern::Decimal.match_len(&chars("3.")), None);
        assert_eq!(Pattern::Decimal.match_len(&chars("3.1.4")), None);
    }

    #[test]
    fn test_char_literal_only_at_end_of_input() {
        assert_eq!(Pattern::CharLiteral('\'').match_len(&chars("'x'")), Some(3));
        assert_eq!(Pattern::CharLiteral('\'').match_len(&chars("'x' ")), None);
        assert_eq!(action_of("'x' "), Some((Action::Emit(Category::Str), 3)));
        assert_eq!(action_of("\"x\""), Some((Action::Emit(Category::Char), 3)));
    }

    #[test]
    fn test_block_comment_is_shortest() {
        let input = chars("/* a */ b */");
        assert_eq!(Pattern::BlockComment.match_len(&input), Some(7));
        assert_eq!(Pattern::BlockComment.match_len(&chars("/* open")), None);
        // an unterminated comment falls through to the division operator
        assert_eq!(action_of("/* open"), Some((Action::Emit(Category::DivisionOperator), 1)));
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(action_of("if("), Some((Action::Emit(Category::ReservedKeyword), 2)));
        assert_eq!(action_of("iffy"), Some((Action::Emit(Category::Identifier), 4)));
        assert_eq!(action_of("import"), Some((Action::Emit(Category::Import), 6)));
    }

    #[test]
    fn test_order_beats_length() {
        // `end` has no boundary, so it wins over the longer identifier
        assert_eq!(action_of("ending"), Some((Action::Emit(Category::CloseBlock), 3)));
        // `<=` is listed before `<`
        assert_eq!(action_of("<= 1"), Some((Action::Emit(Category::RelationalOperator), 2)));
        // `==` before `=`
        assert_eq!(action_of("== 1"), Some((Action::Emit(Category::EqualityOperator), 2)));
        // the subtraction rule sits before the integer rule
        assert_eq!(action_of("-5"), Some((Action::Emit(Category::SubtractionOperator), 1)));
    }

    #[test]
    fn test_no_rule_for_stray_characters() {
        assert!(first_match(&chars("#")).is_none());
        assert!(first_match(&chars("!x")).is_none());
        assert!(first_match(&chars(";")).is_none());
    }
}
