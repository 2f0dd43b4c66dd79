//! Parser for initlang
//!
//! Recursive descent over a [`Lexer`], one token of lookahead plus the lexer's
//! own `peek_token` where an identifier may start an assignment. Declared
//! names, block totals and declared values live in the parser's
//! [`ParseContext`], which is threaded through every parse function.

use log::debug;

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::symbols::{BlockCounters, DeclaredVariables, ParseContext, SymbolTable};
use crate::frontend::token::{Category, Token};
use crate::utils::{Error, Result, Span};

const END_OF_INPUT: &str = "end of input";

/// How `if` is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConditionalMode {
    /// `if` is an ordinary reserved keyword; its `init`/`end` are only
    /// checked by the block counters
    #[default]
    Counted,
    /// `if (<condition>) init ... end [else init ... end]` is parsed into a
    /// [`Conditional`] with its body
    Structured,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub conditionals: ConditionalMode,
}

/// The parser
pub struct Parser {
    lexer: Lexer,
    current: Option<Token>,
    last_span: Span,
    options: ParserOptions,
    /// Everything declared and counted so far
    context: ParseContext,
}

impl Parser {
    /// Create a new parser from a lexer, reading its first token
    pub fn new(lexer: Lexer) -> Result<Self> {
        Self::with_options(lexer, ParserOptions::default())
    }

    pub fn with_options(mut lexer: Lexer, options: ParserOptions) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            last_span: Span::dummy(),
            options,
            context: ParseContext::new(),
        })
    }

    /// Declared identifier -> literal text, after a successful parse
    pub fn variables(&self) -> &DeclaredVariables {
        &self.context.variables
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.context.symbols
    }

    pub fn blocks(&self) -> BlockCounters {
        self.context.blocks
    }

    // ==================== Helper Methods ====================

    fn current_is(&self, category: Category) -> bool {
        self.current.as_ref().is_some_and(|t| t.is(category))
    }

    fn current_is_keyword(&self, word: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.is(Category::ReservedKeyword) && t.lexeme == word)
    }

    /// Line of the current token, or of the last consumed one at end of input
    fn line(&self) -> usize {
        self.current.as_ref().map_or(self.last_span.line, Token::line)
    }

    fn describe_current(&self) -> String {
        self.current
            .as_ref()
            .map_or_else(|| END_OF_INPUT.to_string(), |t| t.lexeme.clone())
    }

    /// Consume the current token and pull the next one
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        match std::mem::replace(&mut self.current, next) {
            Some(token) => {
                self.last_span = token.span;
                Ok(token)
            }
            None => Err(Error::Expected {
                expected: "a token".to_string(),
                got: END_OF_INPUT.to_string(),
                line: self.last_span.line,
            }),
        }
    }

    fn expect(&mut self, category: Category, expected: &str) -> Result<Token> {
        if self.current_is(category) {
            self.advance()
        } else {
            Err(Error::Expected {
                expected: expected.to_string(),
                got: self.describe_current(),
                line: self.line(),
            })
        }
    }

    fn check_declared(&self, token: &Token, ctx: &ParseContext) -> Result<()> {
        if ctx.symbols.is_declared(&token.lexeme) {
            Ok(())
        } else {
            Err(Error::UndefinedVariable {
                name: token.lexeme.clone(),
                line: token.line(),
            })
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse the rest of the input.
    ///
    /// Declarations and block totals accumulate in this parser's context, so a
    /// second call on an exhausted parser returns an empty program and leaves
    /// the earlier results in place.
    pub fn parse(&mut self) -> Result<Program> {
        let mut ctx = std::mem::take(&mut self.context);
        let result = self.parse_statements(&mut ctx);
        self.context = ctx;
        result
    }

    fn parse_statements(&mut self, ctx: &mut ParseContext) -> Result<Program> {
        let mut statements = Vec::new();

        while self.current.is_some() {
            if let Some(statement) = self.parse_statement(ctx)? {
                statements.push(statement);
            }
        }

        debug!(
            "parsed {} statements, {} symbols, blocks {:?}",
            statements.len(),
            ctx.symbols.len(),
            ctx.blocks
        );
        Ok(Program { statements })
    }

    /// Dispatch on the current token; tokens that leave no node yield `None`
    fn parse_statement(&mut self, ctx: &mut ParseContext) -> Result<Option<Statement>> {
        let Some(token) = self.current.clone() else {
            return Ok(None);
        };

        match token.category {
            c if c == Category::DataType || c.is_literal() => {
                self.parse_variable_declaration(ctx).map(Some)
            }
            Category::OpenBlock => {
                ctx.blocks.open();
                self.advance()?;
                Ok(None)
            }
            Category::CloseBlock => {
                ctx.blocks.close(token.line())?;
                self.advance()?;
                Ok(None)
            }
            Category::SimpleAssign => {
                Ok(Some(Statement::Assignment(self.parse_assignment_statement(ctx)?)))
            }
            Category::ReservedKeyword
                if token.lexeme == "if"
                    && self.options.conditionals == ConditionalMode::Structured =>
            {
                Ok(Some(Statement::Conditional(self.parse_if_statement(ctx)?)))
            }
            Category::OpenParen
            | Category::CloseParen
            | Category::Point
            | Category::ReservedKeyword => {
                self.advance()?;
                Ok(None)
            }
            Category::Identifier => {
                self.check_declared(&token, ctx)?;
                self.advance()?;
                Ok(None)
            }
            Category::EqualityOperator => {
                Ok(Some(Statement::Expression(self.parse_expression(ctx)?)))
            }
            Category::Import => Ok(Some(Statement::Import(self.parse_import_statement(ctx)?))),
            _ => Err(Error::UnexpectedToken { line: token.line() }),
        }
    }

    /// `<type> <name> [= <expression>]`, or a literal standing on its own
    fn parse_variable_declaration(&mut self, ctx: &mut ParseContext) -> Result<Statement> {
        let ty = self.advance()?;
        if ty.category.is_literal() {
            return Ok(Statement::Expression(Expression::literal(ty)));
        }

        if !self.current_is(Category::Identifier) {
            return Err(Error::ExpectedVariableName {
                ty: ty.lexeme,
                line: self.line(),
            });
        }
        let name = Ident::new(self.advance()?);
        ctx.symbols.declare(&name.name);

        let mut value = None;
        if self.current_is(Category::SimpleAssign) {
            let assign = self.advance()?;
            let missing = Error::MissingValue {
                name: name.name.clone(),
                declared: ty.lexeme.clone(),
                line: assign.line(),
            };
            if self.current.is_none() || self.current_is(Category::DataType) {
                return Err(missing);
            }

            let expr = self.parse_expression(ctx)?;
            let got = match expr.value_category() {
                Some(category) => category.as_str().to_string(),
                None if self.current.is_none() => return Err(missing),
                None => self.describe_current(),
            };
            if got != ty.lexeme {
                return Err(Error::TypeMismatch {
                    name: name.name,
                    declared: ty.lexeme,
                    got,
                    line: assign.line(),
                });
            }
            value = Some(Initializer { assign, value: expr });
        }

        let literal = value
            .as_ref()
            .and_then(|init| init.value.value_token())
            .map(|token| token.lexeme.as_str());
        ctx.declare(&name.name, literal);
        debug!("declared {} {} = {:?}", ty.lexeme, name.name, literal);

        Ok(Statement::VariableDeclaration(VariableDeclaration {
            span: ty.span.merge(&self.last_span),
            ty,
            name,
            value,
        }))
    }

    /// `= <literal or type> = <expression>`
    fn parse_assignment_statement(&mut self, ctx: &mut ParseContext) -> Result<Assignment> {
        let assign = self.advance()?;

        let is_value = self
            .current
            .as_ref()
            .is_some_and(|t| t.category.is_literal() || t.is(Category::DataType));
        if !is_value {
            return Err(Error::Expected {
                expected: "a valid data type".to_string(),
                got: self.describe_current(),
                line: self.line(),
            });
        }
        let target = self.advance()?;
        let equals = self.expect(Category::SimpleAssign, "'='")?;
        let value = self.parse_expression(ctx)?;

        Ok(Assignment {
            span: assign.span.merge(&self.last_span),
            assign,
            target,
            equals,
            value,
        })
    }

    /// `if (<condition>) init <block> end [else init <block> end]`
    fn parse_if_statement(&mut self, ctx: &mut ParseContext) -> Result<Conditional> {
        let if_token = self.advance()?;
        self.expect(Category::OpenParen, "'(' after 'if'")?;
        let condition = self.parse_condition(ctx)?;
        self.expect(Category::CloseParen, "')' after the condition")?;

        let open = self.expect(Category::OpenBlock, "'init' block after 'if' statement")?;
        let then_block = self.parse_block_statement(open.span, ctx)?;
        self.expect(Category::CloseBlock, "'end' after 'init' block")?;

        let else_block = if self.current_is_keyword("else") {
            self.advance()?;
            let open = self.expect(Category::OpenBlock, "'init' block after 'else'")?;
            let block = self.parse_block_statement(open.span, ctx)?;
            self.expect(Category::CloseBlock, "'end' after 'init' block")?;
            Some(block)
        } else {
            None
        };

        Ok(Conditional {
            condition,
            then_block,
            else_block,
            span: if_token.span.merge(&self.last_span),
        })
    }

    /// Statements up to, not including, the closing `end`.
    ///
    /// A bare `init` inside the body opens a nested block that must be closed
    /// before the body can end.
    fn parse_block_statement(&mut self, start: Span, ctx: &mut ParseContext) -> Result<Block> {
        let mut statements = Vec::new();
        while self.current.is_some() && !self.current_is(Category::CloseBlock) {
            if self.current_is(Category::OpenBlock) {
                let open = self.advance()?;
                let block = self.parse_block_statement(open.span, ctx)?;
                self.expect(Category::CloseBlock, "'end' after 'init' block")?;
                statements.push(Statement::Block(block));
                continue;
            }
            if let Some(statement) = self.parse_statement(ctx)? {
                statements.push(statement);
            }
        }
        Ok(Block {
            statements,
            span: start.merge(&self.last_span),
        })
    }

    /// Expressions joined by equality, relational or logical operators
    fn parse_condition(&mut self, ctx: &mut ParseContext) -> Result<Condition> {
        let mut terms = vec![self.parse_expression(ctx)?];
        while self.current.as_ref().is_some_and(|t| t.category.is_comparison()) {
            let operator = self.advance()?;
            let start = operator.span;
            let operand = self.parse_operand(ctx)?;
            terms.push(Expression {
                operator: Some(operator),
                operand,
                span: start.merge(&self.last_span),
            });
        }
        Ok(Condition { terms })
    }

    /// `[==|!=] [operand]`
    fn parse_expression(&mut self, ctx: &mut ParseContext) -> Result<Expression> {
        let start = self.current.as_ref().map_or(self.last_span, |t| t.span);
        let operator = if self.current_is(Category::EqualityOperator) {
            Some(self.advance()?)
        } else {
            None
        };
        let operand = self.parse_operand(ctx)?;

        let span = if operator.is_some() || operand.is_some() {
            start.merge(&self.last_span)
        } else {
            Span::new(start.start, start.start, start.line)
        };
        Ok(Expression { operator, operand, span })
    }

    /// An identifier (possibly the target of a nested assignment) or a literal
    fn parse_operand(&mut self, ctx: &mut ParseContext) -> Result<Option<Operand>> {
        let Some(token) = self.current.clone() else {
            return Ok(None);
        };

        // inside an expression an identifier is a bare reference; only
        // identifiers at statement start must be declared
        if token.is(Category::Identifier) {
            let assigns = self
                .lexer
                .peek_token()?
                .is_some_and(|next| next.is(Category::SimpleAssign));
            let target = Ident::new(self.advance()?);
            if assigns {
                let assign = self.advance()?;
                let value = self.parse_expression(ctx)?;
                return Ok(Some(Operand::Assignment {
                    target,
                    assign,
                    value: Box::new(value),
                }));
            }
            return Ok(Some(Operand::Identifier(target)));
        }

        if token.category.is_literal() {
            let token = self.advance()?;
            return Ok(Some(Operand::Literal(Literal { token })));
        }

        Ok(None)
    }

    /// `import <name> from <module>`
    fn parse_import_statement(&mut self, ctx: &mut ParseContext) -> Result<Import> {
        let import = self.advance()?;
        let name = Ident::new(self.expect(Category::Identifier, "a name after 'import'")?);
        self.expect(Category::From, "'from'")?;

        if !self.current_is(Category::Identifier) && !self.current_is(Category::Str) {
            return Err(Error::Expected {
                expected: "a module after 'from'".to_string(),
                got: self.describe_current(),
                line: self.line(),
            });
        }
        let module = self.advance()?;
        ctx.declare(&name.name, None);

        Ok(Import {
            span: import.span.merge(&self.last_span),
            name,
            module,
        })
    }
}
