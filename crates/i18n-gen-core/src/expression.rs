// crates/i18n-gen-core/src/expression.rs
// ============================================================================
// Module: Guard Expressions
// Description: Lexer and recursive-descent parser for template guards.
// Purpose: Validate conditional-template guards and keep their AST for emitters.
// Dependencies: serde
// ============================================================================

//! ## Overview
//!
//! A conditional template is selected by a boolean guard over the message's
//! variables, e.g. `count == 0` or `age > 18 && name != ""`. Guards are
//! untrusted catalog input, so the grammar is deliberately small and both
//! input size and nesting are bounded.
//!
//! ### Grammar (informal)
//! - **Operators**, loosest first: `||`, `&&`, comparisons
//!   (`==`, `!=`, `<`, `<=`, `>`, `>=`), prefix `!`
//! - **Operands**: identifiers, integers (optionally `-` prefixed), double
//!   quoted strings with `\\`, `\"`, `\n`, `\t` escapes, `true`, `false`
//! - **Parentheses**: `( ... )` for explicit grouping
//!
//! Comparisons do not chain: `a < b < c` is rejected.
//!
//! ```
//! use i18n_gen_core::expression::parse_expression;
//!
//! let expr = parse_expression("count == 0 || !verbose").unwrap();
//! assert_eq!(expr.identifiers(), vec!["count", "verbose"]);
//! ```

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed guard size in bytes.
pub const MAX_EXPRESSION_BYTES: usize = 4 * 1024;
/// Maximum nesting depth for parentheses and negations.
pub const MAX_EXPRESSION_NESTING: usize = 32;

// ============================================================================
// SECTION: AST
// ============================================================================

/// Binary operators in guard expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Logical OR (`||`).
    Or,
    /// Logical AND (`&&`).
    And,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl BinaryOp {
    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns the binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
        }
    }
}

/// Parsed guard expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Variable reference, as spelled in the guard.
    Ident(String),
    /// Integer literal.
    Int(i64),
    /// String literal with escapes resolved.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// Logical negation.
    Not(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Returns identifier references in source order, duplicates included.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    /// Appends identifiers to `out` in source order.
    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Ident(name) => out.push(name),
            Self::Int(_) | Self::Str(_) | Self::Bool(_) => {}
            Self::Not(inner) => inner.collect_identifiers(out),
            Self::Binary {
                lhs,
                rhs,
                ..
            } => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded [`MAX_EXPRESSION_BYTES`].
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded [`MAX_EXPRESSION_NESTING`].
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Byte offset in the input.
        position: usize,
    },
    /// Unexpected token encountered during lexing or parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// String literal has no closing quote.
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// String literal uses an unsupported escape.
    InvalidEscape {
        /// Escaped character.
        escape: char,
        /// Byte offset of the backslash.
        position: usize,
    },
    /// Integer literal does not fit in `i64`.
    InvalidNumber {
        /// The raw numeric text.
        raw: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// Unexpected trailing input after a complete expression.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "expression is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => write!(f, "expression exceeds size limit: {actual_bytes} bytes (max {max_bytes})"),
            Self::NestingTooDeep {
                max_depth,
                position,
            } => write!(f, "expression nesting exceeds {max_depth} at {position}"),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(f, "unexpected token `{found}` at {position}, expected {expected}"),
            Self::UnterminatedString {
                position,
            } => write!(f, "unterminated string starting at {position}"),
            Self::InvalidEscape {
                escape,
                position,
            } => write!(f, "invalid escape `\\{escape}` at {position}"),
            Self::InvalidNumber {
                raw,
                position,
            } => write!(f, "invalid number `{raw}` at {position}"),
            Self::TrailingInput {
                position,
            } => write!(f, "unexpected trailing input at {position}"),
        }
    }
}

impl std::error::Error for ExprError {}

/// Errors raised while validating a guard against known variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The guard does not parse.
    Syntax(ExprError),
    /// The guard references an identifier the resolver does not know.
    UnknownVariable(String),
    /// The identifier folds to a known variable but is spelled differently.
    Respelled {
        /// Raw name of the variable the identifier folds to.
        variable: String,
        /// Identifier as written in the guard.
        identifier: String,
        /// Shared folded key.
        folded: String,
    },
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses a guard expression.
///
/// # Errors
/// Returns [`ExprError`] for oversized, malformed, or overly nested input.
pub fn parse_expression(input: &str) -> Result<Expr, ExprError> {
    if input.len() > MAX_EXPRESSION_BYTES {
        return Err(ExprError::InputTooLarge {
            max_bytes: MAX_EXPRESSION_BYTES,
            actual_bytes: input.len(),
        });
    }
    let tokens = Lexer::new(input).lex()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_or()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Parses `input` and checks every identifier with `resolve`.
///
/// Identifiers are checked in source order and the first rejection is
/// returned.
///
/// # Errors
/// Returns [`GuardError::Syntax`] when parsing fails, otherwise the first
/// error `resolve` reports.
pub fn validate_guard<F>(input: &str, resolve: F) -> Result<Expr, GuardError>
where
    F: Fn(&str) -> Result<(), GuardError>,
{
    let expr = parse_expression(input).map_err(GuardError::Syntax)?;
    for identifier in expr.identifiers() {
        resolve(identifier)?;
    }
    Ok(expr)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier.
    Ident(&'a str),
    /// Unsigned integer digits.
    Int(&'a str),
    /// String literal with escapes resolved.
    Str(String),
    /// `true`.
    True,
    /// `false`.
    False,
    /// `||`.
    Or,
    /// `&&`.
    And,
    /// `!`.
    Not,
    /// `-`.
    Minus,
    /// Comparison operator.
    Compare(BinaryOp),
    /// `(`.
    LParen,
    /// `)`.
    RParen,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for guard expressions.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
    /// Tokens produced so far.
    tokens: Vec<SpannedToken<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            tokens: Vec::new(),
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(mut self) -> Result<Vec<SpannedToken<'a>>, ExprError> {
        let bytes = self.input.as_bytes();
        while let Some(&ch) = bytes.get(self.offset) {
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => self.offset += 1,
                b'(' => self.push(Token::LParen, 1),
                b')' => self.push(Token::RParen, 1),
                b'-' => self.push(Token::Minus, 1),
                b'&' => self.pair(b'&', Token::And, None, "`&&`")?,
                b'|' => self.pair(b'|', Token::Or, None, "`||`")?,
                b'=' => self.pair(b'=', Token::Compare(BinaryOp::Eq), None, "`==`")?,
                b'!' => self.pair(b'=', Token::Compare(BinaryOp::Ne), Some(Token::Not), "`!`")?,
                b'<' => {
                    self.pair(b'=', Token::Compare(BinaryOp::Le), Some(Token::Compare(BinaryOp::Lt)), "")?;
                }
                b'>' => {
                    self.pair(b'=', Token::Compare(BinaryOp::Ge), Some(Token::Compare(BinaryOp::Gt)), "")?;
                }
                b'"' => self.string()?,
                b'0' ..= b'9' => {
                    let start = self.offset;
                    self.consume_while(|b| b.is_ascii_digit());
                    self.tokens.push(SpannedToken {
                        token: Token::Int(&self.input[start .. self.offset]),
                        position: start,
                    });
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    let start = self.offset;
                    self.consume_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                    let slice = &self.input[start .. self.offset];
                    self.tokens.push(SpannedToken {
                        token: keyword_or_ident(slice),
                        position: start,
                    });
                }
                _ => {
                    let found = self.input[self.offset ..].chars().next().unwrap_or_default();
                    return Err(ExprError::UnexpectedToken {
                        expected: "identifier, literal, or operator",
                        found: found.to_string(),
                        position: self.offset,
                    });
                }
            }
        }

        if self.tokens.is_empty() {
            return Err(ExprError::EmptyInput);
        }
        self.tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(self.tokens)
    }

    /// Pushes a token at the current offset and advances `width` bytes.
    fn push(&mut self, token: Token<'a>, width: usize) {
        self.tokens.push(SpannedToken {
            token,
            position: self.offset,
        });
        self.offset += width;
    }

    /// Lexes a two-byte operator, falling back to `single` when `second` is absent.
    fn pair(
        &mut self,
        second: u8,
        double: Token<'a>,
        single: Option<Token<'a>>,
        expected: &'static str,
    ) -> Result<(), ExprError> {
        if self.input.as_bytes().get(self.offset + 1) == Some(&second) {
            self.push(double, 2);
            return Ok(());
        }
        match single {
            Some(token) => {
                self.push(token, 1);
                Ok(())
            }
            None => Err(ExprError::UnexpectedToken {
                expected,
                found: char::from(self.input.as_bytes()[self.offset]).to_string(),
                position: self.offset,
            }),
        }
    }

    /// Lexes a double quoted string literal.
    fn string(&mut self) -> Result<(), ExprError> {
        let start = self.offset;
        let mut value = String::new();
        let mut chars = self.input[start + 1 ..].char_indices();
        while let Some((relative, ch)) = chars.next() {
            let position = start + 1 + relative;
            match ch {
                '"' => {
                    self.tokens.push(SpannedToken {
                        token: Token::Str(value),
                        position: start,
                    });
                    self.offset = position + 1;
                    return Ok(());
                }
                '\\' => match chars.next() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, escape)) => {
                        return Err(ExprError::InvalidEscape {
                            escape,
                            position,
                        });
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }
        Err(ExprError::UnterminatedString {
            position: start,
        })
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = self.input.as_bytes().get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }
}

/// Maps a word to a keyword token or identifier token.
fn keyword_or_ident(slice: &str) -> Token<'_> {
    match slice {
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Ident(slice),
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser over lexed tokens.
struct Parser<'a> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'a>>,
    /// Current token index.
    index: usize,
    /// Current nesting depth.
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'a>>) -> Self {
        Self {
            tokens,
            index: 0,
            nesting: 0,
        }
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_and()?;
        while self.matches(&Token::Or) {
            let rhs = self.parse_and()?;
            expr = binary(BinaryOp::Or, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses AND expressions.
    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_comparison()?;
        while self.matches(&Token::And) {
            let rhs = self.parse_comparison()?;
            expr = binary(BinaryOp::And, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses a single, non-chaining comparison.
    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.parse_unary()?;
        let Token::Compare(op) = self.current().token else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.parse_unary()?;
        if matches!(self.current().token, Token::Compare(_)) {
            return Err(ExprError::UnexpectedToken {
                expected: "`&&`, `||`, or `)` (comparisons do not chain)",
                found: self.describe_current(),
                position: self.current().position,
            });
        }
        Ok(binary(op, lhs, rhs))
    }

    /// Parses prefix negation.
    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let position = self.current().position;
        if self.matches(&Token::Not) {
            return self.with_nesting(position, |parser| {
                Ok(Expr::Not(Box::new(parser.parse_unary()?)))
            });
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let SpannedToken {
            token,
            position,
        } = self.current().clone();
        match token {
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name.to_string()))
            }
            Token::Int(raw) => {
                self.advance();
                parse_int(raw, false, position)
            }
            Token::Minus => {
                self.advance();
                match self.current().token {
                    Token::Int(raw) => {
                        self.advance();
                        parse_int(raw, true, position)
                    }
                    _ => Err(ExprError::UnexpectedToken {
                        expected: "integer after `-`",
                        found: self.describe_current(),
                        position: self.current().position,
                    }),
                }
            }
            Token::Str(value) => {
                self.advance();
                Ok(Expr::Str(value))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_or()?;
                    parser.expect(&Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            Token::Or
            | Token::And
            | Token::Not
            | Token::Compare(_)
            | Token::RParen
            | Token::Eof => Err(ExprError::UnexpectedToken {
                expected: "identifier, literal, or `(`",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_EXPRESSION_NESTING {
            return Err(ExprError::NestingTooDeep {
                max_depth: MAX_EXPRESSION_NESTING,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: &Token<'_>, expected: &'static str) -> Result<(), ExprError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), ExprError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(ExprError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it has the same kind as `kind`.
    fn matches(&mut self, kind: &Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token.
    fn current(&self) -> &SpannedToken<'a> {
        debug_assert!(self.index < self.tokens.len(), "parser index out of bounds");
        &self.tokens[self.index]
    }

    /// Advances to the next token, stopping at end-of-input.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match &self.current().token {
            Token::Ident(raw) | Token::Int(raw) => (*raw).to_string(),
            Token::Str(value) => format!("\"{value}\""),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::Or => "||".to_string(),
            Token::And => "&&".to_string(),
            Token::Not => "!".to_string(),
            Token::Minus => "-".to_string(),
            Token::Compare(op) => op.as_str().to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// Builds a boxed binary node.
fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Parses integer digits, applying a leading minus when `negative`.
fn parse_int(raw: &str, negative: bool, position: usize) -> Result<Expr, ExprError> {
    let text = if negative { format!("-{raw}") } else { raw.to_string() };
    text.parse::<i64>().map(Expr::Int).map_err(|_| ExprError::InvalidNumber {
        raw: text,
        position,
    })
}
