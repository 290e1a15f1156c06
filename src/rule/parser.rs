//! Recursive-descent parser for rule expressions
//!
//! ```text
//! Expression := OrExpr
//! OrExpr     := AndExpr ( "OR" AndExpr )*
//! AndExpr    := Unary ( "AND" Unary )*
//! Unary      := "NOT" Unary | Primary
//! Primary    := "(" Expression ")" | Comparison
//! Comparison := Identifier ( "NOT"? "IN" List | CompareOp Literal )
//! List       := "[" Literal ( "," Literal )* "]"
//! Literal    := String | Number | Boolean
//! ```

use crate::error::{Result, RuleError};
use crate::rule::ast::{ComparisonOp, Expr, Literal};
use crate::rule::lexer::Tokenizer;
use crate::rule::token::{Token, TokenKind};
use smallvec::{smallvec, SmallVec};

/// Maximum nesting of parentheses and NOT operators
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum AND, OR and NOT operators in one expression
///
/// Bounds the depth of the folded tree, which evaluation, printing and
/// dropping all walk recursively.
pub const MAX_OPERATORS: usize = 1024;

/// Parse a rule expression into an AST, rejecting trailing input
pub fn parse(source: &str) -> Result<Expr> {
    if source.trim().is_empty() {
        return Err(RuleError::EmptyExpression);
    }

    let mut parser = Parser::new(source)?;
    let expr = parser.parse_expression()?;
    parser.ensure_end()?;
    Ok(expr)
}

/// Parser state: the token stream plus one token of lookahead
pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
    current: Token,
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut tokens = Tokenizer::new(source);
        let current = tokens.next_token()?;
        Ok(Self {
            tokens,
            current,
            depth: 0,
            operators: 0,
        })
    }

    /// Lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    /// Fail if anything follows the parsed expression
    pub fn ensure_end(&self) -> Result<()> {
        if self.current.is(TokenKind::End) {
            Ok(())
        } else {
            Err(RuleError::TrailingInput {
                found: self.current.to_string(),
                position: self.current.position,
            })
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.current.is(TokenKind::Or) {
            self.count_operator()?;
            self.advance()?;
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while self.current.is(TokenKind::And) {
            self.count_operator()?;
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if !self.current.is(TokenKind::Not) {
            return self.parse_primary();
        }

        self.enter()?;
        self.count_operator()?;
        self.advance()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::negate(operand))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        if !self.current.is(TokenKind::LeftParen) {
            return self.parse_comparison();
        }

        self.enter()?;
        self.advance()?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RightParen, "')'")?;
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let question_id = self.expect(TokenKind::Identifier, "question identifier")?.lexeme;

        let operator = match self.current.kind {
            TokenKind::Not => {
                self.advance()?;
                self.expect(TokenKind::In, "IN after NOT")?;
                ComparisonOp::NotIn
            }
            TokenKind::In => {
                self.advance()?;
                ComparisonOp::In
            }
            TokenKind::Equals => self.advance_with(ComparisonOp::Equals)?,
            TokenKind::NotEquals => self.advance_with(ComparisonOp::NotEquals)?,
            TokenKind::GreaterOrEqual => self.advance_with(ComparisonOp::GreaterOrEqual)?,
            TokenKind::Greater => self.advance_with(ComparisonOp::Greater)?,
            TokenKind::LessOrEqual => self.advance_with(ComparisonOp::LessOrEqual)?,
            TokenKind::Less => self.advance_with(ComparisonOp::Less)?,
            _ => return Err(self.unexpected("comparison operator")),
        };

        let values = if operator.takes_list() {
            self.parse_list()?
        } else {
            smallvec![self.parse_literal()?]
        };

        Ok(Expr::comparison(question_id, operator, values))
    }

    fn parse_list(&mut self) -> Result<SmallVec<[Literal; 4]>> {
        self.expect(TokenKind::LeftBracket, "'['")?;

        let mut values: SmallVec<[Literal; 4]> = smallvec![self.parse_literal()?];
        while self.current.is(TokenKind::Comma) {
            self.advance()?;
            values.push(self.parse_literal()?);
        }

        self.expect(TokenKind::RightBracket, "']'")?;
        Ok(values)
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let literal = match self.current.kind {
            TokenKind::String => Literal::String(self.current.lexeme.clone()),
            TokenKind::Number => {
                // Digit strings past f64 range parse as infinity
                let n = self
                    .current
                    .lexeme
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| RuleError::InvalidNumber {
                        lexeme: self.current.lexeme.clone(),
                        position: self.current.position,
                    })?;
                Literal::Number(n)
            }
            TokenKind::Boolean => Literal::Boolean(self.current.lexeme.eq_ignore_ascii_case("true")),
            _ => return Err(self.unexpected("literal value")),
        };
        self.advance()?;
        Ok(literal)
    }

    /// Move to the next token, returning the one just consumed
    fn advance(&mut self) -> Result<Token> {
        let next = self.tokens.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    #[inline]
    fn advance_with(&mut self, op: ComparisonOp) -> Result<ComparisonOp> {
        self.advance()?;
        Ok(op)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.current.is(kind) {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> RuleError {
        RuleError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current.to_string(),
            position: self.current.position,
        }
    }

    fn count_operator(&mut self) -> Result<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(RuleError::TooManyOperators {
                limit: MAX_OPERATORS,
                position: self.current.position,
            });
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(RuleError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position: self.current.position,
            });
        }
        Ok(())
    }
}
