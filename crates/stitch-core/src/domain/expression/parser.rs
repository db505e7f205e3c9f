//! Recursive-descent parser producing an [`Expr`] tree.

use super::lexer::{Spanned, Token};
use super::value::Value;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Ident(String),
    This,
    Array(Vec<Expr>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Deepest expression tree the parser builds. Evaluation recurses once per
/// level, so this also bounds the evaluator's stack use.
const MAX_DEPTH: usize = 128;

pub(super) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Byte length of the source, used as the offset of "end of input".
    end: usize,
    depth: usize,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Spanned>, end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            depth: 0,
        }
    }

    pub(super) fn parse(mut self) -> Result<Expr, DomainError> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }
        let expr = self.conditional()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.offset)
    }

    fn error(&self, reason: &str) -> DomainError {
        DomainError::ExpressionSyntax {
            offset: self.offset(),
            reason: reason.to_string(),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), DomainError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    /// One level deeper into the tree; callers reset `depth` when they return.
    fn descend(&mut self) -> Result<(), DomainError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression is nested too deeply"));
        }
        Ok(())
    }

    fn conditional(&mut self) -> Result<Expr, DomainError> {
        let base = self.depth;
        self.descend()?;
        let test = self.nullish()?;
        if !self.eat(&Token::Question) {
            self.depth = base;
            return Ok(test);
        }
        let consequent = self.conditional()?;
        self.expect(&Token::Colon, "':' in conditional expression")?;
        let alternate = self.conditional()?;
        self.depth = base;
        Ok(Expr::Conditional(
            Box::new(test),
            Box::new(consequent),
            Box::new(alternate),
        ))
    }

    /// Left-associative logical level; each operator deepens the tree.
    fn logical_level(
        &mut self,
        token: &Token,
        op: LogicalOp,
        next: fn(&mut Self) -> Result<Expr, DomainError>,
    ) -> Result<Expr, DomainError> {
        let base = self.depth;
        let mut left = next(self)?;
        while self.eat(token) {
            self.descend()?;
            let right = next(self)?;
            left = Expr::Logical(op, Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn nullish(&mut self) -> Result<Expr, DomainError> {
        self.logical_level(&Token::Nullish, LogicalOp::Nullish, Self::or)
    }

    fn or(&mut self) -> Result<Expr, DomainError> {
        self.logical_level(&Token::OrOr, LogicalOp::Or, Self::and)
    }

    fn and(&mut self) -> Result<Expr, DomainError> {
        self.logical_level(&Token::AndAnd, LogicalOp::And, Self::equality)
    }

    /// Left-associative binary level driven by a token → operator table.
    fn binary_level(
        &mut self,
        table: &[(Token, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, DomainError>,
    ) -> Result<Expr, DomainError> {
        let base = self.depth;
        let mut left = next(self)?;
        loop {
            let Some(op) = self
                .peek()
                .and_then(|t| table.iter().find(|(tok, _)| tok == t))
                .map(|(_, op)| *op)
            else {
                self.depth = base;
                return Ok(left);
            };
            self.pos += 1;
            self.descend()?;
            let right = next(self)?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn equality(&mut self) -> Result<Expr, DomainError> {
        self.binary_level(
            &[(Token::Eq, BinaryOp::Eq), (Token::Ne, BinaryOp::Ne)],
            Self::relational,
        )
    }

    fn relational(&mut self) -> Result<Expr, DomainError> {
        self.binary_level(
            &[
                (Token::Lt, BinaryOp::Lt),
                (Token::Le, BinaryOp::Le),
                (Token::Gt, BinaryOp::Gt),
                (Token::Ge, BinaryOp::Ge),
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Result<Expr, DomainError> {
        self.binary_level(
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            Self::multiplicative,
        )
    }

    fn multiplicative(&mut self) -> Result<Expr, DomainError> {
        self.binary_level(
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Slash, BinaryOp::Div),
                (Token::Percent, BinaryOp::Rem),
            ],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr, DomainError> {
        let op = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.postfix(),
        };
        self.pos += 1;
        let base = self.depth;
        self.descend()?;
        let operand = self.unary()?;
        self.depth = base;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn postfix(&mut self) -> Result<Expr, DomainError> {
        let base = self.depth;
        let mut expr = self.primary()?;
        loop {
            if matches!(self.peek(), Some(Token::Dot | Token::LBracket)) {
                self.descend()?;
            }
            if self.eat(&Token::Dot) {
                match self.peek().cloned() {
                    Some(Token::Ident(name)) => {
                        self.pos += 1;
                        expr = Expr::Member(Box::new(expr), name);
                    }
                    _ => return Err(self.error("expected property name after '.'")),
                }
            } else if self.eat(&Token::LBracket) {
                let index = self.conditional()?;
                self.expect(&Token::RBracket, "']'")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                self.depth = base;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, DomainError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of expression"));
        };

        let expr = match token {
            Token::Number(n) => Expr::Literal(Value::Number(n)),
            Token::Str(s) => Expr::Literal(Value::String(s)),
            Token::Ident(name) => match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" => Expr::Literal(Value::Null),
                "undefined" => Expr::Literal(Value::Undefined),
                "NaN" => Expr::Literal(Value::Number(f64::NAN)),
                "Infinity" => Expr::Literal(Value::Number(f64::INFINITY)),
                "this" => Expr::This,
                _ => Expr::Ident(name),
            },
            Token::LParen => {
                self.pos += 1;
                let inner = self.conditional()?;
                self.expect(&Token::RParen, "')'")?;
                return Ok(inner);
            }
            Token::LBracket => {
                self.pos += 1;
                return self.array_literal();
            }
            _ => return Err(self.error("unexpected token")),
        };

        self.pos += 1;
        Ok(expr)
    }

    fn array_literal(&mut self) -> Result<Expr, DomainError> {
        let mut items = Vec::new();
        if self.eat(&Token::RBracket) {
            return Ok(Expr::Array(items));
        }
        loop {
            items.push(self.conditional()?);
            if self.eat(&Token::RBracket) {
                return Ok(Expr::Array(items));
            }
            self.expect(&Token::Comma, "',' or ']'")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse(src: &str) -> Result<Expr, DomainError> {
        Parser::new(tokenize(src)?, src.len()).parse()
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Value::Number(n)))
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::Binary(
                BinaryOp::Add,
                num(1.0),
                Box::new(Expr::Binary(BinaryOp::Mul, num(2.0), num(3.0)))
            )
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse("5 - 2 - 1").unwrap(),
            Expr::Binary(
                BinaryOp::Sub,
                Box::new(Expr::Binary(BinaryOp::Sub, num(5.0), num(2.0))),
                num(1.0)
            )
        );
    }

    #[test]
    fn conditional_is_right_associative() {
        let expr = parse("a ? 1 : b ? 2 : 3").unwrap();
        let Expr::Conditional(_, _, alternate) = expr else {
            panic!("expected conditional");
        };
        assert!(matches!(*alternate, Expr::Conditional(..)));
    }

    #[test]
    fn member_and_index_chain() {
        assert_eq!(
            parse("a.b[0]").unwrap(),
            Expr::Index(
                Box::new(Expr::Member(Box::new(Expr::Ident("a".into())), "b".into())),
                num(0.0)
            )
        );
    }

    #[test]
    fn errors_carry_offsets() {
        assert_eq!(
            parse("1 +"),
            Err(DomainError::ExpressionSyntax {
                offset: 3,
                reason: "unexpected end of expression".into()
            })
        );
        assert!(matches!(
            parse("(1"),
            Err(DomainError::ExpressionSyntax { offset: 2, .. })
        ));
        assert!(matches!(
            parse("1 2"),
            Err(DomainError::ExpressionSyntax { offset: 2, .. })
        ));
        assert!(parse("   ").is_err());
    }

    fn too_deep(result: Result<Expr, DomainError>) -> bool {
        matches!(
            result,
            Err(DomainError::ExpressionSyntax { ref reason, .. }) if reason.contains("nested too deeply")
        )
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let bangs = format!("{}1", "!".repeat(10_000));
        assert!(too_deep(parse(&bangs)));

        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(too_deep(parse(&parens)));

        let chain = vec!["1"; 10_000].join(" + ");
        assert!(too_deep(parse(&chain)));

        let members = format!("a{}", ".b".repeat(10_000));
        assert!(too_deep(parse(&members)));
    }

    #[test]
    fn ordinary_nesting_is_accepted() {
        let bangs = format!("{}1", "!".repeat(MAX_DEPTH / 2));
        assert!(parse(&bangs).is_ok());
        let chain = vec!["1"; 50].join(" + ");
        assert!(parse(&chain).is_ok());
        assert!(parse("((a.b[c] ? -x : !y) || z) ?? [1, [2, [3]]]").is_ok());
    }
}
