use common::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::token::{tokenize, Token};
use crate::error::{EngineError, Result};

/// Recursive descent parser over the token stream.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expr       := and_expr ( "or" and_expr )*
/// and_expr   := not_expr ( "and" not_expr )*
/// not_expr   := "not" not_expr | comparison
/// comparison := additive ( cmp_op additive )?
/// additive   := term ( ("+" | "-") term )*
/// term       := factor ( ("*" | "/") factor )*
/// factor     := "-" factor | primary
/// primary    := literal | field | list | "(" expr ")"
/// list       := "[" ( expr ( "," expr )* ","? )? "]"
/// ```
///
/// Comparisons do not chain; `a < b < c` is a parse error.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse(source: &str) -> Result<Expr> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(EngineError::Expression("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or_expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(EngineError::Expression(format!(
            "unexpected token {:?} after expression",
            token
        ))),
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::Or) {
            let right = self.and_expr()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut left = self.not_expr()?;
        while self.eat(&Token::And) {
            let right = self.not_expr()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            let inner = self.not_expr()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        let left = self.additive()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinaryOp::Eq,
            Some(Token::Ne) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            Some(Token::In) => BinaryOp::In,
            Some(Token::Contains) => BinaryOp::Contains,
            Some(Token::StartsWith) => BinaryOp::StartsWith,
            Some(Token::EndsWith) => BinaryOp::EndsWith,
            Some(Token::Not) => {
                self.advance();
                if !self.eat(&Token::In) {
                    return Err(EngineError::Expression(
                        "expected 'in' after 'not'".to_string(),
                    ));
                }
                let right = self.additive()?;
                return Ok(Expr::Binary(BinaryOp::NotIn, Box::new(left), Box::new(right)));
            }
            _ => return Ok(left),
        };
        self.advance();
        let right = self.additive()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr> {
        if self.eat(&Token::Minus) {
            let inner = self.factor()?;
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Token::Decimal(d)) => Ok(Expr::Literal(Value::Decimal(d))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::Null) => Ok(Expr::Literal(Value::Null)),
            Some(Token::Ident(name)) => Ok(Expr::Field(name)),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(EngineError::Expression("missing ')'".to_string()));
                }
                Ok(inner)
            }
            Some(Token::LBracket) => {
                let mut items = Vec::new();
                if !self.eat(&Token::RBracket) {
                    loop {
                        items.push(self.or_expr()?);
                        if self.eat(&Token::Comma) {
                            // Trailing comma before the closing bracket.
                            if self.eat(&Token::RBracket) {
                                break;
                            }
                            continue;
                        }
                        if self.eat(&Token::RBracket) {
                            break;
                        }
                        return Err(EngineError::Expression(
                            "expected ',' or ']' in list".to_string(),
                        ));
                    }
                }
                Ok(Expr::List(items))
            }
            other => Err(EngineError::Expression(format!(
                "expected a value, found {:?}",
                other
            ))),
        }
    }
}
