use rust_decimal::Decimal;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Decimal(Decimal),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    And,
    Or,
    Not,
    In,
    Contains,
    StartsWith,
    EndsWith,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

/// Splits an expression source string into tokens. Strings accept both
/// quote styles; keywords are case-sensitive.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Eq);
                } else {
                    return Err(EngineError::Expression(
                        "single '=' is not an operator, use '=='".to_string(),
                    ));
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ne);
                } else {
                    return Err(EngineError::Expression(
                        "unexpected '!', use 'not'".to_string(),
                    ));
                }
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for ch in chars.by_ref() {
                    if ch == quote {
                        closed = true;
                        break;
                    }
                    text.push(ch);
                }
                if !closed {
                    return Err(EngineError::Expression("unterminated string".to_string()));
                }
                tokens.push(Token::Str(text));
            }
            '0'..='9' => {
                let mut number = String::new();
                let mut is_decimal = false;
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() {
                        number.push(ch);
                        chars.next();
                    } else if ch == '.' && !is_decimal {
                        is_decimal = true;
                        number.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if is_decimal {
                    let value = number.parse::<Decimal>().map_err(|_| {
                        EngineError::Expression(format!("invalid number '{}'", number))
                    })?;
                    tokens.push(Token::Decimal(value));
                } else {
                    let value = number.parse::<i64>().map_err(|_| {
                        EngineError::Expression(format!("invalid number '{}'", number))
                    })?;
                    tokens.push(Token::Int(value));
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        word.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "in" => Token::In,
                    "contains" => Token::Contains,
                    "startswith" => Token::StartsWith,
                    "endswith" => Token::EndsWith,
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" | "none" => Token::Null,
                    _ => Token::Ident(word),
                });
            }
            other => {
                return Err(EngineError::Expression(format!(
                    "unexpected character '{}'",
                    other
                )));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tokenize_mixed_expression() {
        let tokens = tokenize("amount >= 9.99 and 'media' in tag_names").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("amount".to_string()),
                Token::Ge,
                Token::Decimal(Decimal::from_str("9.99").unwrap()),
                Token::And,
                Token::Str("media".to_string()),
                Token::In,
                Token::Ident("tag_names".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_lists_and_text_predicates() {
        let tokens = tokenize("category_name in [none, 'Rent'] or description startswith 'AMZN'")
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("category_name".to_string()),
                Token::In,
                Token::LBracket,
                Token::Null,
                Token::Comma,
                Token::Str("Rent".to_string()),
                Token::RBracket,
                Token::Or,
                Token::Ident("description".to_string()),
                Token::StartsWith,
                Token::Str("AMZN".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_both_quote_styles() {
        assert_eq!(
            tokenize("\"a'b\"").unwrap(),
            vec![Token::Str("a'b".to_string())]
        );
        assert_eq!(tokenize("'x'").unwrap(), vec![Token::Str("x".to_string())]);
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert!(tokenize("amount = 3").is_err());
        assert!(tokenize("'unterminated").is_err());
        assert!(tokenize("a ? b").is_err());
    }
}
