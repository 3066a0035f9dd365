use common::{Snapshot, Value};
use rust_decimal::Decimal;

use super::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{EngineError, Result};

/// Evaluates an expression tree against a snapshot.
///
/// Field lookups are strict: a name the snapshot does not carry is an
/// error, never a silent null. Type mismatches are errors as well, with
/// one deliberate exception: `==` and `!=` across unrelated types
/// compare as not-equal instead of failing, so `category_name == null`
/// and similar guards stay writable.
pub fn eval(expr: &Expr, snapshot: &Snapshot) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Field(name) => match snapshot.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(EngineError::Expression(format!(
                "unknown field '{}'",
                name
            ))),
        },
        Expr::List(items) => items
            .iter()
            .map(|item| eval(item, snapshot))
            .collect::<Result<Vec<Value>>>()
            .map(Value::List),
        Expr::Unary(op, inner) => eval_unary(*op, inner, snapshot),
        Expr::Binary(op, left, right) => eval_binary(*op, left, right, snapshot),
    }
}

fn eval_unary(op: UnaryOp, inner: &Expr, snapshot: &Snapshot) -> Result<Value> {
    let value = eval(inner, snapshot)?;
    match op {
        UnaryOp::Not => match value {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(type_error("not", &other)),
        },
        UnaryOp::Neg => match value {
            Value::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| overflow_error("-")),
            Value::Decimal(d) => Ok(Value::Decimal(-d)),
            other => Err(type_error("-", &other)),
        },
    }
}

fn eval_binary(op: BinaryOp, left: &Expr, right: &Expr, snapshot: &Snapshot) -> Result<Value> {
    // "and"/"or" short-circuit so the right side may reference fields that
    // would not evaluate cleanly when the left side already decides.
    if op == BinaryOp::And || op == BinaryOp::Or {
        let left_value = eval(left, snapshot)?;
        let left_bool = left_value
            .as_bool()
            .ok_or_else(|| type_error("and/or", &left_value))?;
        return match (op, left_bool) {
            (BinaryOp::And, false) => Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => Ok(Value::Bool(true)),
            _ => {
                let right_value = eval(right, snapshot)?;
                right_value
                    .as_bool()
                    .map(Value::Bool)
                    .ok_or_else(|| type_error("and/or", &right_value))
            }
        };
    }

    let left_value = eval(left, snapshot)?;
    let right_value = eval(right, snapshot)?;

    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left_value, &right_value))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(&left_value, &right_value))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare_values(&left_value, &right_value)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        BinaryOp::In => contains(&right_value, &left_value).map(Value::Bool),
        BinaryOp::NotIn => contains(&right_value, &left_value).map(|b| Value::Bool(!b)),
        BinaryOp::Contains => contains(&left_value, &right_value).map(Value::Bool),
        BinaryOp::StartsWith | BinaryOp::EndsWith => {
            let name = if op == BinaryOp::StartsWith {
                "startswith"
            } else {
                "endswith"
            };
            match (&left_value, &right_value) {
                (Value::Str(text), Value::Str(part)) => Ok(Value::Bool(
                    if op == BinaryOp::StartsWith {
                        text.starts_with(part.as_str())
                    } else {
                        text.ends_with(part.as_str())
                    },
                )),
                _ => Err(EngineError::Expression(format!(
                    "'{}' needs two strings, got {} and {}",
                    name,
                    left_value.type_name(),
                    right_value.type_name()
                ))),
            }
        }
        BinaryOp::Add => add_values(&left_value, &right_value),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            numeric_op(op, &left_value, &right_value)
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Int(_) | Value::Decimal(_), Value::Int(_) | Value::Decimal(_)) => {
            left.as_decimal() == right.as_decimal()
        }
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Date(a), Value::Date(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

fn compare_values(left: &Value, right: &Value) -> Result<std::cmp::Ordering> {
    if let (Some(a), Some(b)) = (left.as_decimal(), right.as_decimal()) {
        return Ok(a.cmp(&b));
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
        _ => Err(EngineError::Expression(format!(
            "cannot order {} against {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Membership: list containment or substring.
fn contains(haystack: &Value, needle: &Value) -> Result<bool> {
    match haystack {
        Value::List(items) => Ok(items.iter().any(|item| values_equal(item, needle))),
        Value::Str(text) => match needle {
            Value::Str(part) => Ok(text.contains(part.as_str())),
            other => Err(EngineError::Expression(format!(
                "cannot search a string for {}",
                other.type_name()
            ))),
        },
        other => Err(EngineError::Expression(format!(
            "{} is not searchable",
            other.type_name()
        ))),
    }
}

fn add_values(left: &Value, right: &Value) -> Result<Value> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return Ok(Value::Str(format!("{}{}", a, b)));
    }
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        return a.checked_add(*b).map(Value::Int).ok_or_else(|| overflow_error("+"));
    }
    match (left.as_decimal(), right.as_decimal()) {
        (Some(a), Some(b)) => a
            .checked_add(b)
            .map(Value::Decimal)
            .ok_or_else(|| overflow_error("+")),
        _ => Err(EngineError::Expression(format!(
            "cannot add {} and {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn numeric_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    let symbol = match op {
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        _ => "/",
    };

    if op != BinaryOp::Div {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            let result = match op {
                BinaryOp::Sub => a.checked_sub(*b),
                _ => a.checked_mul(*b),
            };
            return result.map(Value::Int).ok_or_else(|| overflow_error(symbol));
        }
    }

    let (Some(a), Some(b)) = (left.as_decimal(), right.as_decimal()) else {
        return Err(EngineError::Expression(format!(
            "cannot apply '{}' to {} and {}",
            symbol,
            left.type_name(),
            right.type_name()
        )));
    };
    let result = match op {
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        _ => a.checked_div(b),
    };
    result.map(Value::Decimal).ok_or_else(|| {
        if op == BinaryOp::Div && b == Decimal::ZERO {
            EngineError::Expression("division by zero".to_string())
        } else {
            overflow_error(symbol)
        }
    })
}

fn type_error(op: &str, value: &Value) -> EngineError {
    EngineError::Expression(format!("'{}' cannot be applied to {}", op, value.type_name()))
}

fn overflow_error(op: &str) -> EngineError {
    EngineError::Expression(format!("numeric overflow in '{}'", op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::parse;
    use std::str::FromStr;

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::new();
        s.set("description", "Netflix Monthly");
        s.set("amount", Decimal::from_str("9.99").unwrap());
        s.set("is_paid", true);
        s.set("category_name", Value::Null);
        s.set("tag_names", vec!["media", "home"]);
        s.set("tag_ids", vec![3i64, 7i64]);
        s
    }

    fn eval_str(source: &str) -> Result<Value> {
        eval(&parse(source)?, &snapshot())
    }

    #[test]
    fn test_string_containment_both_spellings() {
        assert_eq!(eval_str("'Netflix' in description").unwrap(), Value::Bool(true));
        assert_eq!(
            eval_str("description contains 'Netflix'").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(eval_str("'Spotify' in description").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_list_membership() {
        assert_eq!(eval_str("'media' in tag_names").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("'media' not in tag_names").unwrap(), Value::Bool(false));
        assert_eq!(eval_str("3 in tag_ids").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("tag_ids contains 9").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_list_literals_evaluate_per_element() {
        assert_eq!(eval_str("amount in [9.99, 19.98]").unwrap(), Value::Bool(true));
        assert_eq!(
            eval_str("category_name in [none, 'Rent']").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_str("'x' in ['a', description]").unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_string_prefix_and_suffix() {
        assert_eq!(
            eval_str("description startswith 'Netflix'").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_str("description endswith 'Monthly'").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_str("description startswith 'Monthly'").unwrap(),
            Value::Bool(false)
        );
        assert!(eval_str("amount startswith '9'").is_err());
    }

    #[test]
    fn test_null_comparison_is_forgiving() {
        assert_eq!(eval_str("category_name == null").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("category_name != 'Rent'").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("description == 3").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_numeric_comparison_widens_ints() {
        assert_eq!(eval_str("amount > 9").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("amount <= 9.99").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("amount == 9.99").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_short_circuit_skips_bad_right_side() {
        // The right side would fail on the unknown field, but the left
        // side already decides.
        assert_eq!(
            eval_str("false and no_such_field == 1").unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            eval_str("true or no_such_field == 1").unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        assert!(matches!(
            eval_str("no_such_field == 1 and true"),
            Err(EngineError::Expression(_))
        ));
    }

    #[test]
    fn test_arithmetic_and_concatenation() {
        assert_eq!(
            eval_str("amount * 2").unwrap(),
            Value::Decimal(Decimal::from_str("19.98").unwrap())
        );
        assert_eq!(
            eval_str("'sub-' + description").unwrap(),
            Value::Str("sub-Netflix Monthly".to_string())
        );
        assert_eq!(eval_str("10 / 4").unwrap(), Value::Decimal(Decimal::from_str("2.5").unwrap()));
        assert!(eval_str("1 / 0").is_err());
    }

    #[test]
    fn test_strict_boolean_operands() {
        assert!(eval_str("description and true").is_err());
        assert!(eval_str("not amount").is_err());
    }
}
