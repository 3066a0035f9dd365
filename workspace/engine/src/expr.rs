//! Restricted expression language used by rule triggers, guards and
//! value expressions.
//!
//! Expressions read named fields out of a [`common::Snapshot`] and
//! combine them with comparison, boolean, membership, string-predicate
//! and arithmetic operators. Literals cover strings (either quote
//! style), integers, decimals, booleans, `none` (also spelled `null`)
//! and bracketed lists. There are no function calls and no way to reach
//! anything outside the snapshot, which keeps user-authored rules
//! sandboxed.
//!
//! ```text
//! 'Netflix' in description and amount < 20
//! description contains 'Salary' or 'income' in tag_names
//! account_name in ['Checking', 'Joint'] and not is_paid
//! description startswith 'AMZN' and category_name == none
//! ```

pub mod ast;
mod eval;
mod parser;
mod token;

use std::sync::{Arc, Mutex, OnceLock};

use cached::{Cached, SizedCache};
use common::{Snapshot, Value};

pub use ast::Expr;

use crate::error::{EngineError, Result};

/// Rule sets are small; this mostly exists to bound memory when rules
/// are edited repeatedly.
const COMPILED_CACHE_SIZE: usize = 512;

fn compiled_cache() -> &'static Mutex<SizedCache<String, Arc<Expr>>> {
    static CACHE: OnceLock<Mutex<SizedCache<String, Arc<Expr>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(SizedCache::with_size(COMPILED_CACHE_SIZE)))
}

/// Parses an expression into its tree form, reusing a previously
/// compiled tree when the same source was seen before. Parse failures
/// are not cached; they are rare and cheap to reproduce.
pub fn compile(source: &str) -> Result<Arc<Expr>> {
    let key = source.to_string();

    if let Ok(mut cache) = compiled_cache().lock() {
        if let Some(found) = cache.cache_get(&key) {
            return Ok(found.clone());
        }
    }

    let expr = Arc::new(parser::parse(source)?);

    if let Ok(mut cache) = compiled_cache().lock() {
        cache.cache_set(key, expr.clone());
    }

    Ok(expr)
}

/// Compiles and evaluates an expression against a snapshot.
pub fn evaluate(source: &str, snapshot: &Snapshot) -> Result<Value> {
    let expr = compile(source)?;
    eval::eval(&expr, snapshot)
}

/// Like [`evaluate`], but requires the result to be a boolean. Triggers
/// and guards go through here.
pub fn evaluate_bool(source: &str, snapshot: &Snapshot) -> Result<bool> {
    match evaluate(source, snapshot)? {
        Value::Bool(b) => Ok(b),
        other => Err(EngineError::Expression(format!(
            "expression must produce a boolean, got {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_reuses_cached_tree() {
        let source = "amount > 100 and is_paid";
        let first = compile(source).unwrap();
        let second = compile(source).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_evaluate_bool_rejects_non_boolean() {
        let mut snapshot = Snapshot::new();
        snapshot.set("description", "Rent");

        assert!(matches!(
            evaluate_bool("description", &snapshot),
            Err(EngineError::Expression(_))
        ));
        assert!(evaluate_bool("description == 'Rent'", &snapshot).unwrap());
    }

    #[test]
    fn test_evaluate_containment_trigger() {
        let mut snapshot = Snapshot::new();
        snapshot.set("description", "Netflix Monthly");
        snapshot.set("is_paid", true);

        assert!(evaluate_bool("description contains 'Netflix'", &snapshot).unwrap());
        assert!(!evaluate_bool("description contains 'Spotify'", &snapshot).unwrap());
    }
}
