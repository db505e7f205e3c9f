//! Restricted expression evaluator for `#{...}` placeholders.
//!
//! Expressions see the render scope as bare names (`#{user.name}`), plus
//! literals, arithmetic, comparisons, logical operators and `? :`. There is
//! no function call syntax and no access to anything outside the scope, so
//! evaluation always terminates and cannot execute code.

mod lexer;
mod parser;
mod value;

use std::cmp::Ordering;

pub use parser::{BinaryOp, Expr, LogicalOp, UnaryOp};
pub use value::Value;

use crate::domain::{error::DomainError, scope::Scope};

/// Parse an expression without evaluating it.
pub fn parse(source: &str) -> Result<Expr, DomainError> {
    let tokens = lexer::tokenize(source)?;
    parser::Parser::new(tokens, source.len()).parse()
}

/// Parse and evaluate `source` against `scope`.
pub fn evaluate(source: &str, scope: &Scope) -> Result<Value, DomainError> {
    let expr = parse(source)?;
    eval(&expr, scope)
}

/// Evaluate a parsed expression against `scope`.
pub fn eval(expr: &Expr, scope: &Scope) -> Result<Value, DomainError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => scope
            .get(name)
            .map(Value::from)
            .ok_or_else(|| DomainError::UndefinedIdentifier { name: name.clone() }),
        Expr::This => Ok(Value::Object(
            scope
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect(),
        )),
        Expr::Array(items) => items
            .iter()
            .map(|item| eval(item, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::Member(target, property) => member(eval(target, scope)?, property),
        Expr::Index(target, index) => {
            let target = eval(target, scope)?;
            let index = eval(index, scope)?;
            index_value(target, &index)
        }
        Expr::Unary(op, operand) => {
            let operand = eval(operand, scope)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!operand.is_truthy()),
                UnaryOp::Neg => Value::Number(-operand.to_number()),
                UnaryOp::Plus => Value::Number(operand.to_number()),
            })
        }
        Expr::Binary(op, left, right) => {
            let left = eval(left, scope)?;
            let right = eval(right, scope)?;
            Ok(binary(*op, &left, &right))
        }
        Expr::Logical(op, left, right) => {
            let left = eval(left, scope)?;
            let short_circuit = match op {
                LogicalOp::And => !left.is_truthy(),
                LogicalOp::Or => left.is_truthy(),
                LogicalOp::Nullish => !left.is_nullish(),
            };
            if short_circuit {
                Ok(left)
            } else {
                eval(right, scope)
            }
        }
        Expr::Conditional(test, consequent, alternate) => {
            if eval(test, scope)?.is_truthy() {
                eval(consequent, scope)
            } else {
                eval(alternate, scope)
            }
        }
    }
}

fn nullish_access(target: &Value, property: &str) -> DomainError {
    DomainError::NullMemberAccess {
        property: property.to_string(),
        target: target.type_name(),
    }
}

fn member(target: Value, property: &str) -> Result<Value, DomainError> {
    match target {
        Value::Undefined | Value::Null => Err(nullish_access(&target, property)),
        Value::Object(mut map) => Ok(map.remove(property).unwrap_or(Value::Undefined)),
        Value::Array(items) if property == "length" => Ok(Value::Number(items.len() as f64)),
        // Characters, matching what indexing counts.
        Value::String(s) if property == "length" => Ok(Value::Number(s.chars().count() as f64)),
        _ => Ok(Value::Undefined),
    }
}

fn index_value(target: Value, index: &Value) -> Result<Value, DomainError> {
    match (target, index) {
        (target @ (Value::Undefined | Value::Null), index) => {
            Err(nullish_access(&target, &index.to_display_string()))
        }
        (Value::Array(mut items), Value::Number(n)) => {
            let n = *n;
            if n >= 0.0 && n.fract() == 0.0 && (n as usize) < items.len() {
                Ok(items.swap_remove(n as usize))
            } else {
                Ok(Value::Undefined)
            }
        }
        (Value::String(s), Value::Number(n)) => Ok(if *n >= 0.0 && n.fract() == 0.0 {
            s.chars()
                .nth(*n as usize)
                .map_or(Value::Undefined, |c| Value::String(c.to_string()))
        } else {
            Value::Undefined
        }),
        (target, index) => member(target, &index.to_display_string()),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => {
            let concat = |v: &Value| {
                matches!(v, Value::String(_) | Value::Array(_) | Value::Object(_))
            };
            if concat(left) || concat(right) {
                Value::String(format!("{left}{right}"))
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Eq => Value::Bool(left.strict_equals(right)),
        BinaryOp::Ne => Value::Bool(!left.strict_equals(right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

/// Strings compare lexically, everything else numerically. `None` when a
/// side is `NaN`.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}
