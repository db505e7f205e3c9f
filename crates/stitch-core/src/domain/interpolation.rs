//! `#{expression}` placeholder substitution over serialized markup.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{error::DomainError, expression, scope::Scope};

const OPEN: &str = "#{";
const CLOSE: char = '}';

/// A placeholder that failed to evaluate.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to evaluate #{{{expression}}}: {source}")]
pub struct PlaceholderError {
    pub expression: String,
    pub source: DomainError,
}

/// One `#{...}` occurrence: byte range of the whole placeholder and the
/// expression text between the braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub start: usize,
    pub end: usize,
    pub expression: &'a str,
}

/// Find placeholders left to right. The first `}` ends a placeholder and an
/// empty body (`#{}`) is not one.
pub fn placeholders(content: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = content[cursor..].find(OPEN) {
        let start = cursor + rel;
        let body_start = start + OPEN.len();
        let Some(body_len) = content[body_start..].find(CLOSE) else {
            break;
        };
        if body_len == 0 {
            cursor = body_start;
            continue;
        }
        let end = body_start + body_len + 1;
        found.push(Placeholder {
            start,
            end,
            expression: &content[body_start..end - 1],
        });
        cursor = end;
    }

    found
}

/// Replace every placeholder with the display string of its value.
///
/// Identical expression texts are evaluated once. Substituted text is not
/// scanned again, so values containing `#{` come through literally.
pub fn interpolate(content: &str, scope: &Scope) -> Result<String, PlaceholderError> {
    let found = placeholders(content);
    if found.is_empty() {
        return Ok(content.to_string());
    }

    let mut values: HashMap<&str, String> = HashMap::new();
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;

    for placeholder in found {
        if !values.contains_key(placeholder.expression) {
            let value = expression::evaluate(placeholder.expression, scope).map_err(|source| {
                PlaceholderError {
                    expression: placeholder.expression.to_string(),
                    source,
                }
            })?;
            values.insert(placeholder.expression, value.to_display_string());
        }

        out.push_str(&content[copied..placeholder.start]);
        out.push_str(&values[placeholder.expression]);
        copied = placeholder.end;
    }
    out.push_str(&content[copied..]);

    Ok(out)
}
