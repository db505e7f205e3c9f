// ============================================================================
// domain/error.rs - MARKUP AND EXPRESSION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so a cached failure can be reported more than once)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Markup Errors
    // ========================================================================
    #[error("malformed markup at byte {offset}: {reason}")]
    MalformedMarkup { offset: usize, reason: String },

    // ========================================================================
    // Expression Errors
    // ========================================================================
    #[error("syntax error in expression at byte {offset}: {reason}")]
    ExpressionSyntax { offset: usize, reason: String },

    #[error("'{name}' is not defined")]
    UndefinedIdentifier { name: String },

    #[error("cannot read property '{property}' of {target}")]
    NullMemberAccess {
        property: String,
        target: &'static str,
    },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    // ========================================================================
    // Scope Errors
    // ========================================================================
    #[error("scope must be a JSON object, got {found}")]
    InvalidScope { found: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedMarkup { reason, .. } => vec![
                format!("Markup problem: {}", reason),
                "Check for unclosed comments, tags, or attribute quotes".into(),
            ],
            Self::ExpressionSyntax { .. } => vec![
                "Placeholders accept literals, names, member access, arithmetic, comparisons and `? :`"
                    .into(),
                "Example: #{user.name}, #{count + 1}, #{admin ? 'yes' : 'no'}".into(),
            ],
            Self::UndefinedIdentifier { name } => vec![
                format!("Add '{}' to the render scope", name),
                "Only scope keys and built-in literals are visible inside placeholders".into(),
            ],
            Self::NullMemberAccess { property, .. } => vec![
                format!("The value holding '{}' is missing from the scope", property),
                "Use `??` to supply a fallback".into(),
            ],
            Self::InvalidScope { .. } => {
                vec!["Pass the scope as a JSON object: {\"key\": \"value\"}".into()]
            }
            Self::UnsupportedOperation(_) => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedMarkup { .. } | Self::InvalidScope { .. } => ErrorCategory::Validation,
            Self::ExpressionSyntax { .. }
            | Self::UndefinedIdentifier { .. }
            | Self::NullMemberAccess { .. }
            | Self::UnsupportedOperation(_) => ErrorCategory::Evaluation,
        }
    }

    /// `true` for errors raised while evaluating a placeholder.
    pub fn is_evaluation(&self) -> bool {
        self.category() == ErrorCategory::Evaluation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Evaluation,
    NotFound,
    Internal,
}
