//! Application layer errors.
//!
//! These errors represent failures while loading and assembling templates.
//! Markup and expression rule violations are `DomainError` from
//! `crate::domain`; here they are wrapped with the file they came from.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::error::ErrorCategory;

/// Errors that occur while rendering a view.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A template file does not exist.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// The template source failed for another reason.
    #[error("Failed to read {path}: {reason}")]
    SourceError { path: PathBuf, reason: String },

    /// An `<import>` element could not be resolved.
    #[error("Invalid import in {file}: {reason}")]
    InvalidImport { file: PathBuf, reason: String },

    /// A template imports itself, directly or through other imports.
    #[error("Import cycle: {}", format_chain(.chain))]
    ImportCycle { chain: Vec<PathBuf> },

    /// A `#{...}` placeholder failed to evaluate.
    #[error("Failed to evaluate #{{{expression}}} in {file}: {source}")]
    Evaluation {
        file: PathBuf,
        expression: String,
        source: DomainError,
    },

    /// Template text is not well-formed markup.
    #[error("Malformed template {file}: {source}")]
    MalformedTemplate { file: PathBuf, source: DomainError },

    /// Store access failed (lock poisoned).
    #[error("Template store error")]
    StoreLockError,
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path } => vec![
                format!("No file at: {}", path.display()),
                "Check the views root and the file name".into(),
                "Try: stitch list to see available views".into(),
            ],
            Self::SourceError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the file is readable".into(),
            ],
            Self::InvalidImport { .. } => vec![
                "Every <import> needs a non-empty src attribute".into(),
                "Example: <import src=\"partials/header.html\"></import>".into(),
            ],
            Self::ImportCycle { chain } => vec![
                format!("{} templates import each other in a loop", chain.len().saturating_sub(1)),
                "Remove one of the <import> elements along the chain".into(),
            ],
            Self::Evaluation { source, .. } | Self::MalformedTemplate { source, .. } => {
                source.suggestions()
            }
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidImport { .. }
            | Self::ImportCycle { .. }
            | Self::MalformedTemplate { .. } => ErrorCategory::Validation,
            Self::Evaluation { .. } => ErrorCategory::Evaluation,
            Self::SourceError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_chain() {
        let err = ApplicationError::ImportCycle {
            chain: vec!["/v/a.html".into(), "/v/b.html".into(), "/v/a.html".into()],
        };
        assert_eq!(
            err.to_string(),
            "Import cycle: /v/a.html -> /v/b.html -> /v/a.html"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn evaluation_message_names_expression() {
        let err = ApplicationError::Evaluation {
            file: "/v/index.html".into(),
            expression: "user.name".into(),
            source: DomainError::UndefinedIdentifier { name: "user".into() },
        };
        assert_eq!(
            err.to_string(),
            "Failed to evaluate #{user.name} in /v/index.html: 'user' is not defined"
        );
        assert_eq!(err.category(), ErrorCategory::Evaluation);
    }
}
