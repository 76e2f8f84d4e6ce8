use sea_orm::error::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced by the domain layer.
///
/// The taxonomy is limited to field-constraint violations: everything else
/// (missing rows, connection failures, transactions) belongs to the storage
/// collaborator. The derived pricing/stock queries themselves never fail.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more declarative field constraints were violated
    /// (required/not-blank, numeric range, string length).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The storage collaborator reported a SKU uniqueness violation.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),
}

impl DomainError {
    /// Names of the fields that failed validation, empty for other variants.
    pub fn violated_fields(&self) -> Vec<&'static str> {
        match self {
            DomainError::Validation(errors) => errors.field_errors().keys().copied().collect(),
            _ => Vec::new(),
        }
    }
}

/// Lifecycle hooks run inside the storage collaborator, so constraint
/// violations must travel back through its error type.
impl From<DomainError> for DbErr {
    fn from(err: DomainError) -> Self {
        DbErr::Custom(err.to_string())
    }
}
