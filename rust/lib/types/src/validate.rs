use thiserror::Error;

use crate::EntityId;

/// Required-field validation failure, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}: required field(s) missing: {}", .missing.join(", "))]
pub struct ValidationError {
    pub entity: &'static str,
    pub missing: Vec<&'static str>,
}

/// Client-side required-field check for a record about to be saved.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collects missing required fields for one entity.
///
/// ```
/// use catalog_types::RequiredFields;
///
/// let err = RequiredFields::new("client")
///     .text("name", "Acme")
///     .text("email", "  ")
///     .finish()
///     .unwrap_err();
/// assert_eq!(err.missing, vec!["email"]);
/// ```
#[derive(Debug)]
pub struct RequiredFields {
    entity: &'static str,
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            missing: Vec::new(),
        }
    }

    /// Text fields must contain something other than whitespace.
    pub fn text(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(field);
        }
        self
    }

    /// Foreign keys must reference a saved record.
    pub fn id(mut self, field: &'static str, value: EntityId) -> Self {
        if value <= 0 {
            self.missing.push(field);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                entity: self.entity,
                missing: self.missing,
            })
        }
    }
}
