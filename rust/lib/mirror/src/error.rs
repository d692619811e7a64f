use catalog_client::ApiError;
use catalog_types::{EntityId, ValidationError};
use thiserror::Error;

/// Why a synchronized operation did not happen. The mirror is unchanged
/// in every case.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required fields missing; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request failed.
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// Save called with no edit buffer open.
    #[error("no {0} is open for editing")]
    NothingOpen(&'static str),

    /// The id is not in the mirror.
    #[error("{entity} {id} is not loaded")]
    NotLoaded { entity: &'static str, id: EntityId },

    /// The operation does not apply to the record in its current state.
    #[error("{0}")]
    Refused(String),
}

impl SyncError {
    /// Text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Validation(e) => format!(
                "Please fill in all required fields: {}.",
                e.missing.join(", ")
            ),
            SyncError::Remote(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = SyncError::from(ValidationError {
            entity: "client",
            missing: vec!["name", "email"],
        });
        assert_eq!(
            err.user_message(),
            "Please fill in all required fields: name, email."
        );
    }

    #[test]
    fn remote_message_is_static() {
        let a = SyncError::from(ApiError::Http { status: 404 });
        let b = SyncError::from(ApiError::Http { status: 500 });
        assert_eq!(a.user_message(), b.user_message());
    }
}
