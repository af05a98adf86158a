use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Malformed input, rejected before anything reaches the store.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Completion attempted on a subtopic with no plan or no logged time.
    #[error(
        "Subtopic {subtopic_id} cannot be completed yet (expected {expected_hours}h, spent {hours_spent}h)"
    )]
    IneligibleCompletion {
        subtopic_id: i64,
        expected_hours: f64,
        hours_spent: f64,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The persistence call failed; nothing was applied.
    #[error("Storage error: {0}")]
    Collaborator(String),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, TrackerError::Collaborator(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Validation(msg) => msg.clone(),
            TrackerError::IneligibleCompletion { .. } => {
                "Log time for this subtopic before marking it complete".to_string()
            }
            TrackerError::NotFound { entity, id } => format!("{} {} not found", entity, id),
            TrackerError::Collaborator(_) => {
                "Something went wrong saving your change; please try again".to_string()
            }
        }
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(e: rusqlite::Error) -> Self {
        TrackerError::Collaborator(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_collaborator_errors_are_retryable() {
        assert!(TrackerError::Collaborator("disk full".into()).is_retryable());
        assert!(!TrackerError::validation("bad").is_retryable());
        assert!(!TrackerError::NotFound {
            entity: "Skill",
            id: 1
        }
        .is_retryable());
        assert!(!TrackerError::IneligibleCompletion {
            subtopic_id: 1,
            expected_hours: 0.0,
            hours_spent: 0.0
        }
        .is_retryable());
    }

    #[test]
    fn ineligible_message_differs_from_validation() {
        let ineligible = TrackerError::IneligibleCompletion {
            subtopic_id: 3,
            expected_hours: 2.0,
            hours_spent: 0.0,
        };
        let validation = TrackerError::validation("Duration must be greater than 0 minutes");

        assert!(ineligible.user_message().contains("Log time"));
        assert_ne!(ineligible.user_message(), validation.user_message());
    }

    #[test]
    fn collaborator_message_hides_driver_detail() {
        let err = TrackerError::Collaborator("database is locked".into());
        assert!(!err.user_message().contains("locked"));
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn rusqlite_errors_map_to_collaborator() {
        let err: TrackerError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, TrackerError::Collaborator(_)));
    }
}
