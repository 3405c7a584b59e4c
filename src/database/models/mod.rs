pub mod client_request;
pub mod form;
pub mod project;
pub mod team_member;

pub use client_request::{
    ClientRequest, ClientRequestPatch, NewClientRequest, Reply, ReplyInput, ReplySender, RequestStatus, RequestType,
};
pub use form::{FieldType, Form, FormField, FormPatch, NewForm};
pub use project::{NewProject, Project, ProjectPatch, ProjectStatus, TechStackEntry};
pub use team_member::{NewTeamMember, SocialLink, TeamMember, TeamMemberPatch};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Record validation failures, reported back to clients as 400
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingRequiredField(String),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Fresh application-level identifier for a new record
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingRequiredField(field.to_string()))
    } else {
        Ok(())
    }
}

/// Optional links must still be absolute URLs when present
pub(crate) fn optional_url(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    url::Url::parse(value.trim())
        .map(|_| ())
        .map_err(|e| ValidationError::invalid(field, format!("not a valid URL ({})", e)))
}

/// Overwrite `target` when the patch carries a value
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Patch field that tells "absent" (`None`) from an explicit `null` (`Some(None)`)
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_count_as_missing() {
        assert_eq!(
            require("name", "   "),
            Err(ValidationError::MissingRequiredField("name".to_string()))
        );
        assert!(require("name", "Ada").is_ok());
    }

    #[test]
    fn optional_urls() {
        assert!(optional_url("live_url", "").is_ok());
        assert!(optional_url("live_url", "https://example.com").is_ok());
        assert!(optional_url("live_url", "example dot com").is_err());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
