//! Group domain model.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned group identifier.
pub type GroupId = i64;

/// User-defined contact category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    BlankName,
}

impl Display for GroupValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "group name cannot be blank"),
        }
    }
}

impl Error for GroupValidationError {}

/// Trims a user-entered group name and rejects blank values.
pub fn normalize_group_name(name: &str) -> Result<String, GroupValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GroupValidationError::BlankName);
    }
    Ok(trimmed.to_string())
}
