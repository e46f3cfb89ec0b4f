//! People attached to a meeting.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::domain::foundation::{UserId, ValidationError};

/// Internal user responsible for a meeting, with the contact details
/// notifications are sent to. Identity is the `id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

impl UserRef {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        mobile: Option<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        Ok(Self {
            id,
            name: name.into(),
            email,
            mobile: mobile.filter(|m| !m.trim().is_empty()),
        })
    }

    /// Name to greet the user with, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

impl PartialEq for UserRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserRef {}

impl Hash for UserRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for UserRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// External party the meeting is held with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderRef {
    pub name: String,
    pub company: Option<String>,
}

impl StakeholderRef {
    pub fn new(name: impl Into<String>, company: Option<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("stakeholder.name"));
        }
        Ok(Self { name, company })
    }

    /// "Name (Company)" or just the name.
    pub fn label(&self) -> String {
        match &self.company {
            Some(company) if !company.trim().is_empty() => format!("{} ({})", self.name, company),
            _ => self.name.clone(),
        }
    }
}
