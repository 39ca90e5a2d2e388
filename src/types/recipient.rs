//! Bulk message recipients.

use std::fmt;

use super::address::is_valid_address;
use super::MergeData;

/// A recipient of a bulk message, with its own merge field values.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::BulkRecipient;
///
/// let recipient = BulkRecipient::with_name("ada@example.com", "Ada")
///     .merge_field("Plan", "Pro")
///     .merge_field("Seats", "3");
///
/// assert!(recipient.is_valid());
/// assert_eq!(recipient.merge_data.get("plan"), Some("Pro"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRecipient {
    /// Email address of the recipient.
    pub email: String,
    /// Display name of the recipient.
    pub display_name: Option<String>,
    /// Merge field values for this recipient.
    pub merge_data: MergeData,
}

impl BulkRecipient {
    /// Create a recipient without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            merge_data: MergeData::new(),
        }
    }

    /// Create a recipient with a display name.
    pub fn with_name(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: Some(display_name.into()),
            merge_data: MergeData::new(),
        }
    }

    /// Replace the merge data.
    pub fn with_merge_data(mut self, merge_data: MergeData) -> Self {
        self.merge_data = merge_data;
        self
    }

    /// Add or replace one merge field.
    pub fn merge_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.merge_data.insert(field, value);
        self
    }

    /// Add or replace one merge field in place.
    pub fn add_merge_field(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.merge_data.insert(field, value);
        self
    }

    /// Whether the address passes the syntax rules of [`is_valid_address`].
    pub fn is_valid(&self) -> bool {
        is_valid_address(&self.email)
    }
}

impl fmt::Display for BulkRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => write!(f, "{} <{}>", name, self.email),
            _ => f.write_str(&self.email),
        }
    }
}

impl From<&str> for BulkRecipient {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for BulkRecipient {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}
