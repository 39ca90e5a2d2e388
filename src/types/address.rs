//! Email address type and address syntax rules.

use std::fmt;

/// Longest address accepted, more lenient than the 256 limit of RFC 5321.
pub const MAXIMUM_ADDRESS_LENGTH: usize = 320;

const DISALLOWED_CHARACTERS: [char; 4] = [',', ' ', ';', '\u{00BF}'];

/// Check an address against the Injection API's syntax rules.
///
/// An address is valid when it is not blank, contains exactly one `@`, has a
/// non-blank local part and domain part, is at most
/// [`MAXIMUM_ADDRESS_LENGTH`] characters long, and contains none of
/// `,`, space, `;` or `¿`.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::is_valid_address;
///
/// assert!(is_valid_address("user@example.com"));
/// assert!(!is_valid_address("$$##%%"));
/// assert!(!is_valid_address("first last@example.com"));
/// ```
pub fn is_valid_address(email: &str) -> bool {
    if email.trim().is_empty() {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if email.chars().count() > MAXIMUM_ADDRESS_LENGTH {
        return false;
    }

    if local.trim().is_empty() || domain.trim().is_empty() {
        return false;
    }

    !email.contains(&DISALLOWED_CHARACTERS[..])
}

/// Represents an email address with optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    /// Email address (e.g., "user@example.com").
    pub email: String,
    /// Display name (e.g., "John Doe").
    pub display_name: Option<String>,
}

impl EmailAddress {
    /// Create a new email address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    /// Create a new email address with a display name.
    pub fn with_name(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// Whether the address passes the syntax rules of [`is_valid_address`].
    pub fn is_valid(&self) -> bool {
        is_valid_address(&self.email)
    }

    /// Whether both the address and the display name are blank.
    pub fn is_blank(&self) -> bool {
        self.email.trim().is_empty()
            && self
                .display_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => write!(f, "{} <{}>", name, self.email),
            _ => f.write_str(&self.email),
        }
    }
}

impl From<String> for EmailAddress {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<&str> for EmailAddress {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl<E: Into<String>, N: Into<String>> From<(E, N)> for EmailAddress {
    fn from((email, display_name): (E, N)) -> Self {
        Self::with_name(email, display_name)
    }
}
