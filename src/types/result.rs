//! Send results returned by the client.

use serde::{Deserialize, Deserializer};
use std::fmt;

macro_rules! send_results {
    ($($(#[$attr:meta])* $variant:ident => $description:literal,)+) => {
        /// Result code of a send, either produced locally by validation or
        /// returned by the Injection API.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum SendResult {
            $(
                #[doc = $description]
                $(#[$attr])*
                $variant,
            )+
        }

        impl SendResult {
            /// Every result code, in declaration order.
            pub const ALL: &'static [SendResult] = &[$(SendResult::$variant,)+];

            /// The code as it appears on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SendResult::$variant => stringify!($variant),)+
                }
            }

            /// Human readable description of the code.
            pub fn description(&self) -> &'static str {
                match self {
                    $(SendResult::$variant => $description,)+
                }
            }
        }
    };
}

send_results! {
    #[default]
    UnknownError => "An error has occurred that was unforeseen",
    Timeout => "A timeout occurred sending the message",
    Success => "Successful send of message",
    Warning => "Warnings were found while sending the message",
    InternalError => "Internal server error",
    MessageTooLarge => "Message size has exceeded the size limit",
    TooManyRecipients => "Message exceeded maximum recipient count in the message",
    InvalidData => "Invalid data was found on the message",
    OverQuota => "The account is over the send quota, rate limit exceeded",
    TooManyErrors => "Too many errors occurred sending the message",
    InvalidAuthentication => "The ServerId/ApiKey combination is invalid",
    AccountDisabled => "The account has been disabled",
    TooManyMessages => "Too many messages were found in the request",
    NoValidRecipients => "No valid recipients were found in the message",
    InvalidAddress => "An invalid recipient was found on the message",
    InvalidAttachment => "An invalid attachment was found on the message",
    NoMessages => "No message body was found in the message",
    EmptyMessage => "No message body was found in the message",
    EmptySubject => "No subject was found in the message",
    InvalidFrom => "An invalid from address was found on the message",
    EmptyToAddress => "No To addresses were found in the message",
    NoValidBodyParts => "No valid message body was found in the message",
    InvalidTemplateId => "An invalid TemplateId was found in the message",
    TemplateHasNoContent => "The specified TemplateId has no content for the message",
    MessageBodyConflict => "A conflict occurred on the message body of the message",
    InvalidMergeData => "Invalid MergeData was found on the message",
    AuthenticationValidationFailed => "Authentication Error, Missing or invalid ServerId or ApiKey",
    EmailAddressValidationMissingFrom => "From email address is missing in the message",
    EmailAddressValidationInvalidFrom => "From email address in the message is invalid",
    RecipientValidationMaxExceeded => "Message exceeded maximum recipient count in the message",
    RecipientValidationNoneInMessage => "No recipients were found in the message",
    RecipientValidationMissingTo => "To addresses are missing in the message",
    RecipientValidationInvalidReplyTo => "Invalid ReplyTo address found",
    RecipientValidationInvalidRecipients => "Invalid recipients found",
    MessageValidationEmptySubject => "No subject was found in the message",
    MessageValidationEmptyMessage => "No message body was found in the message",
    MessageValidationInvalidCustomHeaders => "Invalid custom headers found",
    MessageValidationInvalidMetadata => "Invalid metadata found",
}

impl SendResult {
    /// Parse a wire code, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_socketlabs::types::SendResult;
    ///
    /// assert_eq!(SendResult::from_code("success"), Some(SendResult::Success));
    /// assert_eq!(SendResult::from_code("NotARealCode"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|result| result.as_str().eq_ignore_ascii_case(code))
    }

    /// Parse a wire code, mapping anything unrecognized to `UnknownError`.
    pub fn from_code_or_unknown(code: Option<&str>) -> Self {
        code.and_then(Self::from_code)
            .unwrap_or(SendResult::UnknownError)
    }
}

impl fmt::Display for SendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single recipient address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AddressResult {
    /// The recipient address.
    #[serde(deserialize_with = "null_as_empty")]
    pub email_address: String,
    /// Whether the address was accepted.
    pub accepted: bool,
    /// Error code for rejected addresses.
    #[serde(deserialize_with = "null_as_empty")]
    pub error_code: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AddressResult {
    /// Result for an address rejected by local validation.
    pub fn invalid(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            accepted: false,
            error_code: "InvalidAddress".to_string(),
        }
    }
}

impl fmt::Display for AddressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.email_address)
    }
}

/// The response of a send: the overall result plus per-address details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendResponse {
    /// Overall result.
    pub result: SendResult,
    /// Receipt identifying the injection transaction.
    pub transaction_receipt: Option<String>,
    /// Per-address results, present for invalid recipients or server
    /// diagnostics.
    pub address_results: Vec<AddressResult>,
}

impl SendResponse {
    /// Create a response with no receipt or address results.
    pub fn new(result: SendResult) -> Self {
        Self {
            result,
            transaction_receipt: None,
            address_results: Vec::new(),
        }
    }

    /// Whether the result is `Success`.
    pub fn is_success(&self) -> bool {
        self.result == SendResult::Success
    }

    /// Human readable description of the result.
    pub fn response_message(&self) -> &'static str {
        self.result.description()
    }
}

impl From<SendResult> for SendResponse {
    fn from(result: SendResult) -> Self {
        Self::new(result)
    }
}

impl fmt::Display for SendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.result, self.response_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_ignores_case_and_whitespace() {
        assert_eq!(SendResult::from_code("Warning"), Some(SendResult::Warning));
        assert_eq!(SendResult::from_code("WARNING"), Some(SendResult::Warning));
        assert_eq!(
            SendResult::from_code("  invalidauthentication "),
            Some(SendResult::InvalidAuthentication)
        );
        assert_eq!(SendResult::from_code(""), None);
    }

    #[test]
    fn test_from_code_or_unknown() {
        assert_eq!(
            SendResult::from_code_or_unknown(Some("OverQuota")),
            SendResult::OverQuota
        );
        assert_eq!(
            SendResult::from_code_or_unknown(Some("SomethingNew")),
            SendResult::UnknownError
        );
        assert_eq!(SendResult::from_code_or_unknown(None), SendResult::UnknownError);
    }

    #[test]
    fn test_default_is_unknown_error() {
        assert_eq!(SendResult::default(), SendResult::UnknownError);
        assert_eq!(SendResponse::default().result, SendResult::UnknownError);
        assert_eq!(SendResult::ALL[0], SendResult::UnknownError);
    }

    #[test]
    fn test_every_code_round_trips_through_its_name() {
        for result in SendResult::ALL {
            assert_eq!(SendResult::from_code(result.as_str()), Some(*result));
        }
    }

    #[test]
    fn test_response_message() {
        let response = SendResponse::new(SendResult::MessageValidationEmptySubject);
        assert_eq!(response.response_message(), "No subject was found in the message");
        assert_eq!(
            response.to_string(),
            "MessageValidationEmptySubject: No subject was found in the message"
        );
        assert!(!response.is_success());
    }

    #[test]
    fn test_address_result_deserialize() {
        let json = r#"{"EmailAddress":"a@b.com","Accepted":false,"ErrorCode":"InvalidAddress"}"#;
        let result: AddressResult = serde_json::from_str(json).unwrap();

        assert_eq!(result, AddressResult::invalid("a@b.com"));
        assert_eq!(result.to_string(), "InvalidAddress: a@b.com");
    }

    #[test]
    fn test_address_result_tolerates_null_and_missing_fields() {
        let json = r#"{"EmailAddress":"ok@b.com","Accepted":true,"ErrorCode":null}"#;
        let result: AddressResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.error_code, "");
        assert!(result.accepted);

        let result: AddressResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, AddressResult::default());
    }
}
