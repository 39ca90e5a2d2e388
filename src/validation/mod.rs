//! Local validation run before a message is sent.
//!
//! Validation never fails with an error. Every verdict is a [`SendResult`] or
//! a [`SendResponse`] so callers can handle rejected messages the same way as
//! messages rejected by the server.

use crate::config::UNSET_SERVER_ID;
use crate::types::{
    AddressResult, BasicMessage, BulkMessage, EmailAddress, MessageBase, SendResponse, SendResult,
};

/// Maximum number of recipients allowed on a single message.
pub const MAXIMUM_RECIPIENTS_PER_MESSAGE: usize = 50;

/// Validates credentials and messages ahead of a send.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::{BasicMessage, SendResult};
/// use integrations_socketlabs::validation::SendValidator;
///
/// let message = BasicMessage::new()
///     .subject("Hello")
///     .from("from@example.com")
///     .plain_text_body("Body");
///
/// let response = SendValidator::validate_basic_message(&message);
/// assert_eq!(response.result, SendResult::RecipientValidationNoneInMessage);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SendValidator;

impl SendValidator {
    /// Check the server id and API key.
    pub fn validate_credentials(server_id: i32, api_key: &str) -> SendResponse {
        if api_key.trim().is_empty() {
            return SendResult::AuthenticationValidationFailed.into();
        }

        // Both conditions are required; a negative id other than the unset
        // sentinel is left for the server to reject.
        if server_id == UNSET_SERVER_ID && server_id <= 0 {
            return SendResult::AuthenticationValidationFailed.into();
        }

        SendResult::Success.into()
    }

    /// Check the fields shared by every message variant. The first failing
    /// rule decides the result.
    pub fn validate_message_base(message: &MessageBase) -> SendResult {
        if message.subject.trim().is_empty() {
            return SendResult::MessageValidationEmptySubject;
        }

        let from = match message.from.as_ref() {
            Some(from) if !from.email.is_empty() => from,
            _ => return SendResult::EmailAddressValidationMissingFrom,
        };

        if !from.is_valid() {
            return SendResult::EmailAddressValidationInvalidFrom;
        }

        if let Some(reply_to) = message.reply_to.as_ref() {
            if !reply_to.is_blank() && !reply_to.is_valid() {
                return SendResult::RecipientValidationInvalidReplyTo;
            }
        }

        if !message.has_body() {
            return SendResult::MessageValidationEmptyMessage;
        }

        if !message.custom_headers.iter().all(|header| header.is_valid()) {
            return SendResult::MessageValidationInvalidCustomHeaders;
        }

        if !message.metadata.iter().all(|entry| entry.is_valid()) {
            return SendResult::MessageValidationInvalidMetadata;
        }

        SendResult::Success
    }

    /// Check the To, Cc and Bcc recipients of a basic message.
    pub fn validate_basic_recipients(message: &BasicMessage) -> SendResponse {
        let count = message.recipient_count();
        if count == 0 {
            return SendResult::RecipientValidationNoneInMessage.into();
        }
        if count > MAXIMUM_RECIPIENTS_PER_MESSAGE {
            return SendResult::RecipientValidationMaxExceeded.into();
        }

        let invalid: Vec<AddressResult> = message
            .to
            .iter()
            .chain(&message.cc)
            .chain(&message.bcc)
            .filter(|address| !address.is_valid())
            .map(|address: &EmailAddress| AddressResult::invalid(address.email.clone()))
            .collect();

        recipients_verdict(invalid)
    }

    /// Check the recipients of a bulk message.
    pub fn validate_bulk_recipients(message: &BulkMessage) -> SendResponse {
        if message.to.is_empty() {
            return SendResult::RecipientValidationMissingTo.into();
        }
        if message.to.len() > MAXIMUM_RECIPIENTS_PER_MESSAGE {
            return SendResult::RecipientValidationMaxExceeded.into();
        }

        let invalid: Vec<AddressResult> = message
            .to
            .iter()
            .filter(|recipient| !recipient.is_valid())
            .map(|recipient| AddressResult::invalid(recipient.email.clone()))
            .collect();

        recipients_verdict(invalid)
    }

    /// Validate a basic message: shared fields first, then recipients.
    pub fn validate_basic_message(message: &BasicMessage) -> SendResponse {
        match Self::validate_message_base(&message.base) {
            SendResult::Success => Self::validate_basic_recipients(message),
            failure => failure.into(),
        }
    }

    /// Validate a bulk message: shared fields first, then recipients.
    pub fn validate_bulk_message(message: &BulkMessage) -> SendResponse {
        match Self::validate_message_base(&message.base) {
            SendResult::Success => Self::validate_bulk_recipients(message),
            failure => failure.into(),
        }
    }
}

fn recipients_verdict(invalid: Vec<AddressResult>) -> SendResponse {
    if invalid.is_empty() {
        return SendResult::Success.into();
    }

    SendResponse {
        result: SendResult::RecipientValidationInvalidRecipients,
        transaction_receipt: None,
        address_results: invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BulkRecipient, CustomHeader, Metadata};
    use rstest::rstest;

    fn valid_base() -> BasicMessage {
        BasicMessage::new()
            .subject("Subject")
            .from("from@example.com")
            .plain_text_body("Body")
    }

    fn basic_with_recipients(count: usize) -> BasicMessage {
        (0..count).fold(valid_base(), |message, i| {
            message.add_to(format!("user{}@example.com", i))
        })
    }

    #[rstest]
    #[case(1, "", SendResult::AuthenticationValidationFailed)]
    #[case(1, "   ", SendResult::AuthenticationValidationFailed)]
    #[case(i32::MIN, "key", SendResult::AuthenticationValidationFailed)]
    #[case(-1, "key", SendResult::Success)]
    #[case(0, "key", SendResult::Success)]
    #[case(10000, "key", SendResult::Success)]
    fn test_validate_credentials(
        #[case] server_id: i32,
        #[case] api_key: &str,
        #[case] expected: SendResult,
    ) {
        assert_eq!(
            SendValidator::validate_credentials(server_id, api_key).result,
            expected
        );
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("\t\n")]
    fn test_blank_subject_wins_over_everything(#[case] subject: &str) {
        let mut base = MessageBase::default();
        base.subject = subject.to_string();
        base.from = Some(EmailAddress::new("$$##%%"));

        assert_eq!(
            SendValidator::validate_message_base(&base),
            SendResult::MessageValidationEmptySubject
        );
    }

    #[test]
    fn test_missing_from() {
        let mut message = valid_base();
        message.base.from = None;
        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::EmailAddressValidationMissingFrom
        );

        message.base.from = Some(EmailAddress::with_name("", "Sender"));
        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::EmailAddressValidationMissingFrom
        );
    }

    #[rstest]
    #[case("$$##%%")]
    #[case("   ")]
    #[case("from@@example.com")]
    fn test_invalid_from(#[case] from: &str) {
        let message = valid_base().from(from);
        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::EmailAddressValidationInvalidFrom
        );
    }

    #[test]
    fn test_reply_to() {
        let blank = valid_base().reply_to(("", " "));
        assert_eq!(
            SendValidator::validate_message_base(&blank.base),
            SendResult::Success
        );

        let invalid = valid_base().reply_to("not-an-address");
        assert_eq!(
            SendValidator::validate_message_base(&invalid.base),
            SendResult::RecipientValidationInvalidReplyTo
        );

        let named_only = valid_base().reply_to(("", "Support"));
        assert_eq!(
            SendValidator::validate_message_base(&named_only.base),
            SendResult::RecipientValidationInvalidReplyTo
        );
    }

    #[test]
    fn test_body_rules() {
        let mut message = valid_base();
        message.base.plain_text_body = None;
        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::MessageValidationEmptyMessage
        );

        let amp_only = message.clone().amp_body("<html amp></html>");
        assert_eq!(
            SendValidator::validate_message_base(&amp_only.base),
            SendResult::MessageValidationEmptyMessage
        );

        let sentinel_template = message.clone().api_template(0);
        assert_eq!(
            SendValidator::validate_message_base(&sentinel_template.base),
            SendResult::MessageValidationEmptyMessage
        );

        let template = message.clone().api_template(42);
        assert_eq!(
            SendValidator::validate_message_base(&template.base),
            SendResult::Success
        );

        let html = message.html_body("<p>hi</p>");
        assert_eq!(
            SendValidator::validate_message_base(&html.base),
            SendResult::Success
        );
    }

    #[test]
    fn test_headers_checked_before_metadata() {
        let mut message = valid_base();
        message.base.custom_headers.push(CustomHeader::new("X-Empty", ""));
        message.base.metadata.push(Metadata::new("", "value"));

        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::MessageValidationInvalidCustomHeaders
        );

        message.base.custom_headers.clear();
        assert_eq!(
            SendValidator::validate_message_base(&message.base),
            SendResult::MessageValidationInvalidMetadata
        );
    }

    #[rstest]
    #[case(0, SendResult::RecipientValidationNoneInMessage)]
    #[case(1, SendResult::Success)]
    #[case(50, SendResult::Success)]
    #[case(51, SendResult::RecipientValidationMaxExceeded)]
    fn test_basic_recipient_count(#[case] count: usize, #[case] expected: SendResult) {
        let message = basic_with_recipients(count);
        assert_eq!(SendValidator::validate_basic_message(&message).result, expected);
    }

    #[test]
    fn test_recipient_limit_spans_all_lists() {
        let mut message = basic_with_recipients(20);
        for i in 0..20 {
            message = message.add_cc(format!("cc{}@example.com", i));
        }
        for i in 0..11 {
            message = message.add_bcc(format!("bcc{}@example.com", i));
        }

        assert_eq!(
            SendValidator::validate_basic_recipients(&message).result,
            SendResult::RecipientValidationMaxExceeded
        );
    }

    #[test]
    fn test_invalid_recipients_are_all_reported_in_order() {
        let message = valid_base()
            .add_to("ok@example.com")
            .add_to("bad to@example.com")
            .add_cc("bad-cc")
            .add_bcc("ok2@example.com")
            .add_bcc("@bad-bcc.com");

        let response = SendValidator::validate_basic_message(&message);
        assert_eq!(response.result, SendResult::RecipientValidationInvalidRecipients);

        let emails: Vec<_> = response
            .address_results
            .iter()
            .map(|result| result.email_address.as_str())
            .collect();
        assert_eq!(emails, vec!["bad to@example.com", "bad-cc", "@bad-bcc.com"]);
        assert!(response
            .address_results
            .iter()
            .all(|result| !result.accepted && result.error_code == "InvalidAddress"));
    }

    #[test]
    fn test_bulk_recipients() {
        let base = BulkMessage::new()
            .subject("Subject")
            .from("from@example.com")
            .html_body("<p>Body</p>");

        assert_eq!(
            SendValidator::validate_bulk_message(&base).result,
            SendResult::RecipientValidationMissingTo
        );

        let too_many = (0..51).fold(base.clone(), |message, i| {
            message.add_to(format!("user{}@example.com", i))
        });
        assert_eq!(
            SendValidator::validate_bulk_message(&too_many).result,
            SendResult::RecipientValidationMaxExceeded
        );

        let with_invalid = base
            .clone()
            .add_to(BulkRecipient::new("good@example.com"))
            .add_to(BulkRecipient::new("bad;addr@example.com"));
        let response = SendValidator::validate_bulk_message(&with_invalid);
        assert_eq!(response.result, SendResult::RecipientValidationInvalidRecipients);
        assert_eq!(response.address_results.len(), 1);
        assert_eq!(response.address_results[0].email_address, "bad;addr@example.com");

        let valid = base.add_to("good@example.com");
        assert!(SendValidator::validate_bulk_message(&valid).is_success());
    }

    #[test]
    fn test_base_failure_short_circuits_recipients() {
        let message = BasicMessage::new().subject("Subject").add_to("bad");
        let response = SendValidator::validate_basic_message(&message);

        assert_eq!(response.result, SendResult::EmailAddressValidationMissingFrom);
        assert!(response.address_results.is_empty());
    }

    #[test]
    fn test_validation_is_repeatable() {
        let message = valid_base().add_to("x").add_cc("y@example.com");
        let first = SendValidator::validate_basic_message(&message);
        let second = SendValidator::validate_basic_message(&message);
        assert_eq!(first, second);
    }
}
