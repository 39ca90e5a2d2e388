//! Parses Injection API responses into [`SendResponse`]s.

use serde::Deserialize;
use tracing::debug;

use crate::error::{SocketLabsError, SocketLabsResult};
use crate::http::RawResponse;
use crate::types::{AddressResult, SendResponse, SendResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InjectionResponseDto {
    error_code: Option<String>,
    transaction_receipt: Option<String>,
    message_results: Option<Vec<MessageResultDto>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct MessageResultDto {
    error_code: Option<String>,
    address_results: Option<Vec<AddressResult>>,
}

/// Maps an HTTP status and JSON body to a [`SendResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectionResponseParser;

impl InjectionResponseParser {
    /// Parse a response.
    ///
    /// For a 200 the body's `ErrorCode` decides the result; a `Warning` is
    /// replaced by the error code of the first message result. Other statuses
    /// map to `InternalError` (500), `Timeout` (408), `InvalidAuthentication`
    /// (401) or `UnknownError`, and their body is read on a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Serialization` if a 200 response has an empty
    /// or malformed body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_socketlabs::response::InjectionResponseParser;
    /// use integrations_socketlabs::types::SendResult;
    ///
    /// let body = br#"{"ErrorCode":"Success","TransactionReceipt":"abc"}"#;
    /// let response = InjectionResponseParser::parse(200, body)?;
    ///
    /// assert_eq!(response.result, SendResult::Success);
    /// assert_eq!(response.transaction_receipt.as_deref(), Some("abc"));
    /// # Ok::<(), integrations_socketlabs::error::SocketLabsError>(())
    /// ```
    pub fn parse(status: u16, body: &[u8]) -> SocketLabsResult<SendResponse> {
        let dto = if status == 200 {
            serde_json::from_slice::<InjectionResponseDto>(body).map_err(|e| {
                SocketLabsError::Serialization {
                    message: format!("Invalid Injection API response body: {}", e),
                }
            })?
        } else {
            serde_json::from_slice::<InjectionResponseDto>(body).unwrap_or_else(|e| {
                debug!(status, error = %e, "Ignoring unparseable error response body");
                InjectionResponseDto::default()
            })
        };

        let mut result = match status {
            200 => SendResult::from_code_or_unknown(dto.error_code.as_deref()),
            500 => SendResult::InternalError,
            408 => SendResult::Timeout,
            401 => SendResult::InvalidAuthentication,
            _ => SendResult::UnknownError,
        };

        let first = dto
            .message_results
            .and_then(|results| results.into_iter().next());

        if result == SendResult::Warning {
            if let Some(first) = first.as_ref() {
                result = SendResult::from_code_or_unknown(first.error_code.as_deref());
            }
        }

        Ok(SendResponse {
            result,
            transaction_receipt: dto.transaction_receipt,
            address_results: first
                .and_then(|first| first.address_results)
                .unwrap_or_default(),
        })
    }

    /// Parse a [`RawResponse`].
    pub fn parse_raw(response: &RawResponse) -> SocketLabsResult<SendResponse> {
        Self::parse(response.status, &response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_receipt() {
        let response =
            InjectionResponseParser::parse(200, br#"{"ErrorCode":"Success","TransactionReceipt":"abc"}"#)
                .unwrap();

        assert_eq!(response.result, SendResult::Success);
        assert_eq!(response.transaction_receipt.as_deref(), Some("abc"));
        assert!(response.address_results.is_empty());
    }

    #[test]
    fn test_error_code_is_case_insensitive() {
        let response =
            InjectionResponseParser::parse(200, br#"{"ErrorCode":"overquota"}"#).unwrap();
        assert_eq!(response.result, SendResult::OverQuota);
    }

    #[test]
    fn test_unknown_code_is_unknown_error() {
        let response =
            InjectionResponseParser::parse(200, br#"{"ErrorCode":"BrandNewCode"}"#).unwrap();
        assert_eq!(response.result, SendResult::UnknownError);

        let response = InjectionResponseParser::parse(200, b"{}").unwrap();
        assert_eq!(response.result, SendResult::UnknownError);
    }

    #[test]
    fn test_warning_replaced_by_first_message_result() {
        let body = br#"{
            "ErrorCode": "Warning",
            "TransactionReceipt": "r1",
            "MessageResults": [{
                "Index": 0,
                "ErrorCode": "InvalidAddress",
                "AddressResults": [
                    {"EmailAddress": "bad@example", "Accepted": false, "ErrorCode": "InvalidAddress"},
                    {"EmailAddress": "ok@example.com", "Accepted": true, "ErrorCode": ""}
                ]
            }, {
                "Index": 1,
                "ErrorCode": "Success"
            }]
        }"#;

        let response = InjectionResponseParser::parse(200, body).unwrap();

        assert_eq!(response.result, SendResult::InvalidAddress);
        assert_eq!(response.transaction_receipt.as_deref(), Some("r1"));
        assert_eq!(response.address_results.len(), 2);
        assert_eq!(response.address_results[0], AddressResult::invalid("bad@example"));
        assert!(response.address_results[1].accepted);
    }

    #[test]
    fn test_warning_with_unparseable_message_code() {
        let body = br#"{"ErrorCode":"Warning","MessageResults":[{"Index":0,"ErrorCode":"???"}]}"#;
        let response = InjectionResponseParser::parse(200, body).unwrap();
        assert_eq!(response.result, SendResult::UnknownError);
    }

    #[test]
    fn test_warning_without_message_results_stays_warning() {
        let response = InjectionResponseParser::parse(200, br#"{"ErrorCode":"Warning"}"#).unwrap();
        assert_eq!(response.result, SendResult::Warning);
    }

    #[test]
    fn test_address_results_copied_without_warning() {
        let body = br#"{"ErrorCode":"NoValidRecipients","MessageResults":[{"Index":0,"ErrorCode":"NoValidRecipients","AddressResults":[{"EmailAddress":"x","Accepted":false,"ErrorCode":"InvalidAddress"}]}]}"#;
        let response = InjectionResponseParser::parse(200, body).unwrap();

        assert_eq!(response.result, SendResult::NoValidRecipients);
        assert_eq!(response.address_results.len(), 1);
    }

    #[test]
    fn test_malformed_success_body_is_error() {
        let error = InjectionResponseParser::parse(200, b"<html>oops</html>").unwrap_err();
        assert!(matches!(error, SocketLabsError::Serialization { .. }));

        let error = InjectionResponseParser::parse(200, b"").unwrap_err();
        assert!(matches!(error, SocketLabsError::Serialization { .. }));
    }

    #[test]
    fn test_status_mapping_ignores_body() {
        let cases = [
            (401, SendResult::InvalidAuthentication),
            (408, SendResult::Timeout),
            (500, SendResult::InternalError),
            (503, SendResult::UnknownError),
            (404, SendResult::UnknownError),
        ];

        for (status, expected) in cases {
            let with_body =
                InjectionResponseParser::parse(status, br#"{"ErrorCode":"Success"}"#).unwrap();
            assert_eq!(with_body.result, expected);

            let without_body = InjectionResponseParser::parse(status, b"").unwrap();
            assert_eq!(without_body.result, expected);
            assert!(without_body.transaction_receipt.is_none());
        }
    }

    #[test]
    fn test_error_status_keeps_receipt_from_body() {
        let raw = RawResponse::new(401, r#"{"ErrorCode":"InvalidAuthentication","TransactionReceipt":"t"}"#);
        let response = InjectionResponseParser::parse_raw(&raw).unwrap();

        assert_eq!(response.result, SendResult::InvalidAuthentication);
        assert_eq!(response.transaction_receipt.as_deref(), Some("t"));
    }
}
