//! JSON shapes of the Injection API request body.

#![allow(missing_docs)]

use serde::Serialize;

/// Top-level Injection API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InjectionRequest {
    /// Server id the messages are sent through.
    pub server_id: i32,
    /// Injection API key.
    pub api_key: String,
    /// Messages to send. The client always sends exactly one.
    pub messages: Vec<MessageJson>,
}

/// A single message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageJson {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<AddressJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<AddressJson>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amp_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_set: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_headers: Vec<CustomHeaderJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentJson>,
    #[serde(skip_serializing_if = "MergeDataJson::is_empty")]
    pub merge_data: MergeDataJson,
}

/// An address with an optional friendly name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressJson {
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomHeaderJson {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataJson {
    pub key: String,
    pub value: String,
}

/// An attachment with base64 encoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachmentJson {
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    pub content_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_headers: Vec<CustomHeaderJson>,
}

/// Merge data of a bulk message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeDataJson {
    /// One list of fields per recipient, in recipient order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub per_message: Vec<Vec<MergeFieldJson>>,
    /// Fields shared by all recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global: Vec<MergeFieldJson>,
}

impl MergeDataJson {
    pub fn is_empty(&self) -> bool {
        self.per_message.is_empty() && self.global.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeFieldJson {
    pub field: String,
    pub value: String,
}

impl MergeFieldJson {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}
