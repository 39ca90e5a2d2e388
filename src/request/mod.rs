//! Builds Injection API request bodies from messages.

mod wire;

pub use wire::{
    AddressJson, AttachmentJson, CustomHeaderJson, InjectionRequest, MergeDataJson,
    MergeFieldJson, MessageJson, MetadataJson,
};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;

use crate::error::SocketLabsResult;
use crate::types::{
    Attachment, BasicMessage, BulkMessage, BulkRecipient, CustomHeader, EmailAddress, MergeData,
    MessageBase,
};

/// Recipient address placeholder used as the To of a bulk message.
pub const DELIVERY_ADDRESS_FIELD: &str = "DeliveryAddress";
/// Recipient name placeholder used as the To of a bulk message.
pub const RECIPIENT_NAME_FIELD: &str = "RecipientName";

/// Creates [`InjectionRequest`]s for one server id and API key.
#[derive(Clone)]
pub struct InjectionRequestFactory {
    server_id: i32,
    api_key: String,
}

impl std::fmt::Debug for InjectionRequestFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionRequestFactory")
            .field("server_id", &self.server_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl InjectionRequestFactory {
    /// Create a factory for the given credentials.
    pub fn new(server_id: i32, api_key: impl Into<String>) -> Self {
        Self {
            server_id,
            api_key: api_key.into(),
        }
    }

    /// Build the request for a basic message.
    pub fn generate_basic(&self, message: &BasicMessage) -> InjectionRequest {
        let mut json = base_message_json(&message.base);
        json.to = address_list(&message.to);
        json.cc = address_list(&message.cc);
        json.bcc = address_list(&message.bcc);

        self.wrap(json)
    }

    /// Build the request for a bulk message.
    ///
    /// The To list becomes a single placeholder recipient, and each real
    /// recipient contributes one entry to `MergeData.PerMessage` holding its
    /// own merge fields followed by `DeliveryAddress` and, when it has a
    /// display name, `RecipientName`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_socketlabs::request::InjectionRequestFactory;
    /// use integrations_socketlabs::types::{BulkMessage, BulkRecipient};
    ///
    /// let message = BulkMessage::new()
    ///     .subject("Hi")
    ///     .from("from@example.com")
    ///     .plain_text_body("Hi %%RecipientName%%")
    ///     .add_to(BulkRecipient::with_name("ada@example.com", "Ada"));
    ///
    /// let request = InjectionRequestFactory::new(1000, "key").generate_bulk(&message);
    /// let json = &request.messages[0];
    ///
    /// assert_eq!(json.to[0].email_address, "%%DeliveryAddress%%");
    /// assert_eq!(json.merge_data.per_message[0].len(), 2);
    /// ```
    pub fn generate_bulk(&self, message: &BulkMessage) -> InjectionRequest {
        let mut json = base_message_json(&message.base);
        json.to = vec![AddressJson {
            email_address: format!("%%{}%%", DELIVERY_ADDRESS_FIELD),
            friendly_name: Some(format!("%%{}%%", RECIPIENT_NAME_FIELD)),
        }];
        json.merge_data = MergeDataJson {
            per_message: message.to.iter().map(recipient_merge_fields).collect(),
            global: merge_fields(&message.global_merge_data),
        };

        self.wrap(json)
    }

    fn wrap(&self, message: MessageJson) -> InjectionRequest {
        InjectionRequest {
            server_id: self.server_id,
            api_key: self.api_key.clone(),
            messages: vec![message],
        }
    }
}

impl InjectionRequest {
    /// Serialize the request to a JSON body.
    pub fn to_json(&self) -> SocketLabsResult<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

fn base_message_json(base: &MessageBase) -> MessageJson {
    MessageJson {
        from: base.from.as_ref().map(address),
        reply_to: base.reply_to.as_ref().map(address),
        subject: base.subject.clone(),
        text_body: base.plain_text_body.clone(),
        html_body: base.html_body.clone(),
        amp_body: base.amp_body.clone(),
        api_template: base.api_template.map(|id| id.to_string()),
        mailing_id: base.mailing_id.clone(),
        message_id: base.message_id.clone(),
        char_set: base.char_set.clone(),
        custom_headers: custom_headers(&base.custom_headers),
        metadata: base
            .metadata
            .iter()
            .map(|entry| MetadataJson {
                key: entry.key.clone(),
                value: entry.value.clone(),
            })
            .collect(),
        tags: base.tags.clone(),
        attachments: base.attachments.iter().map(attachment).collect(),
        ..MessageJson::default()
    }
}

fn address(address: &EmailAddress) -> AddressJson {
    AddressJson {
        email_address: address.email.clone(),
        friendly_name: address.display_name.clone(),
    }
}

fn address_list(addresses: &[EmailAddress]) -> Vec<AddressJson> {
    addresses.iter().map(address).collect()
}

fn custom_headers(headers: &[CustomHeader]) -> Vec<CustomHeaderJson> {
    headers
        .iter()
        .map(|header| CustomHeaderJson {
            name: header.name.clone(),
            value: header.value.clone(),
        })
        .collect()
}

fn attachment(attachment: &Attachment) -> AttachmentJson {
    AttachmentJson {
        name: attachment.name.clone(),
        content: BASE64.encode(&attachment.content),
        content_id: attachment.content_id.clone(),
        content_type: attachment.mime_type.clone(),
        custom_headers: custom_headers(&attachment.custom_headers),
    }
}

fn merge_fields(data: &MergeData) -> Vec<MergeFieldJson> {
    data.iter()
        .map(|(field, value)| MergeFieldJson::new(field, value))
        .collect()
}

fn recipient_merge_fields(recipient: &BulkRecipient) -> Vec<MergeFieldJson> {
    let mut fields = merge_fields(&recipient.merge_data);
    fields.push(MergeFieldJson::new(
        DELIVERY_ADDRESS_FIELD,
        recipient.email.as_str(),
    ));

    if let Some(name) = recipient.display_name.as_deref() {
        if !name.trim().is_empty() {
            fields.push(MergeFieldJson::new(RECIPIENT_NAME_FIELD, name));
        }
    }

    fields
}
