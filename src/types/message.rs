//! Basic and bulk message types.

use std::fmt;

use super::{Attachment, BulkRecipient, CustomHeader, EmailAddress, MergeData, Metadata};

/// Fields shared by every message variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBase {
    /// Message subject.
    pub subject: String,
    /// Plain text body.
    pub plain_text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// AMP body. Only sent alongside a plain text or HTML body.
    pub amp_body: Option<String>,
    /// Id of a stored template to use as the body. `0` and `i32::MIN` mean
    /// no template.
    pub api_template: Option<i32>,
    /// Mailing id for tracking.
    pub mailing_id: Option<String>,
    /// Message id for tracking.
    pub message_id: Option<String>,
    /// Sender address.
    pub from: Option<EmailAddress>,
    /// Reply-to address.
    pub reply_to: Option<EmailAddress>,
    /// Character set of the message, for example `UTF-8`.
    pub char_set: Option<String>,
    /// Custom MIME headers.
    pub custom_headers: Vec<CustomHeader>,
    /// Metadata entries.
    pub metadata: Vec<Metadata>,
    /// Tags.
    pub tags: Vec<String>,
    /// Attachments.
    pub attachments: Vec<Attachment>,
}

impl MessageBase {
    /// Whether `api_template` holds a real template id.
    pub fn has_api_template(&self) -> bool {
        matches!(self.api_template, Some(id) if id != 0 && id != i32::MIN)
    }

    /// Whether the message carries a usable body: a template, a non-blank
    /// plain text body, or a non-blank HTML body.
    pub fn has_body(&self) -> bool {
        fn non_blank(body: &Option<String>) -> bool {
            body.as_deref().map_or(false, |body| !body.trim().is_empty())
        }

        self.has_api_template() || non_blank(&self.plain_text_body) || non_blank(&self.html_body)
    }
}

// Fluent setters shared by both message variants.
macro_rules! message_base_setters {
    ($message:ty) => {
        impl $message {
            /// Set the subject.
            pub fn subject(mut self, subject: impl Into<String>) -> Self {
                self.base.subject = subject.into();
                self
            }

            /// Set the sender.
            pub fn from(mut self, from: impl Into<EmailAddress>) -> Self {
                self.base.from = Some(from.into());
                self
            }

            /// Set the reply-to address.
            pub fn reply_to(mut self, reply_to: impl Into<EmailAddress>) -> Self {
                self.base.reply_to = Some(reply_to.into());
                self
            }

            /// Set the plain text body.
            pub fn plain_text_body(mut self, body: impl Into<String>) -> Self {
                self.base.plain_text_body = Some(body.into());
                self
            }

            /// Set the HTML body.
            pub fn html_body(mut self, body: impl Into<String>) -> Self {
                self.base.html_body = Some(body.into());
                self
            }

            /// Set the AMP body.
            pub fn amp_body(mut self, body: impl Into<String>) -> Self {
                self.base.amp_body = Some(body.into());
                self
            }

            /// Use a stored template as the body.
            pub fn api_template(mut self, template_id: i32) -> Self {
                self.base.api_template = Some(template_id);
                self
            }

            /// Set the mailing id.
            pub fn mailing_id(mut self, mailing_id: impl Into<String>) -> Self {
                self.base.mailing_id = Some(mailing_id.into());
                self
            }

            /// Set the message id.
            pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
                self.base.message_id = Some(message_id.into());
                self
            }

            /// Set the character set.
            pub fn char_set(mut self, char_set: impl Into<String>) -> Self {
                self.base.char_set = Some(char_set.into());
                self
            }

            /// Add a custom header.
            pub fn add_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.base.custom_headers.push(CustomHeader::new(name, value));
                self
            }

            /// Add a metadata entry.
            pub fn add_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.base.metadata.push(Metadata::new(key, value));
                self
            }

            /// Add a tag.
            pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
                self.base.tags.push(tag.into());
                self
            }

            /// Add an attachment.
            pub fn add_attachment(mut self, attachment: Attachment) -> Self {
                self.base.attachments.push(attachment);
                self
            }

            /// Shared message fields.
            pub fn base(&self) -> &MessageBase {
                &self.base
            }

            /// Mutable access to the shared message fields.
            pub fn base_mut(&mut self) -> &mut MessageBase {
                &mut self.base
            }
        }

        impl fmt::Display for $message {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "Recipients: {}, Subject: '{}'",
                    self.recipient_count(),
                    self.base.subject
                )
            }
        }
    };
}

/// A message delivered as-is to To, Cc and Bcc recipients.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::{BasicMessage, EmailAddress};
///
/// let message = BasicMessage::new()
///     .subject("Sending a basic message")
///     .from("from@example.com")
///     .plain_text_body("This is the body of my message.")
///     .add_to(EmailAddress::with_name("ada@example.com", "Ada"))
///     .add_bcc("audit@example.com");
///
/// assert_eq!(message.recipient_count(), 2);
/// assert_eq!(message.to_string(), "Recipients: 2, Subject: 'Sending a basic message'");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicMessage {
    /// Shared message fields.
    pub base: MessageBase,
    /// To recipients.
    pub to: Vec<EmailAddress>,
    /// Cc recipients.
    pub cc: Vec<EmailAddress>,
    /// Bcc recipients.
    pub bcc: Vec<EmailAddress>,
}

impl BasicMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a To recipient.
    pub fn add_to(mut self, address: impl Into<EmailAddress>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a Cc recipient.
    pub fn add_cc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a Bcc recipient.
    pub fn add_bcc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Total number of To, Cc and Bcc recipients.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

message_base_setters!(BasicMessage);

/// A message personalized per recipient with merge fields.
///
/// Merge fields are referenced in the subject and bodies as `%%FieldName%%`.
/// Every recipient also gets `%%DeliveryAddress%%`, and `%%RecipientName%%`
/// when it has a display name.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::{BulkMessage, BulkRecipient};
///
/// let message = BulkMessage::new()
///     .subject("Your %%Plan%% plan")
///     .from("billing@example.com")
///     .html_body("<p>Hi %%RecipientName%%, thanks for choosing %%Plan%%.</p>")
///     .add_global_merge_field("Plan", "Standard")
///     .add_to(BulkRecipient::with_name("ada@example.com", "Ada").merge_field("Plan", "Pro"))
///     .add_to("grace@example.com");
///
/// assert_eq!(message.recipient_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkMessage {
    /// Shared message fields.
    pub base: MessageBase,
    /// Recipients, each receiving an individual copy.
    pub to: Vec<BulkRecipient>,
    /// Merge fields applied to every recipient.
    pub global_merge_data: MergeData,
}

impl BulkMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient.
    pub fn add_to(mut self, recipient: impl Into<BulkRecipient>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Add or replace a global merge field.
    pub fn add_global_merge_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_merge_data.insert(field, value);
        self
    }

    /// Number of recipients.
    pub fn recipient_count(&self) -> usize {
        self.to.len()
    }
}

message_base_setters!(BulkMessage);
