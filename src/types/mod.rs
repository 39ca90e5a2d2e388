//! Message model and send results.

mod address;
mod attachment;
mod header;
mod merge_data;
mod message;
mod recipient;
mod result;

pub use address::{is_valid_address, EmailAddress, MAXIMUM_ADDRESS_LENGTH};
pub use attachment::{mime_type, Attachment};
pub use header::{CustomHeader, Metadata};
pub use merge_data::MergeData;
pub use message::{BasicMessage, BulkMessage, MessageBase};
pub use recipient::BulkRecipient;
pub use result::{AddressResult, SendResponse, SendResult};
