//! Provider wire DTOs and typed tool arguments
//!
//! Defines the read-only projection of Graph `message` resources consumed by
//! this server, plus the immutable per-tool argument records produced from a
//! validated argument set. Message data is owned by the provider; nothing
//! here is cached or mutated locally.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::registry::ValidatedArgs;

/// Default maximum number of messages returned by `get_recent_emails`
pub const DEFAULT_RECENT_LIMIT: usize = 100;

/// Envelope for Graph collection responses
///
/// List endpoints wrap their items in a `value` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCollection {
    /// Messages in the requested order
    #[serde(default)]
    pub value: Vec<Message>,
}

/// Mail message (provider-side, read-only view)
///
/// Partial projection of the Graph `message` resource. List calls select
/// only the summary fields; `get` calls additionally carry recipients, the
/// full body, and the attachment flag. All fields except `id` may be absent
/// depending on the `$select` used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    /// Opaque provider-assigned identifier
    pub id: String,
    /// Subject line
    pub subject: Option<String>,
    /// Sender, when the provider can resolve one
    pub from: Option<Recipient>,
    /// To-recipients (absent on summary projections)
    pub to_recipients: Option<Vec<Recipient>>,
    /// Received timestamp as reported by the provider (ISO 8601)
    pub received_date_time: Option<String>,
    /// Short plain-text preview of the body
    pub body_preview: Option<String>,
    /// Full body content
    pub body: Option<ItemBody>,
    /// Whether the message carries attachments
    pub has_attachments: Option<bool>,
}

impl Message {
    /// Sender address, if the provider resolved one
    pub fn sender_address(&self) -> Option<&str> {
        self.from.as_ref()?.email_address.as_ref()?.address.as_deref()
    }

    /// All resolvable to-recipient addresses
    pub fn recipient_addresses(&self) -> Vec<&str> {
        self.to_recipients
            .iter()
            .flatten()
            .filter_map(|r| r.email_address.as_ref()?.address.as_deref())
            .collect()
    }
}

/// Recipient wrapper as used by Graph message resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipient {
    /// Address details; may be absent for unresolvable entries
    pub email_address: Option<EmailAddress>,
}

/// Email address details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailAddress {
    /// Display name
    pub name: Option<String>,
    /// SMTP address
    pub address: Option<String>,
}

/// Message body content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemBody {
    /// `text` or `html`
    pub content_type: Option<String>,
    /// Body text
    pub content: Option<String>,
}

/// Minimal profile projection used by the startup connectivity probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Principal name of the signed-in mailbox
    pub user_principal_name: Option<String>,
}

/// Arguments for `get_recent_emails`
#[derive(Debug, Clone, Copy)]
pub struct RecentEmailsParams {
    /// Maximum messages to return
    pub limit: usize,
}

impl RecentEmailsParams {
    /// Build from a validated argument set
    ///
    /// `limit` is truncated toward zero; negative values clamp to 0 since
    /// the provider rejects a negative page size. Absent means
    /// [`DEFAULT_RECENT_LIMIT`].
    pub fn from_args(args: &ValidatedArgs) -> Self {
        let limit = args
            .number("limit")
            .map(|raw| if raw <= 0.0 { 0 } else { raw.trunc() as usize })
            .unwrap_or(DEFAULT_RECENT_LIMIT);
        Self { limit }
    }
}

/// Arguments for tools addressing a single message by id
#[derive(Debug, Clone)]
pub struct MessageRefParams {
    /// Provider-assigned message identifier
    pub email_id: String,
}

impl MessageRefParams {
    /// Build from a validated argument set
    pub fn from_args(args: &ValidatedArgs) -> AppResult<Self> {
        Ok(Self {
            email_id: required_string(args, "email_id")?,
        })
    }
}

/// Arguments for `create_draft_response`
#[derive(Debug, Clone)]
pub struct DraftReplyParams {
    /// Message being replied to
    pub email_id: String,
    /// Plain-text body for the draft
    pub body: String,
}

impl DraftReplyParams {
    /// Build from a validated argument set
    pub fn from_args(args: &ValidatedArgs) -> AppResult<Self> {
        Ok(Self {
            email_id: required_string(args, "email_id")?,
            body: required_string(args, "body")?,
        })
    }
}

/// Fetch a required string argument
///
/// The generic validation pass guarantees presence for declared required
/// parameters; this keeps the argument records honest without panicking.
fn required_string(args: &ValidatedArgs, name: &str) -> AppResult<String> {
    args.string(name)
        .map(str::to_owned)
        .ok_or_else(|| AppError::invalid(format!("missing required parameter '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::Message;

    #[test]
    fn sender_address_resolves_nested_optionals() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "from": { "emailAddress": { "name": "Ana", "address": "ana@example.com" } }
        }))
        .expect("message deserializes");
        assert_eq!(msg.sender_address(), Some("ana@example.com"));
    }

    #[test]
    fn sender_address_is_none_when_unresolvable() {
        let bare: Message =
            serde_json::from_value(serde_json::json!({ "id": "m2" })).expect("deserializes");
        assert_eq!(bare.sender_address(), None);

        let empty_from: Message = serde_json::from_value(serde_json::json!({
            "id": "m3",
            "from": {}
        }))
        .expect("deserializes");
        assert_eq!(empty_from.sender_address(), None);
    }

    #[test]
    fn recipient_addresses_skips_unresolvable_entries() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "id": "m4",
            "toRecipients": [
                { "emailAddress": { "address": "a@example.com" } },
                {},
                { "emailAddress": { "address": "b@example.com" } }
            ]
        }))
        .expect("deserializes");
        assert_eq!(msg.recipient_addresses(), vec!["a@example.com", "b@example.com"]);
    }
}
