//! Tool result payload rendering
//!
//! Builds the JSON text payloads returned by each tool through direct
//! string assembly. Every interpolated string field goes through the
//! [`crate::escape`] encoder exactly once, so the output is valid JSON even
//! when provider data contains quotes, backslashes, or control characters.

use chrono::{SecondsFormat, Utc};

use crate::escape::{escape_json, escape_json_opt};
use crate::models::Message;

/// Sender shown when the provider reports no resolvable address
const UNKNOWN_SENDER: &str = "unknown";

/// Render the `get_recent_emails` payload
///
/// JSON array of summary objects with keys
/// `id, subject, from, date, bodyPreview`, in provider order.
pub fn render_message_list(messages: &[Message]) -> String {
    let items: Vec<String> = messages.iter().map(render_summary).collect();
    format!("[{}]", items.join(","))
}

fn render_summary(message: &Message) -> String {
    format!(
        "{{\"id\":\"{}\",\"subject\":\"{}\",\"from\":\"{}\",\"date\":\"{}\",\"bodyPreview\":\"{}\"}}",
        escape_json(&message.id),
        escape_json_opt(message.subject.as_deref()),
        escape_json(message.sender_address().unwrap_or(UNKNOWN_SENDER)),
        escape_json_opt(message.received_date_time.as_deref()),
        escape_json_opt(message.body_preview.as_deref()),
    )
}

/// Render the `get_email_by_id` payload
///
/// Single object with keys `id, subject, from, to, date, body,
/// hasAttachments`. `to` is an array of recipient addresses (empty when
/// none), `body` the full content (empty string when absent), and
/// `hasAttachments` defaults to false when the provider reports no value.
pub fn render_message_detail(message: &Message) -> String {
    let to: Vec<String> = message
        .recipient_addresses()
        .into_iter()
        .map(|addr| format!("\"{}\"", escape_json(addr)))
        .collect();
    let body = message
        .body
        .as_ref()
        .and_then(|b| b.content.as_deref());

    format!(
        "{{\"id\":\"{}\",\"subject\":\"{}\",\"from\":\"{}\",\"to\":[{}],\"date\":\"{}\",\"body\":\"{}\",\"hasAttachments\":{}}}",
        escape_json(&message.id),
        escape_json_opt(message.subject.as_deref()),
        escape_json(message.sender_address().unwrap_or(UNKNOWN_SENDER)),
        to.join(","),
        escape_json_opt(message.received_date_time.as_deref()),
        escape_json_opt(body),
        message.has_attachments.unwrap_or(false),
    )
}

/// Render the `create_draft_response` receipt
///
/// `subject` comes from the provider-created draft (normally pre-filled as
/// `RE: <original subject>`); `createdAt` is the current instant.
pub fn render_draft_receipt(draft: &Message, in_reply_to: &str, body: &str) -> String {
    format!(
        "{{\"success\":true,\"draftId\":\"{}\",\"inReplyTo\":\"{}\",\"subject\":\"{}\",\"body\":\"{}\",\"createdAt\":\"{}\"}}",
        escape_json(&draft.id),
        escape_json(in_reply_to),
        escape_json_opt(draft.subject.as_deref()),
        escape_json(body),
        now_rfc3339(),
    )
}

/// Render the `delete_email_by_id` receipt
pub fn render_delete_receipt(email_id: &str) -> String {
    format!(
        "{{\"success\":true,\"message\":\"Email {} has been deleted successfully\",\"deletedAt\":\"{}\"}}",
        escape_json(email_id),
        now_rfc3339(),
    )
}

/// Current UTC instant in RFC 3339 format with milliseconds
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::Value;

    use super::{
        render_delete_receipt, render_draft_receipt, render_message_detail, render_message_list,
    };
    use crate::models::Message;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("test message deserializes")
    }

    fn parse(payload: &str) -> Value {
        serde_json::from_str(payload).expect("payload must be valid JSON")
    }

    #[test]
    fn list_payload_is_a_json_array_of_summaries() {
        let messages = vec![
            message(serde_json::json!({
                "id": "m1",
                "subject": "Status \"update\"",
                "from": { "emailAddress": { "address": "ana@example.com" } },
                "receivedDateTime": "2026-08-07T09:30:00Z",
                "bodyPreview": "line1\nline2"
            })),
            message(serde_json::json!({ "id": "m2" })),
        ];

        let parsed = parse(&render_message_list(&messages));
        assert_eq!(parsed[0]["id"], "m1");
        assert_eq!(parsed[0]["subject"], "Status \"update\"");
        assert_eq!(parsed[0]["from"], "ana@example.com");
        assert_eq!(parsed[0]["date"], "2026-08-07T09:30:00Z");
        assert_eq!(parsed[0]["bodyPreview"], "line1\nline2");

        // absent fields render as empty strings, unresolvable sender as unknown
        assert_eq!(parsed[1]["subject"], "");
        assert_eq!(parsed[1]["from"], "unknown");
        assert_eq!(parsed[1]["date"], "");
    }

    #[test]
    fn empty_list_renders_as_empty_array() {
        assert_eq!(render_message_list(&[]), "[]");
    }

    #[test]
    fn detail_payload_defaults_match_the_contract() {
        let msg = message(serde_json::json!({ "id": "m1" }));
        let parsed = parse(&render_message_detail(&msg));
        assert_eq!(parsed["to"], serde_json::json!([]));
        assert_eq!(parsed["from"], "unknown");
        assert_eq!(parsed["body"], "");
        assert_eq!(parsed["hasAttachments"], false);
    }

    #[test]
    fn detail_payload_carries_recipients_and_full_body() {
        let msg = message(serde_json::json!({
            "id": "m1",
            "subject": "Plan",
            "from": { "emailAddress": { "address": "boss@example.com" } },
            "toRecipients": [
                { "emailAddress": { "address": "me@example.com" } },
                { "emailAddress": { "address": "you@example.com" } }
            ],
            "receivedDateTime": "2026-08-05T08:00:00Z",
            "body": { "contentType": "text", "content": "Tabs\there \"quoted\" \\ done" },
            "hasAttachments": true
        }));

        let parsed = parse(&render_message_detail(&msg));
        assert_eq!(
            parsed["to"],
            serde_json::json!(["me@example.com", "you@example.com"])
        );
        assert_eq!(parsed["body"], "Tabs\there \"quoted\" \\ done");
        assert_eq!(parsed["hasAttachments"], true);
    }

    #[test]
    fn draft_receipt_reports_provider_subject_and_timestamp() {
        let draft = message(serde_json::json!({
            "id": "draft-1",
            "subject": "RE: Plan"
        }));

        let parsed = parse(&render_draft_receipt(&draft, "m1", "Thanks!\nSee you"));
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["draftId"], "draft-1");
        assert_eq!(parsed["inReplyTo"], "m1");
        assert_eq!(parsed["subject"], "RE: Plan");
        assert_eq!(parsed["body"], "Thanks!\nSee you");
        let created_at = parsed["createdAt"].as_str().expect("createdAt present");
        DateTime::parse_from_rfc3339(created_at).expect("createdAt is RFC 3339");
    }

    #[test]
    fn delete_receipt_embeds_the_escaped_id() {
        let parsed = parse(&render_delete_receipt("AAMk\"x\""));
        assert_eq!(parsed["success"], true);
        assert_eq!(
            parsed["message"],
            "Email AAMk\"x\" has been deleted successfully"
        );
        let deleted_at = parsed["deletedAt"].as_str().expect("deletedAt present");
        DateTime::parse_from_rfc3339(deleted_at).expect("deletedAt is RFC 3339");
    }
}
