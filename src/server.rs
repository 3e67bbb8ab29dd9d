//! MCP server implementation with tool dispatch
//!
//! Implements the `ServerHandler` trait directly: tools are advertised from
//! the static registry and calls are dispatched by exact name. Each handler
//! validates arguments, invokes the Graph client, and renders the outcome as
//! exactly one text content block. Any failure raised along the way, caller
//! error or provider error alike, is converted to an error result here;
//! nothing propagates past this boundary as an unhandled fault.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use rmcp::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};

use crate::errors::{AppError, AppResult};
use crate::graph::GraphClient;
use crate::models::{DraftReplyParams, MessageRefParams, RecentEmailsParams};
use crate::payload;
use crate::registry::{self, ToolSpec};

/// Look-back window for `get_recent_emails`, in days
const RECENT_WINDOW_DAYS: i64 = 7;

/// Outlook Graph MCP server
///
/// Holds the shared provider client. Handlers run independently on the
/// calling task; the only shared state is the read-only client handle.
#[derive(Clone)]
pub struct MailGraphServer {
    /// Process-scoped Graph client (thread-safe, shared across calls)
    graph: Arc<GraphClient>,
}

impl MailGraphServer {
    /// Create a new MCP server around an authenticated Graph client
    pub fn new(graph: Arc<GraphClient>) -> Self {
        Self { graph }
    }

    /// Resolve and run one tool call
    ///
    /// An unknown tool name is a protocol error; every failure inside a
    /// resolved tool becomes an error result with per-tool phrasing.
    async fn dispatch(&self, name: &str, args: &JsonObject) -> Result<CallToolResult, ErrorData> {
        let spec = registry::find(name).ok_or_else(|| {
            AppError::invalid(format!("tool not found: {name}")).to_error_data()
        })?;
        tracing::debug!(tool = %name, "tool call received");

        let outcome = match spec.name {
            "get_recent_emails" => self.get_recent_emails(spec, args).await,
            "get_email_by_id" => self.get_email_by_id(spec, args).await,
            "create_draft_response" => self.create_draft_response(spec, args).await,
            "delete_email_by_id" => self.delete_email_by_id(spec, args).await,
            other => Err(AppError::Internal(format!("tool '{other}' has no handler"))),
        };

        Ok(match outcome {
            Ok(payload) => CallToolResult::success(vec![Content::text(payload)]),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                CallToolResult::error(vec![Content::text(format!(
                    "Error {}: {e}",
                    error_phrase(spec.name)
                ))])
            }
        })
    }

    /// Tool: list messages from the last week
    ///
    /// The lower bound is computed at call time; results arrive newest
    /// first, capped at `limit` (default 100).
    async fn get_recent_emails(&self, spec: &ToolSpec, raw: &JsonObject) -> AppResult<String> {
        let args = registry::validate_args(spec, raw)?;
        let params = RecentEmailsParams::from_args(&args);
        let since = Utc::now() - ChronoDuration::days(RECENT_WINDOW_DAYS);
        let messages = self.graph.list_recent_messages(since, params.limit).await?;
        Ok(payload::render_message_list(&messages))
    }

    /// Tool: fetch one message with full body
    async fn get_email_by_id(&self, spec: &ToolSpec, raw: &JsonObject) -> AppResult<String> {
        let args = registry::validate_args(spec, raw)?;
        let params = MessageRefParams::from_args(&args)?;
        let message = self.graph.get_message(&params.email_id).await?;
        Ok(payload::render_message_detail(&message))
    }

    /// Tool: create a reply draft and set its body
    ///
    /// Two sequential provider calls: create the draft, then patch its body
    /// as plain text. If the patch fails after the create succeeded, the
    /// empty-body draft is left behind and the patch failure is reported;
    /// there is no rollback.
    async fn create_draft_response(&self, spec: &ToolSpec, raw: &JsonObject) -> AppResult<String> {
        let args = registry::validate_args(spec, raw)?;
        let params = DraftReplyParams::from_args(&args)?;
        let draft = self.graph.create_reply_draft(&params.email_id).await?;
        self.graph.update_draft_body(&draft.id, &params.body).await?;
        Ok(payload::render_draft_receipt(&draft, &params.email_id, &params.body))
    }

    /// Tool: permanently delete a message
    async fn delete_email_by_id(&self, spec: &ToolSpec, raw: &JsonObject) -> AppResult<String> {
        let args = registry::validate_args(spec, raw)?;
        let params = MessageRefParams::from_args(&args)?;
        self.graph.delete_message(&params.email_id).await?;
        Ok(payload::render_delete_receipt(&params.email_id))
    }
}

/// Per-tool error-result phrasing
fn error_phrase(tool: &str) -> &'static str {
    match tool {
        "get_recent_emails" => "fetching emails",
        "get_email_by_id" => "fetching email",
        "create_draft_response" => "creating draft",
        "delete_email_by_id" => "deleting email",
        _ => "handling tool call",
    }
}

/// MCP server handler implementation
///
/// Provides server info and capabilities, advertises the tool catalogue,
/// and routes tool calls into the dispatcher.
impl ServerHandler for MailGraphServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.instructions = Some(
            "Outlook mail MCP server backed by Microsoft Graph. Lists mail from the last 7 days, fetches full messages, creates draft replies, and permanently deletes messages on behalf of one signed-in mailbox.".to_owned(),
        );
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: registry::mcp_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let args = request.arguments.unwrap_or_default();
        self.dispatch(request.name.as_ref(), &args).await
    }
}
