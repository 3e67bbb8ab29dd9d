//! Tool catalogue and argument validation
//!
//! Holds the static definitions of the four mailbox tools (name, short and
//! long description, declarative parameter schema) and the single generic
//! validation pass that checks an incoming argument map against a
//! definition before dispatch. The catalogue is built once and never
//! mutated; lookups are exact-match and case-sensitive.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

use crate::errors::{AppError, AppResult};

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    /// JSON Schema type name
    fn schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Declarative description of a single tool parameter
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
}

/// Definition of one tool
///
/// `title` is the short human label, `description` the detailed one; both
/// are advertised to callers together with the parameter schema. Unlisted
/// parameters are never permitted.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

/// The fixed tool catalogue
///
/// Created at startup, read-only for the process lifetime.
pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get_recent_emails",
        title: "Get recent emails from the last week",
        description: "Retrieves emails from Outlook that are not older than 1 week",
        params: &[ParamSpec {
            name: "limit",
            kind: ParamKind::Number,
            description: "Maximum number of emails to return (default: 100)",
            required: false,
        }],
    },
    ToolSpec {
        name: "get_email_by_id",
        title: "Get full email details by ID",
        description: "Retrieves complete email information including full body for a specific email ID",
        params: &[ParamSpec {
            name: "email_id",
            kind: ParamKind::String,
            description: "The unique identifier of the email",
            required: true,
        }],
    },
    ToolSpec {
        name: "create_draft_response",
        title: "Create a draft reply to an email",
        description: "Creates a draft response to a specific email that can be reviewed and sent later",
        params: &[
            ParamSpec {
                name: "email_id",
                kind: ParamKind::String,
                description: "The unique identifier of the email to reply to",
                required: true,
            },
            ParamSpec {
                name: "body",
                kind: ParamKind::String,
                description: "The body content of the draft reply",
                required: true,
            },
        ],
    },
    ToolSpec {
        name: "delete_email_by_id",
        title: "Delete an email by ID",
        description: "Permanently deletes an email from Outlook by its unique identifier",
        params: &[ParamSpec {
            name: "email_id",
            kind: ParamKind::String,
            description: "The unique identifier of the email to delete",
            required: true,
        }],
    },
];

/// Look up a tool definition by exact name
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|spec| spec.name == name)
}

/// Build the MCP tool list advertised to callers
pub fn mcp_tools() -> Vec<Tool> {
    TOOLS
        .iter()
        .map(|spec| {
            let mut tool = Tool::default();
            tool.name = Cow::Borrowed(spec.name);
            tool.title = Some(spec.title.to_owned());
            tool.description = Some(Cow::Borrowed(spec.description));
            tool.input_schema = Arc::new(input_schema(spec));
            tool
        })
        .collect()
}

/// Render a tool's parameter list as a JSON Schema object
///
/// Shape: `type: "object"`, `properties`, `required`,
/// `additionalProperties: false`.
fn input_schema(spec: &ToolSpec) -> JsonObject {
    let mut properties = JsonObject::new();
    for param in spec.params {
        properties.insert(
            param.name.to_owned(),
            json!({
                "type": param.kind.schema_type(),
                "description": param.description,
            }),
        );
    }

    let required: Vec<&str> = spec
        .params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();

    let mut schema = JsonObject::new();
    schema.insert("type".to_owned(), json!("object"));
    schema.insert("properties".to_owned(), Value::Object(properties));
    schema.insert("required".to_owned(), json!(required));
    schema.insert("additionalProperties".to_owned(), json!(false));
    schema
}

/// A single validated argument value
#[derive(Debug, Clone)]
enum ArgValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

/// Immutable result of the generic validation pass
///
/// Values are keyed by declared parameter name and already type-checked;
/// tool-specific argument records are built from this.
#[derive(Debug, Default)]
pub struct ValidatedArgs {
    values: BTreeMap<&'static str, ArgValue>,
}

impl ValidatedArgs {
    /// Declared string parameter, if supplied
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Declared numeric parameter, if supplied
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            ArgValue::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Declared boolean parameter, if supplied
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// Validate an incoming argument map against a tool definition
///
/// One pass over the declared parameters checks presence and type; a second
/// over the supplied keys rejects anything undeclared, matching the
/// advertised `additionalProperties: false`. JSON `null` counts as absent.
/// `limit`-style numbers accept any JSON number; truncation to an integer
/// happens in the argument records, not here.
///
/// # Errors
///
/// Returns `InvalidInput` naming the offending parameter. No provider call
/// is ever attempted for arguments that fail here.
pub fn validate_args(spec: &ToolSpec, raw: &JsonObject) -> AppResult<ValidatedArgs> {
    for key in raw.keys() {
        if !spec.params.iter().any(|p| p.name == key) {
            return Err(AppError::invalid(format!(
                "undeclared parameter '{key}' for tool '{}'",
                spec.name
            )));
        }
    }

    let mut values = BTreeMap::new();
    for param in spec.params {
        let value = match raw.get(param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(AppError::invalid(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
                continue;
            }
            Some(v) => v,
        };

        let validated = match param.kind {
            ParamKind::String => value
                .as_str()
                .map(|s| ArgValue::Str(s.to_owned()))
                .ok_or_else(|| type_error(param, "a string"))?,
            ParamKind::Number => value
                .as_f64()
                .map(ArgValue::Num)
                .ok_or_else(|| type_error(param, "a number"))?,
            ParamKind::Boolean => value
                .as_bool()
                .map(ArgValue::Bool)
                .ok_or_else(|| type_error(param, "a boolean"))?,
        };
        values.insert(param.name, validated);
    }

    Ok(ValidatedArgs { values })
}

fn type_error(param: &ParamSpec, expected: &str) -> AppError {
    AppError::invalid(format!(
        "parameter '{}' must be {expected}",
        param.name
    ))
}
