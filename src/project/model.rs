// SPDX-License-Identifier: MIT
//! Project data model types.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Millisecond epoch timestamp.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a new id: `<prefix>_<millis>_<short random suffix>`.
///
/// Collision-safe within a single deployment; not meant to be
/// cryptographically unique or safe across distributed writers.
pub fn new_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}_{}", now_millis(), &suffix[..7])
}

// ─── Enums ────────────────────────────────────────────────────────────────────

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }

    /// Unknown persisted values decode as In Progress rather than failing the row.
    pub fn parse(s: &str) -> Self {
        match s {
            "Completed" => Self::Completed,
            "Archived" => Self::Archived,
            _ => Self::InProgress,
        }
    }
}

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => Self::Assistant,
            _ => Self::User,
        }
    }
}

/// Content kind of a chat turn (wire name `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Code,
    Image,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "code" => Some(Self::Code),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Client-side delivery lifecycle tag, meaningful for user-authored turns
/// awaiting a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Error,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sending" => Some(Self::Sending),
            "sent" => Some(Self::Sent),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

// ─── Records ──────────────────────────────────────────────────────────────────

/// One turn in a project's chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Millisecond epoch.
    pub timestamp: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

/// A named container of code, metadata, and chat history, owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    /// Free-text scratch field; not guaranteed to stay in sync with chat.
    pub code: String,
    pub status: ProjectStatus,
    /// Insertion order = chronological order.
    pub chat_history: Vec<ChatMessage>,
    /// Millisecond epoch. Invariant: `updated_at >= created_at`.
    pub created_at: i64,
    pub updated_at: i64,
}

// ─── Params ───────────────────────────────────────────────────────────────────

/// Parameters for creating a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectParams {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Parameters for updating an existing project. Only provided fields change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Message payload before the store assigns an id and timestamp.
#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub text: String,
    pub sender: Sender,
    #[serde(rename = "type", default)]
    pub kind: Option<MessageKind>,
    #[serde(default)]
    pub status: Option<MessageStatus>,
}
