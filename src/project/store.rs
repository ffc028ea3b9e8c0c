// SPDX-License-Identifier: MIT
//! Project SQLite operations, scoped by owning user.

use sqlx::SqlitePool;

use super::model::*;
use super::StoreError;

const ACTIVE_PROJECT_KEY: &str = "active_project";

type Result<T> = std::result::Result<T, StoreError>;

// ─── Row types ────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: String,
    user_id: String,
    name: String,
    description: String,
    code: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: String,
    sender: String,
    text: String,
    kind: Option<String>,
    status: Option<String>,
    created_at: i64,
}

impl MessageRow {
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            text: self.text,
            sender: Sender::parse(&self.sender),
            timestamp: self.created_at,
            kind: self.kind.as_deref().and_then(MessageKind::parse),
            status: self.status.as_deref().and_then(MessageStatus::parse),
        }
    }
}

impl ProjectRow {
    fn into_project(self, chat_history: Vec<ChatMessage>) -> Project {
        Project {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            code: self.code,
            status: ProjectStatus::parse(&self.status),
            chat_history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ─── ProjectStore ─────────────────────────────────────────────────────────────

pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ─── Projects ─────────────────────────────────────────────────────────────

    /// All projects owned by `user_id`, newest-updated first, each with its
    /// full chat history. A user with no rows gets an empty vec.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Project>> {
        let rows: Vec<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects WHERE user_id = ? ORDER BY updated_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let history = self.chat_history(&row.id).await?;
            projects.push(row.into_project(history));
        }
        Ok(projects)
    }

    pub async fn get(&self, user_id: &str, project_id: &str) -> Result<Option<Project>> {
        let row: Option<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects WHERE id = ? AND user_id = ?")
                .bind(project_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => {
                let history = self.chat_history(&row.id).await?;
                Ok(Some(row.into_project(history)))
            }
            None => Ok(None),
        }
    }

    /// New unique id, `created_at = updated_at = now`, empty chat history.
    pub async fn create(&self, user_id: &str, params: CreateProjectParams) -> Result<Project> {
        let id = new_id("proj");
        let now = now_millis();
        sqlx::query(
            "INSERT INTO projects (id, user_id, name, description, code, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.code)
        .bind(params.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get(user_id, &id)
            .await?
            .ok_or_else(|| StoreError::ProjectNotFound(id))
    }

    /// Merge the provided fields into the existing record. `updated_at` never
    /// decreases; `created_at` is untouched.
    pub async fn update(
        &self,
        user_id: &str,
        project_id: &str,
        params: UpdateProjectParams,
    ) -> Result<Project> {
        let now = now_millis();
        // Partial update — only set fields that were provided
        let result = sqlx::query(
            "UPDATE projects SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             code = COALESCE(?, code), \
             status = COALESCE(?, status), \
             updated_at = MAX(?, updated_at) \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.code)
        .bind(params.status.map(|s| s.as_str()))
        .bind(now)
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }
        self.get(user_id, project_id)
            .await?
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))
    }

    /// Assign the message an id and current timestamp, append it preserving
    /// prior order, and bump the project's `updated_at`.
    pub async fn append_message(
        &self,
        user_id: &str,
        project_id: &str,
        message: NewMessage,
    ) -> Result<Project> {
        let exists: Option<(String,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = ? AND user_id = ?")
                .bind(project_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }

        let now = now_millis();
        sqlx::query(
            "INSERT INTO messages (id, project_id, sender, text, kind, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new_id("msg"))
        .bind(project_id)
        .bind(message.sender.as_str())
        .bind(&message.text)
        .bind(message.kind.map(|k| k.as_str()))
        .bind(message.status.map(|s| s.as_str()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.update(user_id, project_id, UpdateProjectParams::default())
            .await
    }

    /// Remove the project and its messages. Idempotent — deleting an absent
    /// project is not an error. Clears the active-project pointer when it
    /// referenced the deleted id.
    pub async fn delete(&self, user_id: &str, project_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM messages WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM user_settings WHERE user_id = ? AND key = ? AND value = ?")
            .bind(user_id)
            .bind(ACTIVE_PROJECT_KEY)
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Active project pointer ───────────────────────────────────────────────

    pub async fn active_project(&self, user_id: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_settings WHERE user_id = ? AND key = ?")
                .bind(user_id)
                .bind(ACTIVE_PROJECT_KEY)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(v,)| v))
    }

    pub async fn set_active_project(&self, user_id: &str, project_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_settings (user_id, key, value) VALUES (?, ?, ?) \
             ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value",
        )
        .bind(user_id)
        .bind(ACTIVE_PROJECT_KEY)
        .bind(project_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Private helpers ──────────────────────────────────────────────────────

    async fn chat_history(&self, project_id: &str) -> Result<Vec<ChatMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender, text, kind, status, created_at \
             FROM messages WHERE project_id = ? ORDER BY rowid ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
