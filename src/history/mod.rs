// SPDX-License-Identifier: MIT
//! Recently analyzed code snippets — most-recent-first, capped, unscoped by
//! project.

use anyhow::Result;
use sqlx::SqlitePool;

/// Entries kept beyond this are discarded on every push.
pub const HISTORY_LIMIT: i64 = 5;

pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Prepend a snippet, trim to the cap, and return the current list.
    pub async fn push(&self, code: &str) -> Result<Vec<String>> {
        let now = chrono::Utc::now().timestamp_millis();
        sqlx::query("INSERT INTO history (code, created_at) VALUES (?, ?)")
            .bind(code)
            .bind(now)
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "DELETE FROM history WHERE id NOT IN \
             (SELECT id FROM history ORDER BY id DESC LIMIT ?)",
        )
        .bind(HISTORY_LIMIT)
        .execute(&self.pool)
        .await?;
        self.list().await
    }

    /// Most-recent-first, at most `HISTORY_LIMIT` entries.
    pub async fn list(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT code FROM history ORDER BY id DESC LIMIT ?")
                .bind(HISTORY_LIMIT)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(code,)| code).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn make_store() -> HistoryStore {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .unwrap();
        sqlx::migrate!("src/storage/migrations")
            .run(&pool)
            .await
            .unwrap();
        HistoryStore::new(pool)
    }

    #[tokio::test]
    async fn test_empty_list() {
        let s = make_store().await;
        assert!(s.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_is_most_recent_first() {
        let s = make_store().await;
        s.push("one").await.unwrap();
        let list = s.push("two").await.unwrap();
        assert_eq!(list, vec!["two".to_string(), "one".to_string()]);
    }

    #[tokio::test]
    async fn test_cap_at_five() {
        let s = make_store().await;
        for i in 0..7 {
            s.push(&format!("snippet-{i}")).await.unwrap();
        }
        let list = s.list().await.unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0], "snippet-6");
        assert_eq!(list[4], "snippet-2");
    }
}
