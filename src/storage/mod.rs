use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use tracing::debug;

/// Task column. Stored as TEXT; serialized in kebab-case on the wire and in
/// the database, so an unknown value is rejected before it ever reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Category {
    Todo,
    InProgress,
    Done,
    /// Side list, not a workflow stage.
    QuickList,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub content: String,
    pub category: Category,
    /// RFC 3339 UTC timestamp, set once at creation.
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct NoteRow {
    pub id: i64,
    pub content: String,
}

/// Partial task update. `None` means "leave unchanged"; `Some("")` is a legal
/// content value — absence and empty are distinct.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub category: Option<Category>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Task not found")]
    TaskNotFound,
    #[error("No fields to update")]
    NoFields,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("vibe_board.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(pool)
        .await?;

        // Seed the singleton note row if the table is empty. The guarded
        // INSERT keeps the seed atomic, so the table never ends up with zero
        // or two rows even if two processes initialize concurrently.
        sqlx::query("INSERT INTO notes (content) SELECT '' WHERE NOT EXISTS (SELECT 1 FROM notes)")
            .execute(pool)
            .await?;

        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    /// All tasks, most recent first. The id tiebreaker keeps the order stable
    /// when two tasks share a creation timestamp.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>, StorageError> {
        Ok(
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    pub async fn create_task(
        &self,
        content: &str,
        category: Category,
    ) -> Result<TaskRow, StorageError> {
        let now = Utc::now().to_rfc3339();
        let result =
            sqlx::query("INSERT INTO tasks (content, category, created_at) VALUES (?, ?, ?)")
                .bind(content)
                .bind(category)
                .bind(&now)
                .execute(&self.pool)
                .await?;
        let id = result.last_insert_rowid();
        debug!(id, "task created");
        self.get_task(id).await
    }

    async fn get_task(&self, id: i64) -> Result<TaskRow, StorageError> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Apply only the fields present in `patch`, leaving the rest unchanged.
    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> Result<TaskRow, StorageError> {
        let result = match (&patch.content, patch.category) {
            (None, None) => return Err(StorageError::NoFields),
            (Some(content), None) => {
                sqlx::query("UPDATE tasks SET content = ? WHERE id = ?")
                    .bind(content)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            (None, Some(category)) => {
                sqlx::query("UPDATE tasks SET category = ? WHERE id = ?")
                    .bind(category)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            (Some(content), Some(category)) => {
                sqlx::query("UPDATE tasks SET content = ?, category = ? WHERE id = ?")
                    .bind(content)
                    .bind(category)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(StorageError::TaskNotFound);
        }
        debug!(id, "task updated");
        self.get_task(id).await
    }

    /// Idempotent: deleting an id that does not exist is not an error.
    pub async fn delete_task(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, "task deleted");
        Ok(())
    }

    // ─── Note ───────────────────────────────────────────────────────────────

    /// The singleton note. A row always exists once `init_schema` has run.
    pub async fn get_note(&self) -> Result<NoteRow, StorageError> {
        Ok(sqlx::query_as("SELECT * FROM notes LIMIT 1")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Full overwrite of the note's content. Empty text is allowed.
    pub async fn replace_note(&self, content: &str) -> Result<NoteRow, StorageError> {
        sqlx::query("UPDATE notes SET content = ? WHERE id = (SELECT id FROM notes LIMIT 1)")
            .bind(content)
            .execute(&self.pool)
            .await?;
        self.get_note().await
    }
}
