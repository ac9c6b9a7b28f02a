//! Resume persistence: pluggable, trait-based store behind the access layer.
//!
//! Ownership and visibility are part of every query: a caller never receives a
//! record it may not see, and "absent" and "not yours" come back the same way
//! (`None` / `false`).
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`: `PgResumeStore` in production,
//! `MemoryResumeStore` for tests and `STORE=memory` local runs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, Resume, ResumeChanges, ResumeRow};

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Résumés owned by `owner`, most recently updated first.
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn insert(&self, owner: Uuid, input: NewResume) -> Result<Resume, AppError>;

    /// The record if it is public or owned by `viewer`.
    async fn find_visible(&self, id: Uuid, viewer: Option<Uuid>)
        -> Result<Option<Resume>, AppError>;

    /// Applies `changes` if `owner` owns the record. `updated_at` always moves forward.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, AppError>;

    /// Returns whether a row owned by `owner` was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn insert(&self, owner: Uuid, input: NewResume) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (user_id, title, content, template_id, is_public)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&input.title)
        .bind(Json(&input.content))
        .bind(input.template_id)
        .bind(input.is_public)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_visible(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<Resume>, AppError> {
        // With no viewer `user_id = NULL` is never true, leaving only public rows.
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND (is_public OR user_id = $2)",
        )
        .bind(id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET
                title       = COALESCE($3, title),
                content     = COALESCE($4, content),
                template_id = COALESCE($5, template_id),
                is_public   = COALESCE($6, is_public),
                updated_at  = GREATEST(now(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.content.map(Json))
        .bind(changes.template_id)
        .bind(changes.is_public)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryTable {
    rows: Vec<Resume>,
    last_stamp: Option<DateTime<Utc>>,
}

impl MemoryTable {
    /// Strictly increasing clock, so equal wall-clock reads never tie.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Process-local store with the same predicates as `PgResumeStore`.
#[derive(Default)]
pub struct MemoryResumeStore {
    table: RwLock<MemoryTable>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Resume>, AppError> {
        let table = self.table.read().await;
        let mut owned: Vec<Resume> = table
            .rows
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn insert(&self, owner: Uuid, input: NewResume) -> Result<Resume, AppError> {
        let mut table = self.table.write().await;
        let now = table.tick();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: owner,
            title: input.title,
            content: input.content,
            template_id: input.template_id,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(resume.clone());
        Ok(resume)
    }

    async fn find_visible(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<Resume>, AppError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|r| r.id == id && (r.is_public || Some(r.user_id) == viewer))
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        let mut table = self.table.write().await;
        let now = table.tick();
        let Some(resume) = table
            .rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            resume.title = title;
        }
        if let Some(content) = changes.content {
            resume.content = content;
        }
        if let Some(template_id) = changes.template_id {
            resume.template_id = Some(template_id);
        }
        if let Some(is_public) = changes.is_public {
            resume.is_public = is_public;
        }
        resume.updated_at = now.max(resume.updated_at + Duration::microseconds(1));
        Ok(Some(resume.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| !(r.id == id && r.user_id == owner));
        Ok(table.rows.len() < before)
    }
}
