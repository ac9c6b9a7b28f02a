use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::template::{Template, TemplateRow};

/// Read-only template source. Templates are seeded outside this service.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Every template in creation order.
    async fn list(&self) -> Result<Vec<Template>, AppError>;
}

pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn list(&self) -> Result<Vec<Template>, AppError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT * FROM templates ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Template::from).collect())
    }
}

#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<Vec<Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            templates: RwLock::new(templates),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn list(&self) -> Result<Vec<Template>, AppError> {
        let mut templates = self.templates.read().await.clone();
        templates.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn template(name: &str, id: Uuid, created_at: chrono::DateTime<Utc>) -> Template {
        Template {
            id,
            name: name.to_string(),
            description: String::new(),
            thumbnail: String::new(),
            is_premium: false,
            styles: serde_json::from_value(json!({
                "fonts": { "heading": "Georgia", "body": "Inter" },
                "colors": { "primary": "#000000", "secondary": "#333333", "text": "#111111", "background": "#ffffff" },
                "layout": "classic",
                "spacing": "normal"
            }))
            .unwrap(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_memory_list_in_creation_order() {
        let now = Utc::now();
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let store = MemoryTemplateStore::with_templates(vec![
            template("newest", Uuid::new_v4(), now),
            template("tied-high", high, now - Duration::seconds(10)),
            template("oldest", Uuid::new_v4(), now - Duration::seconds(60)),
            template("tied-low", low, now - Duration::seconds(10)),
        ]);

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["oldest", "tied-low", "tied-high", "newest"]);
    }
}
