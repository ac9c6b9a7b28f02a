use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub is_premium: bool,
    pub styles: TemplateStyles,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub is_premium: bool,
    pub styles: Json<TemplateStyles>,
    pub created_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Template {
            id: row.id,
            name: row.name,
            description: row.description,
            thumbnail: row.thumbnail,
            is_premium: row.is_premium,
            styles: row.styles.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStyles {
    pub fonts: TemplateFonts,
    pub colors: TemplateColors,
    pub layout: LayoutVariant,
    pub spacing: SpacingVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFonts {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateColors {
    pub primary: String,
    pub secondary: String,
    pub text: String,
    pub background: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    SingleColumn,
    TwoColumn,
    Modern,
    Classic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingVariant {
    Compact,
    Normal,
    Spacious,
}

/// GET /templates payload: both tiers plus the full list, all in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateCatalog {
    pub free: Vec<Template>,
    pub premium: Vec<Template>,
    pub all: Vec<Template>,
}

impl TemplateCatalog {
    pub fn from_templates(all: Vec<Template>) -> Self {
        let (premium, free): (Vec<Template>, Vec<Template>) =
            all.iter().cloned().partition(|t| t.is_premium);
        TemplateCatalog { free, premium, all }
    }
}
