use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::resumes::validation::{
    child_path, email_or_empty, optional_bool, optional_list, optional_object, optional_string,
    required_object, required_string, template_reference, url_or_empty, BodyShape, FieldError,
};

/// A stored résumé as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: ResumeContent,
    pub template_id: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `resumes` row; `content` lives in a JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Json<ResumeContent>,
    pub template_id: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content: row.content.0,
            template_id: row.template_id,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Structured résumé body. Section items are caller-defined and kept verbatim;
/// missing sections deserialize as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ResumeContent {
    #[validate(nested)]
    pub personal: PersonalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Value>,
    #[serde(default)]
    pub education: Vec<Value>,
    #[serde(default)]
    pub skills: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub languages: Vec<Value>,
    #[serde(default)]
    pub certifications: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "email_or_empty", message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "url_or_empty", message = "Invalid URL"))]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section item shapes used by the editor. The access layer stores items as
// opaque JSON and never enforces these.
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub github: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Elementary,
    #[serde(rename = "Limited Working")]
    LimitedWorking,
    #[serde(rename = "Professional Working")]
    ProfessionalWorking,
    #[serde(rename = "Full Professional")]
    FullProfessional,
    Native,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

/// POST /resumes body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResumeRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: String,
    #[validate(nested)]
    pub content: ResumeContent,
    #[validate(custom(function = "template_reference", message = "Template id must be a UUID"))]
    pub template_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// PUT /resumes/:id body. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateResumeRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: Option<String>,
    #[validate(nested)]
    pub content: Option<ResumeContent>,
    #[validate(custom(function = "template_reference", message = "Template id must be a UUID"))]
    pub template_id: Option<String>,
    pub is_public: Option<bool>,
}

const PERSONAL_TEXT_FIELDS: [&str; 6] = ["email", "phone", "location", "website", "linkedin", "github"];
const SECTIONS: [&str; 6] = [
    "experience",
    "education",
    "skills",
    "projects",
    "languages",
    "certifications",
];

fn check_content_shape(content: &mut Map<String, Value>, errors: &mut Vec<FieldError>) {
    let placeholder = json!({ "name": "" });
    if let Some(personal) =
        required_object(content, "personal", "content.personal", placeholder, errors)
    {
        required_string(personal, "name", "content.personal.name", errors);
        for key in PERSONAL_TEXT_FIELDS {
            optional_string(personal, key, &child_path("content.personal", key), errors);
        }
    }
    optional_string(content, "summary", "content.summary", errors);
    for key in SECTIONS {
        optional_list(content, key, &child_path("content", key), errors);
    }
}

impl BodyShape for CreateResumeRequest {
    fn check_shape(body: &mut Map<String, Value>, errors: &mut Vec<FieldError>) {
        required_string(body, "title", "title", errors);
        let placeholder = json!({ "personal": { "name": "" } });
        if let Some(content) = required_object(body, "content", "content", placeholder, errors) {
            check_content_shape(content, errors);
        }
        optional_string(body, "template_id", "template_id", errors);
        optional_bool(body, "is_public", "is_public", errors);
    }
}

impl BodyShape for UpdateResumeRequest {
    fn check_shape(body: &mut Map<String, Value>, errors: &mut Vec<FieldError>) {
        optional_string(body, "title", "title", errors);
        if let Some(content) = optional_object(body, "content", "content", errors) {
            check_content_shape(content, errors);
        }
        optional_string(body, "template_id", "template_id", errors);
        optional_bool(body, "is_public", "is_public", errors);
    }
}

/// Validated insert handed to a `ResumeStore`.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub title: String,
    pub content: ResumeContent,
    pub template_id: Option<Uuid>,
    pub is_public: bool,
}

/// Validated partial update handed to a `ResumeStore`.
#[derive(Debug, Clone, Default)]
pub struct ResumeChanges {
    pub title: Option<String>,
    pub content: Option<ResumeContent>,
    pub template_id: Option<Uuid>,
    pub is_public: Option<bool>,
}

fn parse_template_id(raw: Option<String>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(&s).ok())
}

impl From<CreateResumeRequest> for NewResume {
    /// Expects a request that already passed `validate()`.
    fn from(req: CreateResumeRequest) -> Self {
        NewResume {
            title: req.title,
            content: req.content,
            template_id: parse_template_id(req.template_id),
            is_public: req.is_public,
        }
    }
}

impl From<UpdateResumeRequest> for ResumeChanges {
    /// Expects a request that already passed `validate()`.
    fn from(req: UpdateResumeRequest) -> Self {
        ResumeChanges {
            title: req.title,
            content: req.content,
            template_id: parse_template_id(req.template_id),
            is_public: req.is_public,
        }
    }
}
