//! Editor session: client-side staging area for the résumé being edited.
//!
//! One `EditorSession` per signed-in session: created on sign-in, `clear()`ed
//! on sign-out. It mirrors records returned by the resume endpoints and takes
//! optimistic local edits between saves. It performs no validation and no I/O;
//! the server's record always wins on the next `set_current`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::resume::{PersonalInfo, Resume, ResumeContent};

pub const DEFAULT_TITLE: &str = "Untitled Resume";

/// A partial `ResumeContent`. Each supplied section replaces the current one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPatch {
    pub personal: Option<PersonalInfo>,
    pub summary: Option<String>,
    pub experience: Option<Vec<Value>>,
    pub education: Option<Vec<Value>>,
    pub skills: Option<Vec<Value>>,
    pub projects: Option<Vec<Value>>,
    pub languages: Option<Vec<Value>>,
    pub certifications: Option<Vec<Value>>,
}

impl ContentPatch {
    fn apply(self, content: &mut ResumeContent) {
        if let Some(personal) = self.personal {
            content.personal = personal;
        }
        if let Some(summary) = self.summary {
            content.summary = Some(summary);
        }
        let sections = [
            (self.experience, &mut content.experience),
            (self.education, &mut content.education),
            (self.skills, &mut content.skills),
            (self.projects, &mut content.projects),
            (self.languages, &mut content.languages),
            (self.certifications, &mut content.certifications),
        ];
        for (patch, target) in sections {
            if let Some(items) = patch {
                *target = items;
            }
        }
    }
}

/// Blank content for a résumé that has never been saved.
pub fn empty_content() -> ResumeContent {
    ResumeContent {
        personal: PersonalInfo {
            name: String::new(),
            email: Some(String::new()),
            phone: Some(String::new()),
            location: Some(String::new()),
            website: Some(String::new()),
            linkedin: Some(String::new()),
            github: Some(String::new()),
        },
        summary: Some(String::new()),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    current: Option<Resume>,
    resumes: Vec<Resume>,
    dirty: bool,
    loading: bool,
    error: Option<String>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Resume> {
        self.current.as_ref()
    }

    pub fn resumes(&self) -> &[Resume] {
        &self.resumes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the current résumé, typically with a server response. Clears dirty.
    pub fn set_current(&mut self, resume: Option<Resume>) {
        self.current = resume;
        self.dirty = false;
    }

    pub fn set_resumes(&mut self, resumes: Vec<Resume>) {
        self.resumes = resumes;
    }

    /// Merges `patch` into the current content, marks dirty and bumps the local
    /// `updated_at`. Does nothing when no résumé is loaded.
    pub fn update_content(&mut self, patch: ContentPatch) {
        let Some(resume) = self.current.as_mut() else {
            return;
        };
        patch.apply(&mut resume.content);
        resume.updated_at = Utc::now();
        self.dirty = true;
    }

    /// Starts an unsaved résumé for `user_id` and makes it current.
    pub fn create_new(&mut self, user_id: Uuid, title: Option<&str>) -> Resume {
        let now: DateTime<Utc> = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id,
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            content: empty_content(),
            template_id: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        };
        self.current = Some(resume.clone());
        self.dirty = true;
        resume
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Drops everything held for the session, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.current = None;
        self.resumes.clear();
        self.dirty = false;
        self.error = None;
    }
}
