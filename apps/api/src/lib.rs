//! Résumé API: authenticated résumé CRUD, template listing and the editor
//! session used by clients between saves.

pub mod auth;
pub mod config;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod resumes;
pub mod routes;
pub mod state;
pub mod templates;

#[cfg(test)]
mod test_support;

pub use routes::build_router;
pub use state::AppState;
