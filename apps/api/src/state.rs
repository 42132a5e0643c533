use crate::resumes::service::ResumeService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: ResumeService,
}
