//! Resume Service — the public entry point for resume CRUD.
//!
//! Each operation acquires exactly one unit of work. Nothing written inside
//! it is visible until `commit`; any early return drops the unit and rolls
//! every write back.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::persistence::Database;
use crate::resumes::builder::build_resume;
use crate::resumes::dto::ResumeCreationRequest;

#[derive(Clone)]
pub struct ResumeService {
    db: Arc<dyn Database>,
}

impl ResumeService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        ResumeService { db }
    }

    /// Resolves the template, assembles the aggregate and stores it with
    /// status `PENDING_REVIEW`, all in one unit of work.
    pub async fn create_resume(
        &self,
        request: ResumeCreationRequest,
    ) -> Result<Resume, AppError> {
        let mut uow = self.db.begin().await?;
        let resume = build_resume(uow.as_mut(), request).await?;
        let saved = uow.save_resume(resume).await?;
        uow.commit().await?;

        info!(
            "Created resume {:?} with template {}",
            saved.id, saved.template.id
        );
        Ok(saved)
    }

    /// Overwrite-save of a caller-supplied aggregate. There is no existence
    /// check: an unknown id is stored under that id.
    pub async fn update_resume(&self, resume: Resume) -> Result<Resume, AppError> {
        let mut uow = self.db.begin().await?;
        let saved = uow.save_resume(resume).await?;
        uow.commit().await?;

        info!("Saved resume {:?} with status {}", saved.id, saved.status);
        Ok(saved)
    }

    pub async fn get_resume_by_id(&self, id: i64) -> Result<Resume, AppError> {
        let mut uow = self.db.begin().await?;
        uow.find_resume(id).await
    }

    pub async fn get_all_resumes(&self) -> Result<Vec<Resume>, AppError> {
        let mut uow = self.db.begin().await?;
        uow.find_all_resumes().await
    }

    /// Fails with `ResumeNotFound` rather than silently doing nothing.
    pub async fn delete_resume_by_id(&self, id: i64) -> Result<(), AppError> {
        let mut uow = self.db.begin().await?;
        uow.find_resume(id).await?;
        uow.delete_resume(id).await?;
        uow.commit().await?;

        info!("Deleted resume {id}");
        Ok(())
    }
}
