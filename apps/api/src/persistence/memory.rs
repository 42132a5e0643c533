//! In-memory unit of work for tests. A unit holds the store lock for its whole
//! lifetime and works on a private copy; `commit` publishes the copy, dropping
//! it discards every write. Overlapping units therefore run one after another.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::models::template::Template;
use crate::persistence::{Database, ResumeStore, SequenceState, TemplateStore, UnitOfWork};
use crate::templates::resolver::resolve_template;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    templates: BTreeMap<i64, Template>,
    resumes: BTreeMap<i64, Resume>,
    resume_seq: SequenceState,
    next_child_id: i64,
}

impl MemoryState {
    fn next_resume_id(&mut self) -> i64 {
        let id = self.resume_seq.next_value();
        self.resume_seq = SequenceState {
            last_value: id,
            is_called: true,
        };
        id
    }

    fn advance_resume_seq_past(&mut self, id: i64) {
        if let Some(target) = self.resume_seq.advance_past(id) {
            self.resume_seq = SequenceState {
                last_value: target,
                is_called: true,
            };
        }
    }

    fn next_child_id(&mut self) -> Option<i64> {
        self.next_child_id += 1;
        Some(self.next_child_id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryDatabase {
    pub fn with_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let state = MemoryState {
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
            ..Default::default()
        };
        MemoryDatabase {
            state: Arc::new(Mutex::new(state)),
            fail_saves: Arc::default(),
        }
    }

    /// Makes every subsequent save fail after the root has been written to the
    /// unit's working copy.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub async fn resume_count(&self) -> usize {
        self.state.lock().await.resumes.len()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let shared = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork {
            working: shared.clone(),
            shared,
            fail_saves: self.fail_saves.load(Ordering::SeqCst),
        }))
    }
}

pub struct MemoryUnitOfWork {
    working: MemoryState,
    shared: OwnedMutexGuard<MemoryState>,
    fail_saves: bool,
}

#[async_trait]
impl TemplateStore for MemoryUnitOfWork {
    async fn find_template(&mut self, id: i64) -> Result<Option<Template>, AppError> {
        Ok(self.working.templates.get(&id).cloned())
    }
}

#[async_trait]
impl ResumeStore for MemoryUnitOfWork {
    async fn save_resume(&mut self, mut resume: Resume) -> Result<Resume, AppError> {
        resume.template = resolve_template(&mut *self, resume.template.id).await?;
        resume.drop_empty_lists();

        let state = &mut self.working;
        let id = match resume.id {
            Some(id) => {
                state.advance_resume_seq_past(id);
                id
            }
            None => state.next_resume_id(),
        };
        resume.id = Some(id);
        state.resumes.insert(id, resume.clone());

        if self.fail_saves {
            return Err(AppError::Internal(anyhow::anyhow!(
                "injected failure while writing children of resume {id}"
            )));
        }

        let state = &mut self.working;
        if let Some(contact) = resume.contact.as_mut() {
            contact.id = state.next_child_id();
        }
        for education in resume.education_list.iter_mut().flatten() {
            education.id = state.next_child_id();
        }
        for experience in resume.experience_list.iter_mut().flatten() {
            experience.id = state.next_child_id();
        }
        for skill in resume.skills_list.iter_mut().flatten() {
            skill.id = state.next_child_id();
        }
        for certification in resume.certification_list.iter_mut().flatten() {
            certification.id = state.next_child_id();
        }
        for reference in resume.reference_list.iter_mut().flatten() {
            reference.id = state.next_child_id();
        }
        if let Some(summary) = resume.summary.as_mut() {
            summary.id = state.next_child_id();
        }

        state.resumes.insert(id, resume.clone());
        Ok(resume)
    }

    async fn find_resume(&mut self, id: i64) -> Result<Resume, AppError> {
        self.working
            .resumes
            .get(&id)
            .cloned()
            .ok_or(AppError::ResumeNotFound(id))
    }

    async fn find_all_resumes(&mut self) -> Result<Vec<Resume>, AppError> {
        Ok(self.working.resumes.values().cloned().collect())
    }

    async fn delete_resume(&mut self, id: i64) -> Result<(), AppError> {
        self.working
            .resumes
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::ResumeNotFound(id))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnitOfWork {
            working,
            mut shared,
            ..
        } = *self;
        *shared = working;
        Ok(())
    }
}
