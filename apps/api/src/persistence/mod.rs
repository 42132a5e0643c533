//! Storage seam for the resume service.
//!
//! Every service operation runs inside one [`UnitOfWork`] obtained from a
//! [`Database`]. Writes become visible only after [`UnitOfWork::commit`];
//! dropping an uncommitted unit of work discards everything it wrote.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::models::template::Template;

/// Read access to the externally managed template catalog.
#[async_trait]
pub trait TemplateStore: Send {
    async fn find_template(&mut self, id: i64) -> Result<Option<Template>, AppError>;
}

/// Resume Store Gateway: persists and retrieves whole resume aggregates.
#[async_trait]
pub trait ResumeStore: Send {
    /// Writes the root and every attached child, replacing whatever children
    /// were stored before. Assigns identifiers where absent.
    async fn save_resume(&mut self, resume: Resume) -> Result<Resume, AppError>;

    /// Fails with `ResumeNotFound` when absent.
    async fn find_resume(&mut self, id: i64) -> Result<Resume, AppError>;

    async fn find_all_resumes(&mut self) -> Result<Vec<Resume>, AppError>;

    /// Removes the aggregate and all owned children. Fails with
    /// `ResumeNotFound` when absent.
    async fn delete_resume(&mut self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait UnitOfWork: TemplateStore + ResumeStore {
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

#[async_trait]
pub trait Database: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

/// State of a serial id sequence, in the shape PostgreSQL reports it
/// (`SELECT last_value, is_called FROM <seq>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct SequenceState {
    pub last_value: i64,
    pub is_called: bool,
}

impl Default for SequenceState {
    fn default() -> Self {
        SequenceState {
            last_value: 1,
            is_called: false,
        }
    }
}

impl SequenceState {
    /// The value the next `nextval` hands out.
    pub fn next_value(&self) -> i64 {
        if self.is_called {
            self.last_value + 1
        } else {
            self.last_value
        }
    }

    /// Value to `setval` so the sequence never hands out `explicit_id`.
    /// `None` when the sequence is already past it; never moves backwards.
    pub fn advance_past(&self, explicit_id: i64) -> Option<i64> {
        (explicit_id >= self.next_value()).then_some(explicit_id)
    }
}
