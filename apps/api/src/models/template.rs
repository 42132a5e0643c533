use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A layout definition resumes point at. Managed outside this service;
/// resumes reference it but never own it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub layout: Option<String>,
    pub description: Option<String>,
}
