//! PostgreSQL-backed unit of work. One sqlx transaction per unit; dropping it
//! without `commit` rolls the transaction back.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{
    Certification, Contact, Education, Experience, Reference, Resume, ResumeStatus, Skills,
    Summary,
};
use crate::models::template::Template;
use crate::persistence::{Database, ResumeStore, SequenceState, TemplateStore, UnitOfWork};
use crate::templates::resolver::resolve_template;

const CHILD_TABLES: &[&str] = &[
    "resume_contacts",
    "resume_educations",
    "resume_experiences",
    "resume_skills",
    "resume_certifications",
    "resume_references",
    "resume_summaries",
];

const RESUME_SELECT: &str = r#"
    SELECT r.id, r.status, t.id AS template_id, t.name AS template_name,
           t.layout AS template_layout, t.description AS template_description
    FROM resumes r
    JOIN templates t ON t.id = r.template_id
"#;

/// Root row joined with its template.
#[derive(Debug, FromRow)]
struct ResumeRow {
    id: i64,
    status: String,
    template_id: i64,
    template_name: String,
    template_layout: Option<String>,
    template_description: Option<String>,
}

impl ResumeRow {
    fn into_resume(self) -> Result<Resume, AppError> {
        let status = self
            .status
            .parse::<ResumeStatus>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("resume {}: {e}", self.id)))?;

        let mut resume = Resume::pending_review(Template {
            id: self.template_id,
            name: self.template_name,
            layout: self.template_layout,
            description: self.template_description,
        });
        resume.id = Some(self.id);
        resume.status = status;
        Ok(resume)
    }
}

/// A child row tagged with the resume that owns it.
struct Owned<T> {
    resume_id: i64,
    item: T,
}

impl<'r, T> FromRow<'r, PgRow> for Owned<T>
where
    T: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Owned {
            resume_id: row.try_get("resume_id")?,
            item: T::from_row(row)?,
        })
    }
}

/// Groups child rows by owning resume, keeping row order. A resume with no
/// rows gets no entry, so it reads back as absent rather than empty.
fn group_by_resume<T>(rows: Vec<Owned<T>>) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(row.resume_id).or_default().push(row.item);
    }
    grouped
}

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        PgDatabase { pool }
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    async fn fetch_children<T>(
        &mut self,
        table: &str,
        resume_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<T>>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT * FROM {table} WHERE resume_id = ANY($1) ORDER BY id");
        let rows = sqlx::query_as::<_, Owned<T>>(&sql)
            .bind(resume_ids)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(group_by_resume(rows))
    }

    /// Attaches children to root rows with one query per child table,
    /// however many roots there are.
    async fn load_aggregates(&mut self, rows: Vec<ResumeRow>) -> Result<Vec<Resume>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let mut contacts = self.fetch_children::<Contact>("resume_contacts", &ids).await?;
        let mut educations = self
            .fetch_children::<Education>("resume_educations", &ids)
            .await?;
        let mut experiences = self
            .fetch_children::<Experience>("resume_experiences", &ids)
            .await?;
        let mut skills = self.fetch_children::<Skills>("resume_skills", &ids).await?;
        let mut certifications = self
            .fetch_children::<Certification>("resume_certifications", &ids)
            .await?;
        let mut references = self
            .fetch_children::<Reference>("resume_references", &ids)
            .await?;
        let mut summaries = self.fetch_children::<Summary>("resume_summaries", &ids).await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                let mut resume = row.into_resume()?;
                resume.contact = contacts.remove(&id).and_then(|c| c.into_iter().next());
                resume.education_list = educations.remove(&id);
                resume.experience_list = experiences.remove(&id);
                resume.skills_list = skills.remove(&id);
                resume.certification_list = certifications.remove(&id);
                resume.reference_list = references.remove(&id);
                resume.summary = summaries.remove(&id).and_then(|s| s.into_iter().next());
                Ok(resume)
            })
            .collect()
    }

    /// Inserts or overwrites the root row and returns its id.
    async fn upsert_root(&mut self, resume: &Resume) -> Result<i64, AppError> {
        let id: i64 = match resume.id {
            Some(id) => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO resumes (id, template_id, status)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (id) DO UPDATE
                    SET template_id = EXCLUDED.template_id,
                        status = EXCLUDED.status,
                        updated_at = NOW()
                    RETURNING id
                    "#,
                )
                .bind(id)
                .bind(resume.template.id)
                .bind(resume.status.as_str())
                .fetch_one(&mut *self.tx)
                .await?;
                self.advance_sequence_past(id).await?;
                id
            }
            None => {
                sqlx::query_scalar(
                    "INSERT INTO resumes (template_id, status) VALUES ($1, $2) RETURNING id",
                )
                .bind(resume.template.id)
                .bind(resume.status.as_str())
                .fetch_one(&mut *self.tx)
                .await?
            }
        };
        Ok(id)
    }

    /// Explicit ids bypass the sequence. Moves it past `id` only when it
    /// would otherwise hand `id` out later; never moves it back.
    async fn advance_sequence_past(&mut self, id: i64) -> Result<(), AppError> {
        let seq = sqlx::query_as::<_, SequenceState>(
            "SELECT last_value, is_called FROM resumes_id_seq",
        )
        .fetch_one(&mut *self.tx)
        .await?;

        if let Some(target) = seq.advance_past(id) {
            // GREATEST: a concurrent bump between the read and the set must win.
            sqlx::query(
                r#"
                SELECT setval('resumes_id_seq', GREATEST($1, (SELECT last_value FROM resumes_id_seq)))
                "#,
            )
            .bind(target)
            .execute(&mut *self.tx)
            .await?;
            debug!("Advanced resumes_id_seq to {target}");
        }
        Ok(())
    }

    async fn clear_children(&mut self, resume_id: i64) -> Result<(), AppError> {
        for table in CHILD_TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE resume_id = $1"))
                .bind(resume_id)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }

    async fn insert_children(
        &mut self,
        resume_id: i64,
        resume: &mut Resume,
    ) -> Result<(), AppError> {
        if let Some(contact) = resume.contact.as_mut() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO resume_contacts
                    (resume_id, first_name, last_name, email, phone_number, country, city,
                     state, post_code, date_of_birth, driver_license, nationality)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING id
                "#,
            )
            .bind(resume_id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone_number)
            .bind(&contact.country)
            .bind(&contact.city)
            .bind(&contact.state)
            .bind(&contact.post_code)
            .bind(contact.date_of_birth)
            .bind(&contact.driver_license)
            .bind(&contact.nationality)
            .fetch_one(&mut *self.tx)
            .await?;
            contact.id = Some(id);
        }

        for education in resume.education_list.iter_mut().flatten() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO resume_educations
                    (resume_id, school_name, school_location, degree, field_of_study,
                     graduation_month_year)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(resume_id)
            .bind(&education.school_name)
            .bind(&education.school_location)
            .bind(&education.degree)
            .bind(&education.field_of_study)
            .bind(&education.graduation_month_year)
            .fetch_one(&mut *self.tx)
            .await?;
            education.id = Some(id);
        }

        for experience in resume.experience_list.iter_mut().flatten() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO resume_experiences
                    (resume_id, job_title, company_name, country, state, city, start_date,
                     end_date, job_responsibilities, current_work)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id
                "#,
            )
            .bind(resume_id)
            .bind(&experience.job_title)
            .bind(&experience.company_name)
            .bind(&experience.country)
            .bind(&experience.state)
            .bind(&experience.city)
            .bind(experience.start_date)
            .bind(experience.end_date)
            .bind(&experience.job_responsibilities)
            .bind(experience.current_work)
            .fetch_one(&mut *self.tx)
            .await?;
            experience.id = Some(id);
        }

        for skill in resume.skills_list.iter_mut().flatten() {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO resume_skills (resume_id, skill_name) VALUES ($1, $2) RETURNING id",
            )
            .bind(resume_id)
            .bind(&skill.skill_name)
            .fetch_one(&mut *self.tx)
            .await?;
            skill.id = Some(id);
        }

        for certification in resume.certification_list.iter_mut().flatten() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO resume_certifications
                    (resume_id, certification_name, issuing_organization, issue_date)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(resume_id)
            .bind(&certification.certification_name)
            .bind(&certification.issuing_organization)
            .bind(certification.issue_date)
            .fetch_one(&mut *self.tx)
            .await?;
            certification.id = Some(id);
        }

        for reference in resume.reference_list.iter_mut().flatten() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO resume_references
                    (resume_id, first_name, last_name, position_title, email, phone_number,
                     company_name, relationship_to_user)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(resume_id)
            .bind(&reference.first_name)
            .bind(&reference.last_name)
            .bind(&reference.position_title)
            .bind(&reference.email)
            .bind(&reference.phone_number)
            .bind(&reference.company_name)
            .bind(&reference.relationship_to_user)
            .fetch_one(&mut *self.tx)
            .await?;
            reference.id = Some(id);
        }

        if let Some(summary) = resume.summary.as_mut() {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO resume_summaries (resume_id, summary_text) VALUES ($1, $2) RETURNING id",
            )
            .bind(resume_id)
            .bind(&summary.summary_text)
            .fetch_one(&mut *self.tx)
            .await?;
            summary.id = Some(id);
        }

        Ok(())
    }
}

#[async_trait]
impl TemplateStore for PgUnitOfWork {
    async fn find_template(&mut self, id: i64) -> Result<Option<Template>, AppError> {
        Ok(sqlx::query_as::<_, Template>(
            "SELECT id, name, layout, description FROM templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?)
    }
}

#[async_trait]
impl ResumeStore for PgUnitOfWork {
    async fn save_resume(&mut self, mut resume: Resume) -> Result<Resume, AppError> {
        // The template is referenced, not owned: return the catalog row.
        resume.template = resolve_template(&mut *self, resume.template.id).await?;
        resume.drop_empty_lists();
        let id = self.upsert_root(&resume).await?;
        resume.id = Some(id);
        self.clear_children(id).await?;
        self.insert_children(id, &mut resume).await?;
        debug!("Wrote resume {id} and its children");
        Ok(resume)
    }

    async fn find_resume(&mut self, id: i64) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!("{RESUME_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(AppError::ResumeNotFound(id))?;
        self.load_aggregates(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::ResumeNotFound(id))
    }

    async fn find_all_resumes(&mut self) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(&format!("{RESUME_SELECT} ORDER BY r.id"))
            .fetch_all(&mut *self.tx)
            .await?;
        self.load_aggregates(rows).await
    }

    async fn delete_resume(&mut self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResumeNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(resume_id: i64, skill: &str) -> Owned<Skills> {
        Owned {
            resume_id,
            item: Skills {
                id: None,
                skill_name: Some(skill.to_string()),
            },
        }
    }

    fn names(skills: &[Skills]) -> Vec<&str> {
        skills.iter().filter_map(|s| s.skill_name.as_deref()).collect()
    }

    #[test]
    fn test_group_by_resume_keeps_row_order_per_resume() {
        let grouped = group_by_resume(vec![
            owned(1, "Rust"),
            owned(2, "Go"),
            owned(1, "SQL"),
            owned(1, "Kafka"),
        ]);
        assert_eq!(names(&grouped[&1]), vec!["Rust", "SQL", "Kafka"]);
        assert_eq!(names(&grouped[&2]), vec!["Go"]);
    }

    #[test]
    fn test_group_by_resume_leaves_childless_resumes_absent() {
        let grouped = group_by_resume(vec![owned(7, "Rust")]);
        assert!(!grouped.contains_key(&8));
        assert!(group_by_resume::<Skills>(vec![]).is_empty());
    }

    #[test]
    fn test_into_resume_rejects_unknown_status() {
        let row = ResumeRow {
            id: 4,
            status: "ARCHIVED".to_string(),
            template_id: 1,
            template_name: "Classic".to_string(),
            template_layout: None,
            template_description: None,
        };
        assert!(matches!(row.into_resume(), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_into_resume_carries_root_and_template() {
        let row = ResumeRow {
            id: 4,
            status: "APPROVED".to_string(),
            template_id: 2,
            template_name: "Compact".to_string(),
            template_layout: Some("two-column".to_string()),
            template_description: None,
        };
        let resume = row.into_resume().unwrap();
        assert_eq!(resume.id, Some(4));
        assert_eq!(resume.status, ResumeStatus::Approved);
        assert_eq!(resume.template.name, "Compact");
        assert!(resume.contact.is_none());
        assert!(resume.skills_list.is_none());
    }
}
