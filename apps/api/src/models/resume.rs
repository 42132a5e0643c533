use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::template::Template;

/// Review state of a resume. Only `PendingReview` is ever assigned here;
/// the other states are set by the external review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResumeStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::PendingReview => "PENDING_REVIEW",
            ResumeStatus::Approved => "APPROVED",
            ResumeStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_REVIEW" => Ok(ResumeStatus::PendingReview),
            "APPROVED" => Ok(ResumeStatus::Approved),
            "REJECTED" => Ok(ResumeStatus::Rejected),
            other => Err(format!("unknown resume status '{other}'")),
        }
    }
}

/// The resume aggregate: the root plus every sub-entity it owns.
///
/// Each optional category is either absent (`None`) or populated. A list
/// category is never `Some(vec![])` when produced by the builder or read
/// back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub id: Option<i64>,
    pub status: ResumeStatus,
    pub template: Template,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub education_list: Option<Vec<Education>>,
    #[serde(default)]
    pub experience_list: Option<Vec<Experience>>,
    #[serde(default)]
    pub skills_list: Option<Vec<Skills>>,
    #[serde(default)]
    pub certification_list: Option<Vec<Certification>>,
    #[serde(default)]
    pub reference_list: Option<Vec<Reference>>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

impl Resume {
    /// A fresh, unpersisted aggregate with no sub-entities attached.
    pub fn pending_review(template: Template) -> Self {
        Resume {
            id: None,
            status: ResumeStatus::PendingReview,
            template,
            contact: None,
            education_list: None,
            experience_list: None,
            skills_list: None,
            certification_list: None,
            reference_list: None,
            summary: None,
        }
    }

    /// Collapses any `Some(vec![])` list category to `None`, so an empty list
    /// and an absent one are stored and returned the same way.
    pub fn drop_empty_lists(&mut self) {
        fn collapse<T>(list: &mut Option<Vec<T>>) {
            if list.as_ref().is_some_and(Vec::is_empty) {
                *list = None;
            }
        }
        collapse(&mut self.education_list);
        collapse(&mut self.experience_list);
        collapse(&mut self.skills_list);
        collapse(&mut self.certification_list);
        collapse(&mut self.reference_list);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub driver_license: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Education {
    #[serde(default)]
    pub id: Option<i64>,
    pub school_name: Option<String>,
    pub school_location: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_month_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    #[serde(default)]
    pub id: Option<i64>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub job_responsibilities: Option<String>,
    #[serde(default)]
    pub current_work: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skills {
    #[serde(default)]
    pub id: Option<i64>,
    pub skill_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Certification {
    #[serde(default)]
    pub id: Option<i64>,
    pub certification_name: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reference {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position_title: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company_name: Option<String>,
    pub relationship_to_user: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Summary {
    #[serde(default)]
    pub id: Option<i64>,
    pub summary_text: Option<String>,
}
