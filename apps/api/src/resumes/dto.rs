//! Inbound request shapes. Each sub-shape mirrors its domain counterpart
//! field-for-field, minus the storage identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request body for creating a resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeCreationRequest {
    pub template_id: i64,
    #[serde(default)]
    pub contact: Option<ContactDto>,
    #[serde(default)]
    pub education_list: Option<Vec<EducationDto>>,
    #[serde(default)]
    pub experience_list: Option<Vec<ExperienceDto>>,
    #[serde(default)]
    pub skills_list: Option<Vec<SkillsDto>>,
    #[serde(default)]
    pub certification_list: Option<Vec<CertificationDto>>,
    #[serde(default)]
    pub reference_list: Option<Vec<ReferenceDto>>,
    #[serde(default)]
    pub summary: Option<SummaryDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDto {
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationDto {
    pub school_name: Option<String>,
    pub school_location: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_month_year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceDto {
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsDto {
    pub skill_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationDto {
    pub certification_name: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position_title: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company_name: Option<String>,
    pub relationship_to_user: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryDto {
    pub summary_text: Option<String>,
}
