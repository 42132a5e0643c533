//! Sub-entity mappers: total, side-effect-free copies from request shape to
//! domain shape. Identifiers are left unset; storage assigns them.

use crate::models::resume::{
    Certification, Contact, Education, Experience, Reference, Skills, Summary,
};
use crate::resumes::dto::{
    CertificationDto, ContactDto, EducationDto, ExperienceDto, ReferenceDto, SkillsDto,
    SummaryDto,
};

/// Maps a list category element-wise, treating an absent list and an empty
/// list the same way: both yield `None`.
pub fn map_list<D, E>(items: Option<Vec<D>>) -> Option<Vec<E>>
where
    E: From<D>,
{
    match items {
        Some(items) if !items.is_empty() => Some(items.into_iter().map(E::from).collect()),
        _ => None,
    }
}

impl From<ContactDto> for Contact {
    fn from(dto: ContactDto) -> Self {
        Contact {
            id: None,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone_number: dto.phone_number,
            country: dto.country,
            city: dto.city,
            state: dto.state,
            post_code: dto.post_code,
            date_of_birth: dto.date_of_birth,
            driver_license: dto.driver_license,
            nationality: dto.nationality,
        }
    }
}

impl From<EducationDto> for Education {
    fn from(dto: EducationDto) -> Self {
        Education {
            id: None,
            school_name: dto.school_name,
            school_location: dto.school_location,
            degree: dto.degree,
            field_of_study: dto.field_of_study,
            graduation_month_year: dto.graduation_month_year,
        }
    }
}

impl From<ExperienceDto> for Experience {
    fn from(dto: ExperienceDto) -> Self {
        Experience {
            id: None,
            job_title: dto.job_title,
            company_name: dto.company_name,
            country: dto.country,
            state: dto.state,
            city: dto.city,
            start_date: dto.start_date,
            end_date: dto.end_date,
            job_responsibilities: dto.job_responsibilities,
            current_work: dto.current_work,
        }
    }
}

impl From<SkillsDto> for Skills {
    fn from(dto: SkillsDto) -> Self {
        Skills {
            id: None,
            skill_name: dto.skill_name,
        }
    }
}

impl From<CertificationDto> for Certification {
    fn from(dto: CertificationDto) -> Self {
        Certification {
            id: None,
            certification_name: dto.certification_name,
            issuing_organization: dto.issuing_organization,
            issue_date: dto.issue_date,
        }
    }
}

impl From<ReferenceDto> for Reference {
    fn from(dto: ReferenceDto) -> Self {
        Reference {
            id: None,
            first_name: dto.first_name,
            last_name: dto.last_name,
            position_title: dto.position_title,
            email: dto.email,
            phone_number: dto.phone_number,
            company_name: dto.company_name,
            relationship_to_user: dto.relationship_to_user,
        }
    }
}

impl From<SummaryDto> for Summary {
    fn from(dto: SummaryDto) -> Self {
        Summary {
            id: None,
            summary_text: dto.summary_text,
        }
    }
}
