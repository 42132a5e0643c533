//! Aggregate Builder: turns one creation request into one unpersisted
//! `Resume` with every present category attached.

use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::persistence::TemplateStore;
use crate::resumes::dto::ResumeCreationRequest;
use crate::resumes::mappers::map_list;
use crate::templates::resolver::resolve_template;

/// Resolves the referenced template, then maps each category the request
/// supplies. Absent and empty lists are both left off the aggregate.
pub async fn build_resume<S>(
    templates: &mut S,
    request: ResumeCreationRequest,
) -> Result<Resume, AppError>
where
    S: TemplateStore + ?Sized,
{
    let template = resolve_template(templates, request.template_id).await?;
    let mut resume = Resume::pending_review(template);

    resume.contact = request.contact.map(Into::into);
    resume.education_list = map_list(request.education_list);
    resume.experience_list = map_list(request.experience_list);
    resume.skills_list = map_list(request.skills_list);
    resume.certification_list = map_list(request.certification_list);
    resume.reference_list = map_list(request.reference_list);
    resume.summary = request.summary.map(Into::into);

    debug!("Built resume aggregate for template {}", resume.template.id);
    Ok(resume)
}
