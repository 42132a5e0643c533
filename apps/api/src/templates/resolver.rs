use tracing::warn;

use crate::errors::AppError;
use crate::models::template::Template;
use crate::persistence::TemplateStore;

/// Looks up a template, failing with `TemplateNotFound` when it does not exist.
pub async fn resolve_template<S>(store: &mut S, template_id: i64) -> Result<Template, AppError>
where
    S: TemplateStore + ?Sized,
{
    match store.find_template(template_id).await? {
        Some(template) => Ok(template),
        None => {
            warn!("Template {template_id} not found");
            Err(AppError::TemplateNotFound(template_id))
        }
    }
}
