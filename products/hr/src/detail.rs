//! Single-employee lookups backing the detail page.

use crate::{
    enrichment::{EnrichmentStrategy, RatingRange},
    error::{HrError, HrResult},
    model::{Department, Employee, EmployeeId},
    source::EmployeeSource,
};

/// Fetches one employee directly from the directory.
///
/// The upstream company department is kept when it names a known department;
/// otherwise the strategy picks one. Ratings are drawn from
/// [`RatingRange::DETAIL`], which is narrower than the roster range.
pub async fn lookup_employee<S: EmployeeSource>(
    source: &S,
    enrichment: &dyn EnrichmentStrategy,
    id: EmployeeId,
) -> HrResult<Employee> {
    let user = source.get_user(id).await?.ok_or(HrError::NotFound(id))?;
    let mut enriched = enrichment.enrich(&user, RatingRange::DETAIL);
    if let Some(department) = user
        .upstream_department()
        .and_then(|name| name.parse::<Department>().ok())
    {
        enriched.department = department;
    }
    Ok(user.into_employee(enriched))
}

/// Ids of the first `limit` directory records. Callers enumerating the whole
/// directory pass [`ID_LISTING_LIMIT`](crate::source::ID_LISTING_LIMIT).
pub async fn list_employee_ids<S: EmployeeSource>(
    source: &S,
    limit: usize,
) -> HrResult<Vec<EmployeeId>> {
    let users = source.list_users(limit).await?;
    Ok(users.into_iter().map(|user| user.id).collect())
}
