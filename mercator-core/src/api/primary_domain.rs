//! Primary domain API handlers

use crate::api::{resolve_site, SiteQuery};
use crate::domain::{PromoteInput, Site};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::check_site_access;
use crate::state::HasServices;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/mercator/v1/primary",
    tag = "Primary Domain",
    params(SiteQuery),
    responses(
        (status = 200, description = "The site record", body = Site),
        (status = 404, description = "Site not found")
    )
)]
/// Get the site record carrying the primary domain
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<SiteQuery>,
) -> Result<impl IntoResponse> {
    let scope = resolve_site(&auth, None, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let site = state.primary_domain_service().get(scope.site_id).await?;
    Ok(Json(site))
}

#[utoipa::path(
    post,
    path = "/mercator/v1/primary",
    tag = "Primary Domain",
    params(SiteQuery),
    request_body = PromoteInput,
    responses(
        (status = 200, description = "Updated site record", body = Site),
        (status = 400, description = "Missing or invalid mapping id"),
        (status = 502, description = "Promotion failed in the store")
    )
)]
/// Promote a mapping's domain to the site's primary domain
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<SiteQuery>,
    body: Option<Json<PromoteInput>>,
) -> Result<impl IntoResponse> {
    let input = query.promote_input(body.map(|Json(b)| b));
    let scope = resolve_site(&auth, input.blog, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let site = state
        .primary_domain_service()
        .promote(scope.site_id, input.mapping_id())
        .await?;

    Ok(Json(site))
}
