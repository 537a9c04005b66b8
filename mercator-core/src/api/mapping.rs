//! Domain mapping API handlers

use crate::api::{resolve_site, DeleteResponse, SiteQuery};
use crate::domain::{MappingInput, MappingResponse};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::check_site_access;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/mercator/v1/mappings",
    tag = "Mappings",
    params(SiteQuery),
    responses(
        (status = 200, description = "Mappings of the site", body = Vec<MappingResponse>),
        (status = 403, description = "Not allowed to manage the site")
    )
)]
/// List the mappings of a site
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<SiteQuery>,
) -> Result<impl IntoResponse> {
    let scope = resolve_site(&auth, None, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let mappings = state.mapping_service().list(scope.site_id).await?;
    let body: Vec<MappingResponse> = mappings
        .into_iter()
        .map(|m| MappingResponse::new(m, scope.requested))
        .collect();

    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/mercator/v1/mappings/{id}",
    tag = "Mappings",
    params(("id" = i64, Path, description = "Mapping ID"), SiteQuery),
    responses(
        (status = 200, description = "The mapping", body = MappingResponse),
        (status = 404, description = "Mapping not found")
    )
)]
/// Get a mapping by id
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SiteQuery>,
) -> Result<impl IntoResponse> {
    let scope = resolve_site(&auth, None, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let mapping = state.mapping_service().get(scope.site_id, id).await?;
    Ok(Json(MappingResponse::new(mapping, scope.requested)))
}

#[utoipa::path(
    post,
    path = "/mercator/v1/mappings",
    tag = "Mappings",
    params(SiteQuery),
    request_body = MappingInput,
    responses(
        (status = 201, description = "Mapping created", body = MappingResponse),
        (status = 400, description = "Invalid domain"),
        (status = 409, description = "Domain already mapped")
    )
)]
/// Create a mapping on the scoped site
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<SiteQuery>,
    body: Option<Json<MappingInput>>,
) -> Result<impl IntoResponse> {
    let input = query.mapping_input(body.map(|Json(b)| b));
    let scope = resolve_site(&auth, input.blog, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let mapping = state
        .mapping_service()
        .create(scope.site_id, &input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MappingResponse::new(mapping, scope.requested)),
    ))
}

#[utoipa::path(
    put,
    path = "/mercator/v1/mappings/{id}",
    tag = "Mappings",
    params(("id" = i64, Path, description = "Mapping ID"), SiteQuery),
    request_body = MappingInput,
    responses(
        (status = 200, description = "Mapping updated", body = MappingResponse),
        (status = 400, description = "Invalid domain"),
        (status = 404, description = "Mapping not found")
    )
)]
/// Update the supplied fields of a mapping
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SiteQuery>,
    body: Option<Json<MappingInput>>,
) -> Result<impl IntoResponse> {
    let input = query.mapping_input(body.map(|Json(b)| b));
    let scope = resolve_site(&auth, input.blog, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let mapping = state
        .mapping_service()
        .update(scope.site_id, id, &input)
        .await?;

    Ok(Json(MappingResponse::new(mapping, scope.requested)))
}

#[utoipa::path(
    delete,
    path = "/mercator/v1/mappings/{id}",
    tag = "Mappings",
    params(("id" = i64, Path, description = "Mapping ID"), SiteQuery),
    responses(
        (status = 200, description = "Deletion result", body = DeleteResponse),
        (status = 404, description = "Mapping not found")
    )
)]
/// Delete a mapping
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SiteQuery>,
) -> Result<impl IntoResponse> {
    let scope = resolve_site(&auth, None, &query)?;
    check_site_access(&state, &auth, scope.site_id).await?;

    let deleted = state.mapping_service().delete(scope.site_id, id).await?;
    Ok(Json(DeleteResponse { deleted }))
}
