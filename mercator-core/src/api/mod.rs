//! REST API handlers and shared request/response types

pub mod health;
pub mod mapping;
pub mod metrics;
pub mod primary_domain;

use crate::domain::{coerce_bool, LooseBool, MappingInput, Patch, PromoteInput};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Route namespace for the domain mapping API
pub const API_NAMESPACE: &str = "/mercator/v1";

/// Query parameters accepted by every mapping and primary-domain route
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SiteQuery {
    /// Site to operate on
    pub blog: Option<String>,
    /// Alias for `blog`
    pub blog_id: Option<String>,
    /// `view` (default) or `edit`
    pub context: Option<String>,
    /// Mapping domain on create/update, used when the body omits it
    pub domain: Option<String>,
    /// Mapping flag on create/update, used when the body omits it
    pub active: Option<String>,
    /// Mapping id to promote, used when the body omits it
    pub mapping: Option<String>,
}

impl SiteQuery {
    /// Fill the fields the body did not supply from the query string.
    /// A request without a JSON body reads every field from the query.
    pub fn mapping_input(&self, body: Option<MappingInput>) -> MappingInput {
        let mut input = body.unwrap_or_default();
        if !input.domain.is_set() {
            input.domain = Patch::from(self.domain.clone());
        }
        if !input.active.is_set() {
            input.active = Patch::from(
                self.active
                    .as_deref()
                    .map(|raw| LooseBool(coerce_bool(raw))),
            );
        }
        input
    }

    pub fn promote_input(&self, body: Option<PromoteInput>) -> PromoteInput {
        let mut input = body.unwrap_or_default();
        if input.mapping.is_none() {
            input.mapping = self.mapping.clone().map(serde_json::Value::String);
        }
        input
    }
}

/// Response rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiContext {
    #[default]
    View,
    Edit,
}

impl ApiContext {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("view") => Ok(ApiContext::View),
            Some("edit") => Ok(ApiContext::Edit),
            Some(other) => Err(AppError::Validation(format!(
                "context must be one of: view, edit (got '{}')",
                other
            ))),
        }
    }
}

/// The site a request operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteScope {
    pub site_id: i64,
    /// Set only when the caller named the site explicitly
    pub requested: Option<i64>,
}

fn positive_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// Resolve the target site: body `blog`, then query `blog`, then query `blog_id`,
/// falling back to the caller's current site. Non-positive values count as absent.
pub(crate) fn resolve_site(
    auth: &AuthUser,
    body_blog: Option<i64>,
    query: &SiteQuery,
) -> Result<SiteScope> {
    ApiContext::parse(query.context.as_deref())?;

    let requested = body_blog
        .filter(|id| *id > 0)
        .or_else(|| positive_id(query.blog.as_deref()))
        .or_else(|| positive_id(query.blog_id.as_deref()));

    Ok(SiteScope {
        site_id: requested.unwrap_or(auth.current_site_id),
        requested,
    })
}

/// Result of a delete operation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}
