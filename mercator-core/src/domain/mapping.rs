//! Domain mapping model

use super::common::{normalize_domain, LooseBool, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A custom domain bound to one tenant site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Mapping {
    pub id: i64,
    pub site_id: i64,
    pub domain: String,
    pub active: bool,
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            id: 0,
            site_id: 1,
            domain: String::new(),
            active: false,
        }
    }
}

/// Values for inserting a mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub site_id: i64,
    pub domain: String,
    pub active: bool,
}

/// Request body for creating or updating a mapping
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MappingInput {
    /// URL whose host becomes the mapped domain, e.g. `https://example.com`
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "https://example.com")]
    pub domain: Patch<String>,
    /// Permissive boolean: true, 1, "yes", "on" ...
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub active: Patch<LooseBool>,
    /// Site scope override
    #[serde(default)]
    pub blog: Option<i64>,
}

impl MappingInput {
    /// Normalize the supplied fields; fields that were not supplied stay `None`.
    pub fn prepare(&self) -> MappingPatch {
        MappingPatch {
            domain: self
                .domain
                .as_ref()
                .map(|raw| normalize_domain(raw))
                .into_option(),
            active: self.active.map(bool::from).into_option(),
        }
    }
}

/// Normalized changes extracted from a [`MappingInput`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MappingPatch {
    #[validate(length(
        min = 1,
        max = 255,
        message = "domain must be a URL with a host component"
    ))]
    pub domain: Option<String>,
    pub active: Option<bool>,
}

impl MappingPatch {
    pub fn is_empty(&self) -> bool {
        self.domain.is_none() && self.active.is_none()
    }
}

/// Public representation of a mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MappingResponse {
    pub id: i64,
    pub domain: String,
    pub active: bool,
    /// Echo of the site parameter, present only when the caller supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<i64>,
}

impl MappingResponse {
    pub fn new(mapping: Mapping, requested_site: Option<i64>) -> Self {
        Self {
            id: mapping.id,
            domain: mapping.domain,
            active: mapping.active,
            blog: requested_site,
        }
    }
}
