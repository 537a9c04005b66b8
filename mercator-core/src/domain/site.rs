//! Tenant site model and primary-domain input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Message returned when a promotion does not name a usable mapping
pub const INVALID_MAPPING_MESSAGE: &str =
    "You must supply a valid mapping ID to set as the primary domain via the `mapping` parameter.";

/// Public record of a tenant site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Site {
    /// Site identifier
    pub blog_id: i64,
    /// Canonical (primary) domain
    pub domain: String,
    /// Path on a subfolder install
    pub path: String,
    /// Network the site belongs to
    pub site_id: i64,
    pub registered: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub public: bool,
    pub archived: bool,
    pub mature: bool,
    pub spam: bool,
    pub deleted: bool,
    pub lang_id: i32,
}

impl Default for Site {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            blog_id: 1,
            domain: String::new(),
            path: "/".to_string(),
            site_id: 1,
            registered: now,
            last_updated: now,
            public: true,
            archived: false,
            mature: false,
            spam: false,
            deleted: false,
            lang_id: 0,
        }
    }
}

/// Request body for promoting a mapping to primary domain
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PromoteInput {
    /// Mapping id, as a number or numeric string
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 12)]
    pub mapping: Option<serde_json::Value>,
    /// Site scope override
    #[serde(default)]
    pub blog: Option<i64>,
}

impl PromoteInput {
    /// The mapping id, if one was supplied and is a positive integer
    pub fn mapping_id(&self) -> Option<i64> {
        let id = match self.mapping.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64()?,
            serde_json::Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        (id > 0).then_some(id)
    }
}
