//! Domain mapping business logic

use crate::domain::{Mapping, MappingInput, NewMapping};
use crate::error::{AppError, Result};
use crate::repository::MappingRepository;
use metrics::counter;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct MappingService<R: MappingRepository> {
    repo: Arc<R>,
    /// When set, ids outside the scoped site are reported as not found
    strict_site_scope: bool,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Mapping {} not found", id))
}

impl<R: MappingRepository> MappingService<R> {
    pub fn new(repo: Arc<R>, strict_site_scope: bool) -> Self {
        Self {
            repo,
            strict_site_scope,
        }
    }

    pub async fn list(&self, site_id: i64) -> Result<Vec<Mapping>> {
        self.repo.list_by_site(site_id).await
    }

    pub async fn get(&self, site_id: i64, id: i64) -> Result<Mapping> {
        let mapping = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if self.strict_site_scope && mapping.site_id != site_id {
            return Err(not_found(id));
        }
        Ok(mapping)
    }

    pub async fn create(&self, site_id: i64, input: &MappingInput) -> Result<Mapping> {
        let patch = input.prepare();
        patch.validate()?;

        let domain = patch
            .domain
            .ok_or_else(|| AppError::Validation("domain is required".to_string()))?;

        let mapping = self
            .repo
            .create(&NewMapping {
                site_id,
                domain,
                active: patch.active.unwrap_or(false),
            })
            .await?;

        counter!("mercator_mappings_created_total").increment(1);
        info!(
            mapping_id = mapping.id,
            site_id,
            domain = %mapping.domain,
            "Created domain mapping"
        );
        Ok(mapping)
    }

    /// Apply only the supplied fields; omitted fields keep their value.
    pub async fn update(&self, site_id: i64, id: i64, input: &MappingInput) -> Result<Mapping> {
        let mapping = self.get(site_id, id).await?;
        let patch = input.prepare();
        patch.validate()?;

        if patch.is_empty() {
            return Ok(mapping);
        }

        if let Some(domain) = &patch.domain {
            self.repo.set_domain(mapping.id, domain).await?;
        }
        if let Some(active) = patch.active {
            self.repo.set_active(mapping.id, active).await?;
        }

        info!(mapping_id = mapping.id, site_id, "Updated domain mapping");
        self.repo
            .find_by_id(mapping.id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, site_id: i64, id: i64) -> Result<bool> {
        let mapping = self.get(site_id, id).await?;
        let deleted = self.repo.delete(mapping.id).await?;

        if deleted {
            counter!("mercator_mappings_deleted_total").increment(1);
            info!(
                mapping_id = mapping.id,
                site_id,
                domain = %mapping.domain,
                "Deleted domain mapping"
            );
        }
        Ok(deleted)
    }
}
