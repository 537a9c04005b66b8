//! Primary domain business logic

use crate::domain::{Site, INVALID_MAPPING_MESSAGE};
use crate::error::{AppError, Result};
use crate::repository::{MappingRepository, SiteRepository};
use metrics::counter;
use std::sync::Arc;
use tracing::info;

pub struct PrimaryDomainService<R: MappingRepository, SR: SiteRepository> {
    mapping_repo: Arc<R>,
    site_repo: Arc<SR>,
    strict_site_scope: bool,
}

impl<R: MappingRepository, SR: SiteRepository> PrimaryDomainService<R, SR> {
    pub fn new(mapping_repo: Arc<R>, site_repo: Arc<SR>, strict_site_scope: bool) -> Self {
        Self {
            mapping_repo,
            site_repo,
            strict_site_scope,
        }
    }

    pub async fn get(&self, site_id: i64) -> Result<Site> {
        self.site_repo
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Site {} not found", site_id)))
    }

    /// Make the mapping's domain its site's canonical domain and return the
    /// refreshed record of the scoped site.
    pub async fn promote(&self, site_id: i64, mapping_id: Option<i64>) -> Result<Site> {
        let invalid = || AppError::Validation(INVALID_MAPPING_MESSAGE.to_string());

        let mapping_id = mapping_id.ok_or_else(invalid)?;
        let mapping = self
            .mapping_repo
            .find_by_id(mapping_id)
            .await?
            .ok_or_else(invalid)?;

        if self.strict_site_scope && mapping.site_id != site_id {
            return Err(invalid());
        }

        self.mapping_repo.make_primary(&mapping).await?;

        counter!("mercator_primary_domain_promotions_total").increment(1);
        info!(
            mapping_id = mapping.id,
            site_id = mapping.site_id,
            domain = %mapping.domain,
            "Promoted mapping to primary domain"
        );

        self.get(site_id).await
    }
}
