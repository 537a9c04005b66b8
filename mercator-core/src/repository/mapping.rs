//! Domain mapping repository

use crate::domain::{Mapping, NewMapping};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Mapping>>;
    async fn list_by_site(&self, site_id: i64) -> Result<Vec<Mapping>>;
    async fn create(&self, input: &NewMapping) -> Result<Mapping>;
    async fn set_domain(&self, id: i64, domain: &str) -> Result<()>;
    async fn set_active(&self, id: i64, active: bool) -> Result<()>;
    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
    /// Swap the mapping's domain with its site's canonical domain
    async fn make_primary(&self, mapping: &Mapping) -> Result<()>;
}

pub struct MappingRepositoryImpl {
    pool: MySqlPool,
}

impl MappingRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Client-facing error for a constraint violation on `domain_mappings`.
/// Domain uniqueness is the `domain` unique key; `site_id` references `sites`.
fn constraint_error(kind: ErrorKind, site_id: Option<i64>, domain: &str) -> Option<AppError> {
    match kind {
        ErrorKind::UniqueViolation => Some(AppError::Conflict(format!(
            "Domain '{}' is already mapped",
            domain
        ))),
        ErrorKind::ForeignKeyViolation => {
            site_id.map(|id| AppError::NotFound(format!("Site {} not found", id)))
        }
        _ => None,
    }
}

fn map_write_error(err: sqlx::Error, site_id: Option<i64>, domain: &str) -> AppError {
    let kind = match &err {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    };
    kind.and_then(|kind| constraint_error(kind, site_id, domain))
        .unwrap_or_else(|| AppError::Database(err))
}

#[async_trait]
impl MappingRepository for MappingRepositoryImpl {
    async fn find_by_id(&self, id: i64) -> Result<Option<Mapping>> {
        let mapping = sqlx::query_as::<_, Mapping>(
            r#"
            SELECT id, site_id, domain, active
            FROM domain_mappings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mapping)
    }

    async fn list_by_site(&self, site_id: i64) -> Result<Vec<Mapping>> {
        let mappings = sqlx::query_as::<_, Mapping>(
            r#"
            SELECT id, site_id, domain, active
            FROM domain_mappings
            WHERE site_id = ?
            ORDER BY id
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mappings)
    }

    async fn create(&self, input: &NewMapping) -> Result<Mapping> {
        let result = sqlx::query(
            r#"
            INSERT INTO domain_mappings (site_id, domain, active, created_at)
            VALUES (?, ?, ?, NOW())
            "#,
        )
        .bind(input.site_id)
        .bind(&input.domain)
        .bind(input.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(input.site_id), &input.domain))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create mapping")))
    }

    async fn set_domain(&self, id: i64, domain: &str) -> Result<()> {
        sqlx::query("UPDATE domain_mappings SET domain = ? WHERE id = ?")
            .bind(domain)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, None, domain))?;
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        sqlx::query("UPDATE domain_mappings SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM domain_mappings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn make_primary(&self, mapping: &Mapping) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Re-read under lock; the caller's copy may be stale
        let current: Option<(i64, String)> = sqlx::query_as(
            "SELECT site_id, domain FROM domain_mappings WHERE id = ? FOR UPDATE",
        )
        .bind(mapping.id)
        .fetch_optional(&mut *tx)
        .await?;
        let (site_id, mapped_domain) = current
            .ok_or_else(|| AppError::Upstream(format!("Mapping {} no longer exists", mapping.id)))?;

        let site: Option<(String,)> =
            sqlx::query_as("SELECT domain FROM sites WHERE blog_id = ? FOR UPDATE")
                .bind(site_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (previous_domain,) =
            site.ok_or_else(|| AppError::Upstream(format!("Site {} does not exist", site_id)))?;

        if previous_domain == mapped_domain {
            tx.commit().await?;
            return Ok(());
        }

        sqlx::query("UPDATE sites SET domain = ?, last_updated = NOW() WHERE blog_id = ?")
            .bind(&mapped_domain)
            .bind(site_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE domain_mappings SET domain = ? WHERE id = ?")
            .bind(&previous_domain)
            .bind(mapping.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, None, &previous_domain))?;

        tx.commit().await?;
        Ok(())
    }
}
