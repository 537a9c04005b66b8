//! Identity and membership lookups used by the site access policy

use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn is_network_super_admin(&self, user_id: i64) -> Result<bool>;
    /// Capabilities are granted per site
    async fn user_has_capability(&self, user_id: i64, site_id: i64, capability: &str)
        -> Result<bool>;
    async fn sites_of_user(&self, user_id: i64) -> Result<Vec<i64>>;
}

pub struct IdentityRepositoryImpl {
    pool: MySqlPool,
}

impl IdentityRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for IdentityRepositoryImpl {
    async fn is_network_super_admin(&self, user_id: i64) -> Result<bool> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM network_admins WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    async fn user_has_capability(
        &self,
        user_id: i64,
        site_id: i64,
        capability: &str,
    ) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM user_capabilities
            WHERE user_id = ? AND site_id = ? AND capability = ?
            "#,
        )
        .bind(user_id)
        .bind(site_id)
        .bind(capability)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0 > 0)
    }

    async fn sites_of_user(&self, user_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT site_id FROM site_members WHERE user_id = ? ORDER BY site_id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
