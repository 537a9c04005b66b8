//! Site registry repository

use crate::domain::Site;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteRepository: Send + Sync {
    async fn find_by_id(&self, blog_id: i64) -> Result<Option<Site>>;
}

pub struct SiteRepositoryImpl {
    pool: MySqlPool,
}

impl SiteRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteRepository for SiteRepositoryImpl {
    async fn find_by_id(&self, blog_id: i64) -> Result<Option<Site>> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            SELECT blog_id, domain, path, site_id, registered, last_updated,
                   public, archived, mature, spam, deleted, lang_id
            FROM sites
            WHERE blog_id = ?
            "#,
        )
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(site)
    }
}
