//! API integration tests infrastructure
//!
//! In-memory repositories and token helpers for driving the handlers without
//! a database.


use async_trait::async_trait;
use chrono::Utc;
use mercator_core::config::JwtConfig;
use mercator_core::domain::{Mapping, NewMapping, Site};
use mercator_core::error::{AppError, Result};
use mercator_core::jwt::JwtManager;
use mercator_core::repository::{IdentityRepository, MappingRepository, SiteRepository};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Fixtures
// ============================================================================

/// Network super-admin recorded in `network_admins`
pub const ADMIN_USER: i64 = 1;
/// Editor of site 5 with `manage_options`
pub const EDITOR_5: i64 = 10;
/// Editor of site 6 with `manage_options`
pub const EDITOR_6: i64 = 11;
/// Member of site 5 without `manage_options`
pub const SUBSCRIBER_5: i64 = 12;
/// Email listed in `super_admin_emails`
pub const ROOT_EMAIL: &str = "root@mercator.test";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://mercator.test".to_string(),
        audience: "mercator".to_string(),
        access_token_ttl_secs: 3600,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config())
}

pub fn token_for(user_id: i64, email: &str, site_id: Option<i64>) -> String {
    create_test_jwt_manager()
        .create_access_token(user_id, email, site_id)
        .expect("Failed to create test token")
}

pub fn editor_token(user_id: i64, site_id: i64) -> String {
    token_for(user_id, &format!("editor{}@example.com", user_id), Some(site_id))
}

pub fn create_test_site(blog_id: i64, domain: &str) -> Site {
    Site {
        blog_id,
        domain: domain.to_string(),
        path: "/".to_string(),
        site_id: 1,
        registered: Utc::now(),
        last_updated: Utc::now(),
        public: true,
        ..Default::default()
    }
}

// ============================================================================
// Test Repositories
// ============================================================================

#[derive(Default)]
pub struct TestSiteRepository {
    pub(crate) sites: RwLock<Vec<Site>>,
}

impl TestSiteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_site(&self, site: Site) {
        self.sites.write().await.push(site);
    }
}

#[async_trait]
impl SiteRepository for TestSiteRepository {
    async fn find_by_id(&self, blog_id: i64) -> Result<Option<Site>> {
        let sites = self.sites.read().await;
        Ok(sites.iter().find(|s| s.blog_id == blog_id).cloned())
    }
}

/// Mappings share the site table so promotion can swap domains
pub struct TestMappingRepository {
    mappings: RwLock<Vec<Mapping>>,
    next_id: RwLock<i64>,
    sites: Arc<TestSiteRepository>,
}

impl TestMappingRepository {
    pub fn new(sites: Arc<TestSiteRepository>) -> Self {
        Self {
            mappings: RwLock::new(vec![]),
            next_id: RwLock::new(1),
            sites,
        }
    }

    /// Seed a mapping directly; unlike `create` the site does not have to exist
    pub async fn add_mapping(&self, site_id: i64, domain: &str, active: bool) -> Mapping {
        self.insert(&NewMapping {
            site_id,
            domain: domain.to_string(),
            active,
        })
        .await
        .expect("Failed to add test mapping")
    }

    async fn insert(&self, input: &NewMapping) -> Result<Mapping> {
        let mut mappings = self.mappings.write().await;
        if mappings.iter().any(|m| m.domain == input.domain) {
            return Err(AppError::Conflict(format!(
                "Domain '{}' is already mapped",
                input.domain
            )));
        }

        let mut next_id = self.next_id.write().await;
        let mapping = Mapping {
            id: *next_id,
            site_id: input.site_id,
            domain: input.domain.clone(),
            active: input.active,
        };
        *next_id += 1;
        mappings.push(mapping.clone());
        Ok(mapping)
    }

    pub async fn all(&self) -> Vec<Mapping> {
        self.mappings.read().await.clone()
    }
}

#[async_trait]
impl MappingRepository for TestMappingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Mapping>> {
        let mappings = self.mappings.read().await;
        Ok(mappings.iter().find(|m| m.id == id).cloned())
    }

    async fn list_by_site(&self, site_id: i64) -> Result<Vec<Mapping>> {
        let mappings = self.mappings.read().await;
        Ok(mappings
            .iter()
            .filter(|m| m.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewMapping) -> Result<Mapping> {
        // Mirrors the `sites` foreign key
        if self.sites.find_by_id(input.site_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Site {} not found",
                input.site_id
            )));
        }
        self.insert(input).await
    }

    async fn set_domain(&self, id: i64, domain: &str) -> Result<()> {
        let mut mappings = self.mappings.write().await;
        if mappings.iter().any(|m| m.id != id && m.domain == domain) {
            return Err(AppError::Conflict(format!(
                "Domain '{}' is already mapped",
                domain
            )));
        }
        if let Some(m) = mappings.iter_mut().find(|m| m.id == id) {
            m.domain = domain.to_string();
        }
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let mut mappings = self.mappings.write().await;
        if let Some(m) = mappings.iter_mut().find(|m| m.id == id) {
            m.active = active;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut mappings = self.mappings.write().await;
        let before = mappings.len();
        mappings.retain(|m| m.id != id);
        Ok(mappings.len() < before)
    }

    async fn make_primary(&self, mapping: &Mapping) -> Result<()> {
        let mut sites = self.sites.sites.write().await;
        let site = sites
            .iter_mut()
            .find(|s| s.blog_id == mapping.site_id)
            .ok_or_else(|| AppError::Upstream(format!("Site {} does not exist", mapping.site_id)))?;

        let mut mappings = self.mappings.write().await;
        let stored = mappings
            .iter_mut()
            .find(|m| m.id == mapping.id)
            .ok_or_else(|| AppError::Upstream(format!("Mapping {} no longer exists", mapping.id)))?;

        let previous = std::mem::replace(&mut site.domain, stored.domain.clone());
        site.last_updated = Utc::now();
        stored.domain = previous;
        Ok(())
    }
}

#[derive(Default)]
pub struct TestIdentityRepository {
    super_admins: RwLock<Vec<i64>>,
    capabilities: RwLock<Vec<(i64, i64, String)>>,
    members: RwLock<Vec<(i64, i64)>>,
}

impl TestIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_super_admin(&self, user_id: i64) {
        self.super_admins.write().await.push(user_id);
    }

    pub async fn grant(&self, user_id: i64, site_id: i64, capability: &str) {
        self.capabilities
            .write()
            .await
            .push((user_id, site_id, capability.to_string()));
    }

    pub async fn add_member(&self, user_id: i64, site_id: i64) {
        self.members.write().await.push((user_id, site_id));
    }
}

#[async_trait]
impl IdentityRepository for TestIdentityRepository {
    async fn is_network_super_admin(&self, user_id: i64) -> Result<bool> {
        Ok(self.super_admins.read().await.contains(&user_id))
    }

    async fn user_has_capability(
        &self,
        user_id: i64,
        site_id: i64,
        capability: &str,
    ) -> Result<bool> {
        let capabilities = self.capabilities.read().await;
        Ok(capabilities
            .iter()
            .any(|(u, s, c)| *u == user_id && *s == site_id && c == capability))
    }

    async fn sites_of_user(&self, user_id: i64) -> Result<Vec<i64>> {
        let members = self.members.read().await;
        Ok(members
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, s)| *s)
            .collect())
    }
}
