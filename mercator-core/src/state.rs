//! Application state trait for dependency injection
//!
//! Handlers are generic over [`HasServices`] so the same router serves the
//! production `AppState` and in-memory test states.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{IdentityRepository, MappingRepository, SiteRepository};
use crate::service::{MappingService, PrimaryDomainService};

pub trait HasServices: Clone + Send + Sync + 'static {
    type MappingRepo: MappingRepository;
    type SiteRepo: SiteRepository;
    type IdentityRepo: IdentityRepository;

    fn config(&self) -> &Config;

    fn mapping_service(&self) -> &MappingService<Self::MappingRepo>;

    fn primary_domain_service(&self) -> &PrimaryDomainService<Self::MappingRepo, Self::SiteRepo>;

    /// Lookups backing the site access policy
    fn identity_repo(&self) -> &Self::IdentityRepo;

    fn jwt_manager(&self) -> &JwtManager;

    /// Whether the backing store is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
