//! Data access layer (Repository pattern)

pub mod identity;
pub mod mapping;
pub mod site;

pub use identity::IdentityRepository;
pub use mapping::MappingRepository;
pub use site::SiteRepository;
