//! Business logic layer

pub mod mapping;
pub mod primary_domain;

pub use mapping::MappingService;
pub use primary_domain::PrimaryDomainService;
