//! Domain models for Mercator Core

pub mod common;
pub mod mapping;
pub mod site;

pub use common::*;
pub use mapping::*;
pub use site::*;
