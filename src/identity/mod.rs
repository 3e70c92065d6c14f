//! Identity Store Module
//! Mission: Own user credentials and match presented ones

pub mod api;
pub mod client;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;
pub mod sqlite;

pub use client::{HttpIdentityClient, IdentityClient};
pub use memory::MemoryIdentityRepository;
pub use models::Identity;
pub use repository::{IdentityRepository, StorageError};
pub use service::IdentityService;
pub use sqlite::SqliteIdentityRepository;
