//! Kinship Storage Layer
//!
//! Implements the `FamilyRepository` trait over a JSON family file held in
//! memory.
//!
//! # Architecture
//!
//! - The whole file is read on [`InMemoryFamilyRepository::load`] and kept in
//!   maps keyed by id
//! - Edge changes returned by the relationship service are written back with
//!   [`InMemoryFamilyRepository::apply_changes`]
//! - [`InMemoryFamilyRepository::save`] writes the file back in the same format
//!
//! # Examples
//!
//! ```
//! use kinship_domain::FamilyRepository;
//! use kinship_store::InMemoryFamilyRepository;
//!
//! let json = r#"{
//!   "families": [{
//!     "id": "0192f3a0-0000-7000-8000-000000000001",
//!     "name": "Tran",
//!     "members": [
//!       { "id": "0192f3a0-0000-7000-8000-00000000000a", "name": "Binh", "gender": "Male" }
//!     ],
//!     "relationships": []
//!   }]
//! }"#;
//!
//! let repo = InMemoryFamilyRepository::from_json(json).unwrap();
//! let (family, _) = repo.family_by_name("Tran").unwrap();
//! assert_eq!(repo.members_of_family(family).unwrap().len(), 1);
//! ```

#![warn(missing_docs)]

mod format;
mod repository;

pub use format::{FamilyFile, FamilyRecord, MemberRecord, RelationshipRecord};
pub use repository::InMemoryFamilyRepository;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for the family format
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
