//! Domain vocabulary shared by the archive crates.
//!
//! Zero internal dependencies: the repository layer, the HTTP layer and the
//! admin tooling all build on these types.

pub mod attachments;
pub mod catalog;
pub mod error;
pub mod roles;
pub mod search;
pub mod types;
