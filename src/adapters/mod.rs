//! External collaborators consumed by the core, each behind a narrow trait.

pub mod identity;
pub mod object_store;
