//! Entity type declarations
//!
//! Each module declares one [`EntitySchema`](crate::schema::EntitySchema).
//! Nothing else in the crate is specific to an entity type.

pub mod customer;
pub mod equipment;
pub mod link;
pub mod site;
