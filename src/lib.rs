//! EMS console: client for a telecom-operator element management backend
//!
//! Customers, sites, links and equipment are kept on a REST server; this
//! crate lists, creates, edits and deletes them and resolves the references
//! between them for display.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
