//! Core module - records, store, gateway and the console workflows

pub mod config;
pub mod console;
pub mod controller;
pub mod gateway;
pub mod presenter;
pub mod record;
pub mod resolver;
pub mod seed;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ConfigError};
pub use console::{Console, ConsoleError, DeleteTarget, Notification, Severity, UiState};
pub use controller::{Dialog, DialogMode, FormError, OpenDialog, SaveRequest};
pub use gateway::{ErrorKind, Gateway, GatewayError, HttpGateway, ServerStats};
pub use presenter::{render, Row, RowAction, TableView, NO_DATA};
pub use record::{Record, RecordId};
pub use resolver::Resolver;
pub use seed::{seed, DemoSet, SeedError, SeedReport};
pub use store::{RecordStore, Statistics, TypeStats};
