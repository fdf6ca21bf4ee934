//! # pantry-api
//!
//! HTTP backend for the pantry REST API.
//!
//! Provides:
//! - `ReqwestTransport`: `PantryTransport` over a blocking reqwest client
//! - `remote_repository`: a `RemoteRepository` wired from a `PantryConfiguration`
//! - `item_repository`: the item store chosen by `PantryConfiguration::backend`
//!
//! ## Usage
//! ```ignore
//! use pantry_api::item_repository;
//! use pantry_core::{EventQueue, PantryConfiguration};
//!
//! let queue = EventQueue::new();
//! let mut repository = item_repository(&PantryConfiguration::default(), queue.sender())?;
//! repository.refresh()?;
//! ```

pub mod remote;
pub mod reqwest_transport;
pub mod store;

pub use remote::remote_repository;
pub use reqwest_transport::ReqwestTransport;
pub use store::item_repository;
