pub mod barcode;
pub mod config;
pub mod error;
pub mod frame;
pub mod item;
pub mod record;
pub mod state;
