pub mod capture_session;
pub mod decoder;
pub mod feedback;
pub mod item_repository;
pub mod scan_delegate;
pub mod transport;
