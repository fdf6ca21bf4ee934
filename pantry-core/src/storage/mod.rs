pub mod blob_store;
pub mod local_repository;
