pub mod capture_worker;
pub mod scan_controller;
