pub mod error;
pub mod local_client;
pub mod merge;
pub mod repo;
pub mod service;
