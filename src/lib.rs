pub mod document;
pub mod engine;
pub mod error;
pub mod policy;
pub mod service;
pub mod utils;
