//! Infrastructure adapters

pub mod persistence;

pub use persistence::InMemoryFormRepository;
