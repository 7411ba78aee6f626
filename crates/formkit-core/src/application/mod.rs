//! Application services

pub mod history;

pub use history::{HistoryState, LoadStatus, VersionHistoryManager};
