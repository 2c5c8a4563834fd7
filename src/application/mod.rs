//! Application layer - the end-to-end run

mod runner;

pub use runner::{resolve_catalog, run};
