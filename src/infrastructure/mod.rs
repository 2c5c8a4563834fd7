//! Infrastructure layer - page fetching, persistence, catalog input

pub mod catalog;
pub mod render;
pub mod storage;
