//! Domain layer - core business logic and entities

pub mod history;
pub mod pricing;
