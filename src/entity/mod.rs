//! SeaORM entities

pub mod app_version;
