//! Concrete implementations of the port traits.

pub mod csv_adapter;
pub mod ini_config_adapter;
