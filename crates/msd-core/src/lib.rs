pub mod config;
pub mod logging;

pub mod assembly;
pub mod checksum;
pub mod cleanup;
pub mod control;
pub mod locator;
pub mod manifest;
pub mod path_safety;
pub mod pipeline;
pub mod units;
