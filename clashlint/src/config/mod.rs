#[allow(clippy::module_inception)]
mod config;
mod coerce;
mod error;
mod file_path;
mod proxy_group;
mod rule;
mod rule_provider;

pub use config::*;
pub use error::*;
pub use file_path::*;
pub use proxy_group::*;
pub use rule::*;
pub use rule_provider::*;
