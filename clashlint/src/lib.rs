pub mod config;
pub mod external;
pub mod fix;
pub mod validate;
