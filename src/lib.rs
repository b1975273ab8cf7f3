pub mod banner;
pub mod config;
pub mod consts;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod store;
