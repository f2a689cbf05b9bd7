pub mod collect;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod process;
pub mod record;
pub mod serve;
pub mod store;
