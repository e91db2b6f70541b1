//! Startup pipeline for the koord client and server.

pub mod actor;
pub mod args;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod launch;
pub mod logging;
pub mod rpc;
pub mod shutdown;
pub mod usage;
