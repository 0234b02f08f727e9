//! Library side of the `mis` binary: config, logging, shared pipeline
//! stages and terminal formatting.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod summary;
