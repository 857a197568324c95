//! Library side of the `geolink` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod summary;
