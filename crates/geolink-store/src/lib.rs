//! Durable storage for the linkage pipeline.
//!
//! Everything lives under one work directory:
//!
//! - `clean/`: normalized archive rows and the deduplicated standard
//! - `partitions/`: one file per country with its flagged match rows
//! - `validated/`: the resolved output plus CSV exports
//!
//! Every write goes to a temporary file first and is renamed into place, so
//! a file either exists complete or not at all. The existence of a country's
//! partition file is what makes linkage resumable.

pub mod atomic;
pub mod error;
pub mod hash;
pub mod partition;
pub mod tables;
pub mod workdir;

pub use atomic::write_atomic;
pub use error::{Result, StoreError};
pub use partition::{KeyLayout, PartitionInfo, PartitionStore, StoredPartition};
pub use tables::{
    VALIDATED_CSV_COLUMNS, read_json, write_json, write_validated_csv, write_work_queue_csv,
};
pub use workdir::WorkDir;
