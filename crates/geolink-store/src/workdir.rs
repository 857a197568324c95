use std::path::PathBuf;

use crate::partition::PartitionStore;

/// File layout of the pipeline's work directory.
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn source_table(&self) -> PathBuf {
        self.root.join("clean").join("source.json")
    }

    pub fn reference_table(&self) -> PathBuf {
        self.root.join("clean").join("reference.json")
    }

    pub fn partitions(&self) -> PartitionStore {
        PartitionStore::new(self.root.join("partitions"))
    }

    pub fn validated_json(&self) -> PathBuf {
        self.root.join("validated").join("validated.json")
    }

    pub fn validated_csv(&self) -> PathBuf {
        self.root.join("validated").join("validated.csv")
    }

    pub fn work_queue_csv(&self) -> PathBuf {
        self.root.join("validated").join("work_queue.csv")
    }
}
