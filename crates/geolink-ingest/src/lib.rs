//! Table loading for the linkage pipeline.
//!
//! Every loader checks its required columns before reading a single row, so a
//! malformed input fails the run up front instead of producing partial data.

pub mod archive;
pub mod csv_table;
pub mod error;
pub mod overrides;
pub mod reference;

pub use archive::{ARCHIVE_COLUMNS, ArchiveLoad, load_archive};
pub use csv_table::{CsvTable, read_csv_table};
pub use error::{IngestError, Result};
pub use overrides::{OVERRIDE_COLUMNS, load_override_entries, load_override_table};
pub use reference::{DEFAULT_REFERENCE_ENCODING, REFERENCE_COLUMNS, load_reference};
