pub mod error;
pub mod labels;
pub mod matching;
pub mod overrides;
pub mod reference;
pub mod source;
pub mod validated;

pub use error::{ModelError, Result};
pub use labels::OverrideLabel;
pub use matching::{MatchRecord, REVIEW_PROBABILITY_THRESHOLD};
pub use overrides::{OverrideEntry, OverrideKey, OverrideTable};
pub use reference::{ENGLISH_LANGUAGE_CODE, ReferenceRecord, SubdivisionTarget};
pub use source::{MIN_ELECTION_YEAR, NO_SUBDIVISION_SENTINEL, SourceRecord};
pub use validated::ValidatedRecord;
