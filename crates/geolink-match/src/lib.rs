#![deny(unsafe_code)]

pub mod dedupe;
pub mod error;
pub mod flag;
pub mod http;
pub mod lexical;
pub mod matcher;
pub mod normalize;
pub mod oracle;
pub mod utils;

pub use dedupe::{dedupe_reference, sort_reference_for_dedup};
pub use error::{MatchError, OracleError};
pub use flag::{flag_matches, needs_review};
pub use http::{HttpOracle, HttpOracleConfig};
pub use lexical::LexicalOracle;
pub use matcher::{CountryMatch, Matcher, countries_in, partition_by_country};
pub use normalize::{comparison_name, normalize_sources};
pub use oracle::{OracleCandidate, OracleContext, SimilarityOracle};
