//! Index construction
//!
//! - `tokenize`: lower-cased alphanumeric tokens
//! - `stem`: the stemming capability and its memory/store memo layers
//! - `indexer`: per-page term counting and transactional commit

mod indexer;
mod stem;
mod tokenize;

pub use indexer::{IndexedPage, PageIndexer};
pub use stem::{SnowballStemmer, StemCache, StemError, StemIndex, Stemmer};
pub use tokenize::tokenize;
