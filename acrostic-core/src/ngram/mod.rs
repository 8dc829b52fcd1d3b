//! Tokens and n-grams.
//!
//! - Token cleaning (`clean_token`, `tokenize`)
//! - The `NGram` value type, keyed by its initials
//! - Window extraction over a cleaned token sequence (`Extractor`)

/// Token cleaning and tag-aware first characters.
pub mod token;

/// N-gram construction and window extraction.
mod extract;

pub use extract::{Extractor, NGram, DEFAULT_MAX_LEN};
pub use token::{clean_token, first_char, tokenize};
