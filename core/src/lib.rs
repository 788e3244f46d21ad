//! libhanyu-core
//!
//! Storage tables, n-gram stores and the sentence decoder shared by the
//! libhanyu input method crates. The language crate (`libhanyu`) layers
//! the keystroke parsers and the per-session `Context`/`Instance` API on
//! top of these types.
//!
//! Public API:
//! - `MemoryChunk` - sectioned binary files with atomic save
//! - `SyllableKey` / `SyllableKeyRest` - parsed Mandarin syllables
//! - `PhraseIndex` - partitioned phrase store with user delta logs
//! - `ChewingTable` / `PhraseTable` - syllable and phrase key indexes
//! - `SingleGram` / `Bigram` - successor-frequency stores
//! - `SentenceLookup` / `PhraseLookup` - Viterbi decoders
//! - `Options` - tone, fuzzy and ranking switches

use serde::{Deserialize, Serialize};

pub mod bigram;
pub mod chewing_table;
pub mod chunk;
pub mod errors;
pub mod lookup;
pub mod phrase;
pub mod phrase_index;
pub mod phrase_lookup;
pub mod phrase_table;
pub mod single_gram;
pub mod syllable;

pub use bigram::Bigram;
pub use chewing_table::{
    ChewingTable, ChewingTableBuilder, TokenRanges, SEARCH_CONTINUED, SEARCH_OK,
};
pub use chunk::MemoryChunk;
pub use errors::{HanyuError, Result};
pub use lookup::{train_result, Constraint, SentenceLookup};
pub use phrase::{
    make_token, token_local_id, token_sub_index, PhraseItem, PhraseToken, Pronunciation,
    MAX_PHRASE_LENGTH, NULL_TOKEN, SENTENCE_START,
};
pub use phrase_index::{DeltaRecord, PhraseIndex, SubPhraseIndex};
pub use phrase_lookup::PhraseLookup;
pub use phrase_table::{PhraseTable, PhraseTableBuilder};
pub use single_gram::{merge_single_gram, SingleGram};
pub use syllable::{SyllableKey, SyllableKeyRest};

/// On-disk format tag. Written NUL-terminated to the `version` sentinel in
/// the user directory and hashed into every chunk header. A mismatch on
/// either path means the user files predate the current layout and are
/// wiped.
pub const FORMAT_VERSION: &str = "0.6.92";

/// Mixing weight between the bigram and unigram terms of the blended
/// transition probability.
pub const LAMBDA_PARAMETER: f64 = 0.35;

/// Decoder switches.
///
/// Language-specific keyboard layouts (double pinyin schemes, chewing
/// layouts) are not options; they are plain data fields on their parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Compare syllable tones during table lookup. A toneless input key
    /// still matches any stored tone.
    pub use_tone: bool,

    /// Rank candidates with the blended bigram/unigram score instead of
    /// raw unigram frequency.
    pub dynamic_adjust: bool,

    /// Fuzzy equivalence rules as textual pairs (e.g. "zh=z", "an=ang").
    /// Empty disables fuzzy matching.
    pub fuzzy: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_tone: true,
            dynamic_adjust: false,
            fuzzy: vec![],
        }
    }
}

impl Options {
    /// Load options from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HanyuError::corrupt("options", e))
    }

    /// Save options to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HanyuError::corrupt("options", e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// The conventional fuzzy pairs for Mandarin: retroflex/dental initials,
/// n/l and f/h confusion, and the front/back nasal finals.
pub fn standard_fuzzy_rules() -> Vec<String> {
    [
        "zh=z", "ch=c", "sh=s", "n=l", "f=h", "an=ang", "en=eng", "in=ing",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
