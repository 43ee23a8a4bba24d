use serde::{Deserialize, Serialize};

// RESPONSE SCHEMAS ===========================================================
/// One row of a `/words` response.
///
/// Only `word` is always present; the score appears on ranked queries and the
/// remaining fields only when the matching metadata flags were requested.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub score: Option<u64>,
    #[serde(rename = "numSyllables")]
    pub num_syllables: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub defs: Option<Vec<String>>,
    #[serde(rename = "defHeadword")]
    pub def_headword: Option<String>,
}
