//! Output data model for both dictionaries.
//!
//! Every struct serializes to the camelCase JSON shape consumed by the lookup
//! application. Field declaration order is the key order in the output.
//!
//! Presence rules differ per field and are part of the output contract:
//! - plain `Vec` fields are always present, possibly as `[]`
//! - `Option<Vec<_>>` fields are omitted entirely when the source has none
//! - `Option<scalar>` fields are omitted when the attribute or child is absent

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JMdict
// ---------------------------------------------------------------------------

/// One `<entry>` of JMdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub sequence_number: u64,
    pub kanji: Vec<KanjiElement>,
    pub reading: Vec<ReadingElement>,
    pub sense: Vec<Sense>,
}

/// A kanji spelling (`<k_ele>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiElement {
    pub value: String,
    pub information: Vec<String>,
    pub priority: Vec<String>,
}

/// A kana reading (`<r_ele>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingElement {
    pub value: String,
    /// Set when the reading is not a true reading of the kanji (`<re_nokanji>`).
    pub no_kanji: bool,
    /// Kanji spellings this reading is restricted to. Empty means all.
    pub restriction: Vec<String>,
    pub information: Vec<String>,
    pub priority: Vec<String>,
}

/// A sense group. Only emitted when at least one English gloss survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub kanji: Vec<String>,
    pub reading: Vec<String>,
    pub reference: Vec<String>,
    pub antonym: Vec<String>,
    pub part_of_speech: Vec<String>,
    pub field: Vec<String>,
    pub misc: Vec<String>,
    pub source_language: Vec<SourceLanguage>,
    pub glossary: Vec<Gloss>,
    pub information: Vec<String>,
    pub dialect: Vec<String>,
}

/// Source language of a loanword (`<lsource>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLanguage {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub coverage: SourceCoverage,
    /// Constructed from source-language words rather than borrowed ("waseieigo").
    pub wasei: bool,
}

/// Whether the source word describes the loanword fully or only partially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCoverage {
    Full,
    Part,
}

/// An English gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub gloss_type: Option<String>,
    pub value: String,
}

// ---------------------------------------------------------------------------
// KANJIDIC2
// ---------------------------------------------------------------------------

/// One `<character>` of KANJIDIC2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntry {
    pub literal: String,
    pub codepoint: Vec<TypedValue>,
    pub radical: Vec<TypedValue>,
    pub misc: CharacterMisc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_number: Option<Vec<DictionaryReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_code: Option<Vec<QueryCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_meaning: Option<Vec<ReadingMeaningItem>>,
}

/// `{type, value}` pair used for codepoints, radicals and variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMisc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    /// The first count is the accepted one; later ones are common miscounts.
    pub stroke_count: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Vec<TypedValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radical_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jlpt: Option<u32>,
}

/// Index number in a published dictionary (`<dic_ref>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    /// Morohashi volume, only for `moro` references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_vol: Option<u32>,
    /// Morohashi page, only for `moro` references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_page: Option<u32>,
}

/// Lookup code (`<q_code>`), e.g. SKIP or four-corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCode {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_misclass: Option<String>,
}

/// An entry of the `readingMeaning` list.
///
/// Groups come first in source order, followed by every nanori reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingMeaningItem {
    Group(ReadingMeaningGroup),
    Nanori(NanoriReading),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingMeaningGroup {
    /// Only `ja_on` and `ja_kun` readings are kept.
    pub reading: Vec<CharacterReading>,
    pub meaning: Vec<CharacterMeaning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterReading {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMeaning {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A name-only reading (`<nanori>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NanoriReading {
    pub value: String,
}
