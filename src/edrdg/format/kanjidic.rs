//! # KANJIDIC2 character transcoding
//!
//! Maps one `<character>` subtree to a [`CharacterEntry`].
//!
//! Optional blocks are handled two different ways and both are part of the
//! output contract:
//! - `codepoint`, `radical`, `misc.strokeCount` are always present, possibly empty
//! - `misc.variant`, `misc.radicalName`, `dictionaryNumber`, `queryCode` and
//!   `readingMeaning` are omitted when the source has none

use crate::edrdg::format::document::Element;
use crate::edrdg::types::error::Result;
use crate::edrdg::types::models::{
    CharacterEntry, CharacterMeaning, CharacterMisc, CharacterReading, DictionaryReference,
    NanoriReading, QueryCode, ReadingMeaningGroup, ReadingMeaningItem, TypedValue,
};
use crate::edrdg::utils::{parse_integer, parse_optional_integer};

/// Reading types written in Japanese script. Every other type is dropped.
pub const NATIVE_READING_TYPES: [&str; 2] = ["ja_on", "ja_kun"];

/// Transcodes a single `<character>` element.
///
/// # Errors
/// Fails if `<literal>` or `<misc>` is missing, if a typed value lacks its
/// type attribute, or if a numeric field is not an integer.
pub fn transcode_character(character: &Element) -> Result<CharacterEntry> {
    let literal = character.required_text("literal")?;

    let codepoint = match character.child("codepoint") {
        Some(container) => typed_values(container, "cp_value", "cp_type")?,
        None => Vec::new(),
    };
    let radical = match character.child("radical") {
        Some(container) => typed_values(container, "rad_value", "rad_type")?,
        None => Vec::new(),
    };

    let misc = transcode_misc(character.required_child("misc")?)?;

    let dictionary_number = character
        .child("dic_number")
        .map(transcode_dictionary_numbers)
        .transpose()?;
    let query_code = character
        .child("query_code")
        .map(transcode_query_codes)
        .transpose()?;
    let reading_meaning = character
        .child("reading_meaning")
        .map(transcode_reading_meaning)
        .transpose()?;

    Ok(CharacterEntry {
        literal,
        codepoint,
        radical,
        misc,
        dictionary_number,
        query_code,
        reading_meaning,
    })
}

fn typed_values(
    container: &Element,
    tag: &'static str,
    type_attr: &'static str,
) -> Result<Vec<TypedValue>> {
    container
        .children_named(tag)
        .map(|child| typed_value(child, type_attr))
        .collect()
}

fn typed_value(element: &Element, type_attr: &'static str) -> Result<TypedValue> {
    Ok(TypedValue {
        kind: element.required_attr(type_attr)?.to_string(),
        value: element.text().to_string(),
    })
}

fn transcode_misc(misc: &Element) -> Result<CharacterMisc> {
    let grade = parse_optional_integer("grade", misc.child("grade").map(Element::text))?;

    let stroke_count = misc
        .children_named("stroke_count")
        .map(|count| parse_integer("stroke_count", count.text()))
        .collect::<Result<Vec<u32>>>()?;

    let variant = misc
        .children_named("variant")
        .map(|v| typed_value(v, "var_type"))
        .collect::<Result<Vec<_>>>()?;

    let freq = parse_optional_integer("freq", misc.child("freq").map(Element::text))?;

    let radical_name = misc.texts("rad_name");

    let jlpt = parse_optional_integer("jlpt", misc.child("jlpt").map(Element::text))?;

    Ok(CharacterMisc {
        grade,
        stroke_count,
        variant: non_empty(variant),
        freq,
        radical_name: non_empty(radical_name),
        jlpt,
    })
}

fn transcode_dictionary_numbers(dic_number: &Element) -> Result<Vec<DictionaryReference>> {
    dic_number
        .children()
        .iter()
        .map(|dic_ref| {
            Ok(DictionaryReference {
                kind: dic_ref.required_attr("dr_type")?.to_string(),
                value: dic_ref.text().to_string(),
                m_vol: parse_optional_integer("m_vol", dic_ref.attr("m_vol"))?,
                m_page: parse_optional_integer("m_page", dic_ref.attr("m_page"))?,
            })
        })
        .collect()
}

fn transcode_query_codes(query_code: &Element) -> Result<Vec<QueryCode>> {
    query_code
        .children()
        .iter()
        .map(|q_code| {
            Ok(QueryCode {
                kind: q_code.required_attr("qc_type")?.to_string(),
                value: q_code.text().to_string(),
                skip_misclass: q_code.attr("skip_misclass").map(str::to_string),
            })
        })
        .collect()
}

/// Groups in source order, then every nanori reading.
fn transcode_reading_meaning(reading_meaning: &Element) -> Result<Vec<ReadingMeaningItem>> {
    let mut items = reading_meaning
        .children_named("rmgroup")
        .map(|group| transcode_group(group).map(ReadingMeaningItem::Group))
        .collect::<Result<Vec<_>>>()?;

    items.extend(reading_meaning.children_named("nanori").map(|nanori| {
        ReadingMeaningItem::Nanori(NanoriReading {
            value: nanori.text().to_string(),
        })
    }));

    Ok(items)
}

fn transcode_group(rmgroup: &Element) -> Result<ReadingMeaningGroup> {
    let mut reading = Vec::new();
    for element in rmgroup.children_named("reading") {
        let kind = element.required_attr("r_type")?;
        if !NATIVE_READING_TYPES.contains(&kind) {
            continue;
        }
        reading.push(CharacterReading {
            kind: kind.to_string(),
            value: element.text().to_string(),
            on_type: element.attr("on_type").map(str::to_string),
            r_status: element.attr("r_status").map(str::to_string),
        });
    }

    let meaning = rmgroup
        .children_named("meaning")
        .map(|element| CharacterMeaning {
            value: element.text().to_string(),
            language: element.attr("m_lang").map(str::to_string),
        })
        .collect();

    Ok(ReadingMeaningGroup { reading, meaning })
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}
