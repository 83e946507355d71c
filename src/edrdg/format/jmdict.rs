//! # JMdict entry transcoding
//!
//! Maps one `<entry>` subtree to a [`WordEntry`].
//!
//! ```text
//! <entry>
//!   <ent_seq>        → sequenceNumber (integer, required)
//!   <k_ele>*         → kanji[]   {keb, ke_inf*, ke_pri*}
//!   <r_ele>+         → reading[] {reb, re_nokanji?, re_restr*, re_inf*, re_pri*}
//!   <sense>*         → sense[]   (only senses with an English gloss)
//! </entry>
//! ```

use log::trace;

use crate::edrdg::format::document::Element;
use crate::edrdg::types::error::Result;
use crate::edrdg::types::models::{
    Gloss, KanjiElement, ReadingElement, Sense, SourceCoverage, SourceLanguage, WordEntry,
};
use crate::edrdg::utils;

/// Language code of the glosses that are kept.
pub const ENGLISH: &str = "eng";

/// Transcodes a single `<entry>` element.
///
/// # Errors
/// Fails if `<ent_seq>` is missing or not an integer, or if a `<k_ele>` or
/// `<r_ele>` lacks its value child.
pub fn transcode_entry(entry: &Element) -> Result<WordEntry> {
    let ent_seq = entry.required_child("ent_seq")?;
    let sequence_number = utils::parse_integer("ent_seq", ent_seq.text())?;

    let kanji = entry
        .children_named("k_ele")
        .map(transcode_kanji)
        .collect::<Result<Vec<_>>>()?;

    let reading = entry
        .children_named("r_ele")
        .map(transcode_reading)
        .collect::<Result<Vec<_>>>()?;

    let total_senses = entry.children_named("sense").count();
    let sense = entry
        .children_named("sense")
        .map(transcode_sense)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    if sense.len() != total_senses {
        trace!(
            "Entry {}: dropped {} of {} senses without English glosses",
            sequence_number,
            total_senses - sense.len(),
            total_senses
        );
    }

    Ok(WordEntry {
        sequence_number,
        kanji,
        reading,
        sense,
    })
}

fn transcode_kanji(k_ele: &Element) -> Result<KanjiElement> {
    Ok(KanjiElement {
        value: k_ele.required_text("keb")?,
        information: k_ele.texts("ke_inf"),
        priority: k_ele.texts("ke_pri"),
    })
}

fn transcode_reading(r_ele: &Element) -> Result<ReadingElement> {
    Ok(ReadingElement {
        value: r_ele.required_text("reb")?,
        no_kanji: r_ele.has_child("re_nokanji"),
        restriction: r_ele.texts("re_restr"),
        information: r_ele.texts("re_inf"),
        priority: r_ele.texts("re_pri"),
    })
}

/// Returns `None` when no English gloss survives filtering.
fn transcode_sense(sense: &Element) -> Result<Option<Sense>> {
    let glossary: Vec<Gloss> = sense.children_named("gloss").filter_map(transcode_gloss).collect();
    if glossary.is_empty() {
        return Ok(None);
    }

    Ok(Some(Sense {
        kanji: sense.texts("stagk"),
        reading: sense.texts("stagr"),
        reference: sense.texts("xref"),
        antonym: sense.texts("ant"),
        part_of_speech: sense.texts("pos"),
        field: sense.texts("field"),
        misc: sense.texts("misc"),
        source_language: sense.children_named("lsource").map(transcode_source_language).collect(),
        glossary,
        information: sense.texts("s_inf"),
        dialect: sense.texts("dial"),
    }))
}

fn transcode_source_language(lsource: &Element) -> SourceLanguage {
    let value = Some(lsource.text()).filter(|text| !text.is_empty());
    SourceLanguage {
        // absent xml:lang means English per the JMdict DTD
        language: lsource.xml_lang().unwrap_or(ENGLISH).to_string(),
        value: value.map(str::to_string),
        coverage: if lsource.has_attr("ls_type") {
            SourceCoverage::Part
        } else {
            SourceCoverage::Full
        },
        wasei: lsource.has_attr("ls_wasei"),
    }
}

/// Returns `None` for glosses in any language other than English.
fn transcode_gloss(gloss: &Element) -> Option<Gloss> {
    if gloss.xml_lang().is_some_and(|lang| lang != ENGLISH) {
        return None;
    }
    Some(Gloss {
        gender: gloss.attr("g_gend").map(str::to_string),
        gloss_type: gloss.attr("g_type").map(str::to_string),
        value: gloss.text().to_string(),
    })
}
