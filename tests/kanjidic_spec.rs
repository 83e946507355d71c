use edrdg_json::edrdg::format::document::Document;
use edrdg_json::edrdg::format::kanjidic::transcode_character;
use edrdg_json::{
    CharacterEntry, DictionaryTranscoder, EntityMode, Kanjidic2, ReadingMeaningItem,
    TranscodeConfig, TranscodeError,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    for part in parts {
        p.push(part);
    }
    p
}

fn transcode_sample() -> Vec<CharacterEntry> {
    let path = fixture_path(&["tests", "fixtures", "kanjidic2_sample.xml"]);
    DictionaryTranscoder::<Kanjidic2>::new(TranscodeConfig::default())
        .transcode_file(&path)
        .expect("transcode KANJIDIC2 sample")
}

fn character_json(literal: &str) -> Value {
    let entry = transcode_sample()
        .into_iter()
        .find(|c| c.literal == literal)
        .unwrap_or_else(|| panic!("character {} missing from sample", literal));
    serde_json::to_value(&entry).expect("serialize character")
}

#[test]
fn header_is_not_a_record() {
    let literals: Vec<String> = transcode_sample().into_iter().map(|c| c.literal).collect();
    assert_eq!(literals, vec!["水", "亜", "々"]);
}

#[test]
fn fully_populated_character() {
    assert_eq!(
        character_json("水"),
        json!({
            "literal": "水",
            "codepoint": [
                {"type": "ucs", "value": "6c34"},
                {"type": "jis208", "value": "1-31-69"}
            ],
            "radical": [{"type": "classical", "value": "85"}],
            "misc": {"grade": 8, "strokeCount": [4], "freq": 223, "jlpt": 4},
            "dictionaryNumber": [
                {"type": "nelson_c", "value": "2527"},
                {"type": "moro", "value": "17089", "mVol": 6, "mPage": 937}
            ],
            "queryCode": [
                {"type": "skip", "value": "4-4-1"},
                {"type": "skip", "value": "1-1-3", "skipMisclass": "posn"}
            ],
            "readingMeaning": [
                {
                    "reading": [
                        {"type": "ja_on", "value": "スイ", "onType": "kan", "rStatus": "jy"},
                        {"type": "ja_kun", "value": "みず"}
                    ],
                    "meaning": [
                        {"value": "water"},
                        {"value": "eau", "language": "fr"}
                    ]
                },
                {"value": "み"},
                {"value": "ど"}
            ]
        })
    );
}

#[test]
fn foreign_readings_are_filtered() {
    let entry = transcode_sample().remove(0);
    let groups: Vec<_> = entry
        .reading_meaning
        .expect("reading_meaning present")
        .into_iter()
        .filter_map(|item| match item {
            ReadingMeaningItem::Group(group) => Some(group),
            ReadingMeaningItem::Nanori(_) => None,
        })
        .collect();
    assert_eq!(groups.len(), 1);
    let kinds: Vec<&str> = groups[0].reading.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ja_on", "ja_kun"], "pinyin and korean readings must be dropped");
}

#[test]
fn optional_sections_are_omitted() {
    let entry = character_json("亜");
    let object = entry.as_object().expect("character object");
    for key in ["dictionaryNumber", "queryCode", "readingMeaning"] {
        assert!(!object.contains_key(key), "{} must be absent for 亜", key);
    }
    assert_eq!(
        entry["misc"],
        json!({
            "strokeCount": [7, 8],
            "variant": [{"type": "jis208", "value": "1-48-19"}],
            "radicalName": ["に"]
        })
    );
    assert_eq!(
        entry["radical"],
        json!([
            {"type": "classical", "value": "7"},
            {"type": "nelson_c", "value": "1"}
        ])
    );
}

#[test]
fn empty_misc_lists_are_omitted() {
    let entry = character_json("水");
    let misc = entry["misc"].as_object().expect("misc object");
    assert!(!misc.contains_key("variant"));
    assert!(!misc.contains_key("radicalName"));
}

#[test]
fn missing_containers_yield_empty_lists() {
    let entry = character_json("々");
    assert_eq!(entry["codepoint"], json!([]));
    assert_eq!(entry["radical"], json!([]));
    assert_eq!(entry["misc"], json!({"strokeCount": [3]}));
    assert_eq!(entry["readingMeaning"], json!([{"value": "のま"}]));
}

/// Transcodes the single `<character>` of an inline document.
fn transcode_inline(body: &str) -> Result<CharacterEntry, TranscodeError> {
    let xml = format!("<kanjidic2><character>{}</character></kanjidic2>", body);
    let document = Document::parse_str(&xml, EntityMode::Opaque).expect("parse");
    let record = document.records("character").next().expect("record");
    transcode_character(record)
}

#[test]
fn missing_literal_is_fatal() {
    assert!(matches!(
        transcode_inline("<misc><stroke_count>1</stroke_count></misc>"),
        Err(TranscodeError::MissingElement { element: "literal", .. })
    ));
}

#[test]
fn missing_misc_is_fatal() {
    assert!(matches!(
        transcode_inline("<literal>一</literal>"),
        Err(TranscodeError::MissingElement { element: "misc", .. })
    ));
}

#[test]
fn non_numeric_fields_are_fatal() {
    let cases = [
        ("stroke_count", "one", "<misc><stroke_count>one</stroke_count></misc>"),
        ("grade", "G", "<misc><grade>G</grade><stroke_count>1</stroke_count></misc>"),
        ("freq", "high", "<misc><stroke_count>1</stroke_count><freq>high</freq></misc>"),
        ("jlpt", "N3", "<misc><stroke_count>1</stroke_count><jlpt>N3</jlpt></misc>"),
        (
            "m_vol",
            "VI",
            r#"<misc><stroke_count>1</stroke_count></misc>
               <dic_number>
                 <dic_ref dr_type="moro" m_vol="VI" m_page="0001">1</dic_ref>
               </dic_number>"#,
        ),
        (
            "m_page",
            "p12",
            r#"<misc><stroke_count>1</stroke_count></misc>
               <dic_number>
                 <dic_ref dr_type="moro" m_vol="1" m_page="p12">1</dic_ref>
               </dic_number>"#,
        ),
    ];
    for (expected_field, expected_value, body) in cases {
        match transcode_inline(&format!("<literal>一</literal>{}", body)) {
            Err(TranscodeError::NotAnInteger { field, value }) => {
                assert_eq!(field, expected_field);
                assert_eq!(value, expected_value);
            }
            other => panic!("expected NotAnInteger for {}, got {:?}", expected_field, other),
        }
    }
}

#[test]
fn codepoint_without_type_is_fatal() {
    let body = "<literal>一</literal><codepoint><cp_value>4e00</cp_value></codepoint>\
                <misc><stroke_count>1</stroke_count></misc>";
    assert!(matches!(
        transcode_inline(body),
        Err(TranscodeError::MissingAttribute { attribute: "cp_type", .. })
    ));
}
