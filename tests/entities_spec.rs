use edrdg_json::EntityMode;
use edrdg_json::TranscodeError;
use edrdg_json::edrdg::codec::entities::{
    EntityTable, NeutralizedCopy, neutralize_line, resolve_references,
};
use edrdg_json::edrdg::format::document::Document;
use pretty_assertions::assert_eq;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    for part in parts {
        p.push(part);
    }
    p
}

const SAMPLE_SUBSET: &str = r#"JMdict [
<!ENTITY n "noun (common) (futsuumeishi)">
<!ENTITY uk "word usually written using kana alone">
<!ENTITY n "shadowed">
]"#;

fn sample_table(mode: EntityMode) -> EntityTable {
    EntityTable::from_doctype(SAMPLE_SUBSET, mode)
}

#[test]
fn declaration_is_rewritten_to_its_name() {
    assert_eq!(
        neutralize_line("<!ENTITY n \"noun (common) (futsuumeishi)\">\n"),
        "<!ENTITY n \"n\">\n"
    );
    assert_eq!(
        neutralize_line("<!ENTITY  adj-i   \"adjective (keiyoushi)\" >"),
        "<!ENTITY adj-i \"adj-i\">"
    );
}

#[test]
fn other_lines_are_untouched() {
    for line in [
        "<!ELEMENT gloss (#PCDATA | pri)*>\n",
        "<pos>&n;</pos>\r\n",
        "<!ENTITY empty \"\">",
        "",
    ] {
        let out = neutralize_line(line);
        assert!(matches!(out, Cow::Borrowed(_)), "{:?} was rewritten", line);
        assert_eq!(out, line);
    }
}

#[test]
fn scratch_copy_is_neutralized_and_removed() {
    let scratch = TempDir::new().expect("scratch dir");
    let source = fixture_path(&["tests", "fixtures", "JMdict_sample.xml"]);

    let copy_path = {
        let copy = NeutralizedCopy::create(&source, Some(scratch.path())).expect("create copy");
        assert_eq!(copy.rewritten(), 6);
        assert!(copy.path().starts_with(scratch.path()));

        let original = fs::read_to_string(&source).expect("read source");
        let neutralized = fs::read_to_string(copy.path()).expect("read copy");
        assert!(neutralized.contains("<!ENTITY n \"n\">"));
        assert!(neutralized.contains("<!ENTITY ksb \"ksb\">"));
        assert!(!neutralized.contains("futsuumeishi"));
        assert_eq!(
            original.lines().count(),
            neutralized.lines().count(),
            "line structure must be preserved"
        );
        copy.path().to_path_buf()
    };

    assert!(!copy_path.exists(), "scratch copy outlived its owner");
    assert!(fs::read_dir(scratch.path()).expect("read dir").next().is_none());
}

#[test]
fn scratch_copy_of_missing_source_fails_cleanly() {
    let scratch = TempDir::new().expect("scratch dir");
    let missing = scratch.path().join("nope.xml");
    let err = NeutralizedCopy::create(&missing, Some(scratch.path())).expect_err("missing source");
    assert!(matches!(err, TranscodeError::SourceUnavailable { .. }));
    assert!(fs::read_dir(scratch.path()).expect("read dir").next().is_none());
}

#[test]
fn first_declaration_wins() {
    let table = sample_table(EntityMode::Expand);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("n"), Some("noun (common) (futsuumeishi)"));
    assert_eq!(table.get("vs"), None);
}

#[test]
fn references_resolve_per_mode() {
    assert_eq!(
        resolve_references("&n;", &sample_table(EntityMode::Opaque)).expect("opaque"),
        "n"
    );
    assert_eq!(
        resolve_references("&n;", &sample_table(EntityMode::Expand)).expect("expand"),
        "noun (common) (futsuumeishi)"
    );
    let neutralized = EntityTable::from_doctype(r#"<!ENTITY uk "uk">"#, EntityMode::Scratch);
    assert_eq!(resolve_references("&uk;", &neutralized).expect("scratch"), "uk");
}

#[test]
fn undeclared_entity_is_rejected() {
    for mode in [EntityMode::Scratch, EntityMode::Opaque, EntityMode::Expand] {
        assert!(
            matches!(
                resolve_references("&vs;", &sample_table(mode)),
                Err(TranscodeError::InvalidReference(_))
            ),
            "undeclared entity accepted in {} mode",
            mode
        );
    }
}

#[test]
fn predefined_and_character_references() {
    let table = EntityTable::default();
    assert_eq!(
        resolve_references("a &lt;b&gt; &amp; &quot;c&quot; &apos;d&apos; &#12354;&#x3044;", &table)
            .expect("resolve"),
        "a <b> & \"c\" 'd' あい"
    );
    assert!(matches!(
        resolve_references("plain text", &table).expect("plain"),
        Cow::Borrowed("plain text")
    ));
}

#[test]
fn broken_references_are_rejected() {
    let table = EntityTable::default();
    for raw in [
        "fish &amp chips",
        "&;",
        "&#xZZ;",
        "&#1114112;",
        "&#0;",
        "&#+65;",
        "&#x+41;",
    ] {
        assert!(
            matches!(
                resolve_references(raw, &table),
                Err(TranscodeError::InvalidReference(_))
            ),
            "{:?} should be rejected",
            raw
        );
    }
}

#[test]
fn doctype_comments_do_not_end_the_declaration() {
    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE JMdict [
<!-- a comment with a lone > inside -->
<!ENTITY n "noun">
<!-- <!ENTITY n "commented out"> -->
]>
<JMdict><entry><pos>&n;</pos></entry></JMdict>
"#;
    for (mode, expected) in [(EntityMode::Expand, "noun"), (EntityMode::Opaque, "n")] {
        let document = Document::parse_str(xml, mode).expect("comment in DOCTYPE");
        let entry = document.records("entry").next().expect("entry");
        assert_eq!(entry.child("pos").expect("pos").text(), expected);
    }
}

#[test]
fn quoted_comment_markers_are_kept() {
    let xml = r#"<!DOCTYPE r [<!ENTITY c "<!-- not a comment -->">]><r>&c;</r>"#;
    let document = Document::parse_str(xml, EntityMode::Expand).expect("parse");
    assert_eq!(document.root().text(), "<!-- not a comment -->");
}

#[test]
fn attribute_values_are_resolved() {
    let xml = "<root><item note=\"a &amp; b\" code=\"&#65;\"/></root>";
    let document = Document::parse_str(xml, EntityMode::Opaque).expect("parse");
    let item = document.root().child("item").expect("item");
    assert_eq!(item.attr("note"), Some("a & b"));
    assert_eq!(item.attr("code"), Some("A"));
}

#[test]
fn document_without_root_is_rejected() {
    let err = Document::parse_str("<?xml version=\"1.0\"?>\n<!-- nothing -->\n", EntityMode::Opaque)
        .expect_err("no root");
    assert!(matches!(err, TranscodeError::EmptyDocument), "got {:?}", err);
}
