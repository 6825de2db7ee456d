//! End-to-end splits of small, known documents.

use super::word_splitter;
use crate::document::DocumentMetadata;
use crate::headers::HeadingMap;
use crate::split_text;
use uuid::Uuid;

#[test]
fn test_headings_in_one_chunk() {
    let text = "# A\nSentence one.\n\n## B\nSentence two.";
    let chunks = word_splitter(100).split(text).unwrap();

    assert_eq!(chunks.len(), 1);
    let expected: HeadingMap = [(1, vec!["A".to_string()]), (2, vec!["B".to_string()])]
        .into_iter()
        .collect();
    assert_eq!(chunks[0].metadata.headers.as_map(), &expected);
}

#[test]
fn test_link_and_image_in_one_chunk() {
    let text = "Logo: ![logo](http://img/1.png)\nVisit [site](http://link/1) today.\n";
    let chunks = word_splitter(100).split(text).unwrap();

    assert_eq!(chunks.len(), 1);
    let chunk = &chunks[0];
    assert!(chunk.text.contains("![logo]({$img0})"));
    assert!(chunk.text.contains("[site]({$url0})"));
    assert_eq!(chunk.metadata.images, vec!["http://img/1.png"]);
    assert_eq!(chunk.metadata.urls, vec!["http://link/1"]);
    assert_eq!(chunk.restored_text(), text);
}

#[test]
fn test_long_document_snaps_to_lines() {
    // 167 lines of ten words, 60 bytes each
    let line = format!("{}\n", ["lorem"; 10].join(" "));
    let doc = line.repeat(167);
    assert!(doc.len() > 10_000);

    let limit = 100;
    let chunks = word_splitter(limit).split(&doc).unwrap();
    assert!(chunks.len() >= 5);

    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter().enumerate() {
        let source = chunk.source(&doc).unwrap();
        assert!(chunk.metadata.token_count <= limit);
        if i < last {
            assert!(source.ends_with('\n'), "chunk {} ends mid-line", i);
            assert!(chunk.metadata.token_count as f64 >= 0.8 * limit as f64);
        }
    }

    // Nine lines (90 words + 6 framing) fill each chunk until the last five
    assert_eq!(chunks.len(), 19);
    assert!(chunks[..last].iter().all(|c| c.metadata.token_count == 96));
    assert_eq!(chunks[last].metadata.token_count, 56);
}

#[test]
fn test_split_document_inherits_base() {
    let text = "# Guide\nRead [the docs](http://docs) first.\n";
    let base = DocumentMetadata {
        uuid: Uuid::new_v4(),
        name: "guide.md".to_string(),
        source: "docs/guide.md".to_string(),
        mime_type: Some("text/markdown".to_string()),
        ..Default::default()
    };

    let documents = word_splitter(100).split_document(text, Some(&base)).unwrap();
    assert_eq!(documents.len(), 1);

    let doc = &documents[0];
    assert_eq!(doc.metadata.uuid, base.uuid);
    assert_eq!(doc.metadata.source, "docs/guide.md");
    assert_eq!(doc.metadata.kind.as_deref(), Some("text"));
    assert_eq!(doc.metadata.content_type.as_deref(), Some("chunk"));
    assert_eq!(doc.metadata.urls, vec!["http://docs"]);
    assert_eq!(doc.metadata.headers.trail(), vec!["Guide"]);

    let restored = doc.clone().restore_placeholders();
    assert_eq!(restored.text, text);
}

#[test]
fn test_tiktoken_split_stays_within_budget() {
    let mut doc = String::new();
    for section in 1..=6 {
        doc.push_str(&format!("## Section {}\n", section));
        for sentence in 1..=8 {
            doc.push_str(&format!(
                "Sentence {} of section {} talks about splitting text into chunks.\n",
                sentence, section
            ));
        }
    }

    let limit = 64;
    let chunks = split_text(&doc, limit, "gpt-4o").unwrap();
    assert!(chunks.len() > 1);

    let joined: String = chunks.iter().map(|c| c.source(&doc).unwrap()).collect();
    assert_eq!(joined, doc);
    assert!(chunks.iter().all(|c| c.metadata.token_count <= limit));
    assert!(chunks[0].metadata.headers.get(2).is_some());
}
