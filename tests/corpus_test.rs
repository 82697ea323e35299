//! Corpus tests - run minification on every document in the corpus directory.

use std::fs;
use std::path::Path;

use markmin::{minify_svg, minify_xml};
use quick_xml::Reader;
use quick_xml::events::Event;

fn minify_by_extension(path: &Path, content: &str) -> Option<Result<String, markmin::MarkminError>> {
    match path.extension()?.to_str()? {
        "svg" => Some(minify_svg(content)),
        "xml" => Some(minify_xml(content)),
        _ => None,
    }
}

fn assert_well_formed(name: &str, doc: &str) {
    let mut reader = Reader::from_str(doc);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("{name}: minified output is not well-formed: {e}"),
        }
    }
}

/// Every corpus document minifies, shrinks, stays well-formed and is a fixed point.
#[test]
fn test_corpus_minification() {
    let corpus_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus");

    let mut total = 0;
    let mut total_original = 0usize;
    let mut total_minified = 0usize;

    for entry in fs::read_dir(&corpus_dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path).unwrap();

        let Some(result) = minify_by_extension(&path, &content) else {
            continue;
        };
        let minified = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        total += 1;

        assert!(minified.len() < content.len(), "{name}: output did not shrink");
        assert_well_formed(&name, &minified);

        let again = minify_by_extension(&path, &minified).unwrap().unwrap();
        assert_eq!(again, minified, "{name}: minification is not idempotent");

        total_original += content.len();
        total_minified += minified.len();
    }

    assert!(total >= 3, "corpus went missing");
    let savings = ((total_original - total_minified) as f64 / total_original as f64) * 100.0;
    println!(
        "Corpus: {} documents, {} -> {} bytes ({:.1}% smaller)",
        total, total_original, total_minified, savings
    );
}

#[test]
fn test_corpus_feed_has_no_double_spaces() {
    let content = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus/feed.xml"),
    )
    .unwrap();
    let minified = minify_xml(&content).unwrap();

    assert!(!minified.contains("  "), "{minified}");
    assert!(!minified.contains("> "), "{minified}");
    assert!(!minified.contains(" <"), "{minified}");
    assert!(minified.contains(
        "<subtitle type=\"html\">A &lt;em&gt;lot&lt;/em&gt; of effort went into making this effortless</subtitle>"
    ));
    assert!(minified.contains("<content type=\"xhtml\">&lt;p>Hello &amp; goodbye&lt;/p></content>"));
    assert!(minified.contains(r#"<summary title='the "best" one'/>"#));
}

#[test]
fn test_corpus_sprite() {
    let content = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus/sprite.svg"),
    )
    .unwrap();
    assert_eq!(
        minify_svg(&content).unwrap(),
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
            r#"<defs><symbol id="dot" viewBox="0 0 2 2">"#,
            r#"<circle cx="1" cy="1" r="1" style="fill: red; opacity: .5"/></symbol></defs>"#,
            r##"<use xlink:href="#dot" x="0" y="0"/><use xlink:href="#dot" x="4" y="0"/></svg>"##,
        )
    );
}
