//! *skimxml* is a permissive, incremental XML reader core.
//!
//! It does not validate against the XML 1.0 standard and does not aim
//! to: it recognizes six tag shapes (`<name ...>`, `</name>`, `<?...?>`,
//! `<!DOCTYPE ...>`, `<!-- ... -->`, `<![CDATA[...]]>`) by their opening
//! and closing delimiters alone, builds a tree out of whatever it finds,
//! and never fails on malformed markup that still begins with a `<` it
//! recognizes. The only failure mode is a stray `<` that doesn't begin
//! any of the six patterns (see [`Error`]).
//!
//! What sets it apart from a one-shot parser like its ancestor,
//! `lazyxml`, is that it is fed in chunks: a delimiter like `<![CDATA[`
//! or `-->` can straddle any number of `parse_chunk` calls and is still matched
//! correctly, because the in-progress match is carried in [`ParserState`]
//! rather than on the call stack.
//!
//! # Example
//! ```rust
//! let root = skimxml::parse("<Test>hello, world!</Test>").unwrap();
//! let found = skimxml::find(&root, b"Test").unwrap();
//! assert_eq!(skimxml::content(&found), Some(b"hello, world!".to_vec()));
//! ```
//!
//! # Incremental use
//! ```rust
//! let mut state = skimxml::ParserState::new();
//! for chunk in [b"<a>one".as_slice(), b"<b/>two</a>".as_slice()] {
//!     state.parse_chunk(chunk).unwrap();
//! }
//! let root = state.root();
//! assert_eq!(root.children()[0].children().len(), 3);
//! ```
//!
//! # Why would I need this?
//! Same niche as its ancestor `lazyxml`: malformed-but-reasonable XML
//! from sources that don't care about the standard (game asset files,
//! ad-hoc config formats, scraped markup) where a strict parser would
//! simply refuse to produce anything. If you need standards compliance,
//! reach for [`quick-xml`](https://crates.io/crates/quick-xml) or
//! [`xmlparser`](https://crates.io/crates/xmlparser) instead.

mod buffer;
mod content;
mod error;
mod finalize;
mod path;
mod tokenizer;
mod tree;

pub use content::{content, content_find};
pub use error::{Error, Result};
pub use path::{find, find_attribute, find_next};
pub use tokenizer::{Config, ParserState};
pub use tree::{destroy, Attribute, ElementKind, NodeRef};

/// Parses a single, already-complete XML document in one call.
///
/// This is the convenience wrapper named in the external interfaces: it
/// constructs a fresh [`ParserState`], feeds it `text` in one shot, and
/// returns the resulting tree. A document left mid-element at the end of
/// `text` (an unclosed tag) is not an error; the returned tree simply
/// reflects whatever was built up to that point, per the "well-formedness
/// errors are tolerated" design.
pub fn parse<T: AsRef<[u8]>>(text: T) -> Result<NodeRef> {
    let mut state = ParserState::new();
    state.parse_chunk(text.as_ref())?;
    Ok(state.root().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_equivalent_to_manual_parse_chunk() {
        let one_shot = parse("<a><b>x</b></a>").unwrap();
        let mut state = ParserState::new();
        state.parse_chunk(b"<a><b>x</b></a>").unwrap();
        let manual = state.root();
        assert_eq!(&*one_shot.children()[0].key(), &*manual.children()[0].key());
    }

    #[test]
    fn unclosed_element_is_not_an_error() {
        let root = parse("<a><b>x").unwrap();
        assert_eq!(root.children().len(), 1);
        let a = &root.children()[0];
        assert_eq!(a.children().len(), 1);
        let b = &a.children()[0];
        assert_eq!(&*b.key(), b"b");
    }

    #[test]
    fn stray_bracket_surfaces_structural_stall() {
        let err = parse("text < more text").unwrap_err();
        assert!(matches!(err, Error::StructuralStall { .. }));
    }

    #[test]
    fn end_to_end_scenario_with_attributes_and_comment() {
        let root = parse(
            r#"<!-- config --><root kind="top"><item id="1" enabled/><item id="2"/></root>"#,
        )
        .unwrap();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].kind, ElementKind::Comment);
        let config = find(&root, b"root").unwrap();
        assert_eq!(config.children().len(), 2);
        let first = find(&root, b"root/item?id=1").unwrap();
        let enabled = find_attribute(&first, b"enabled").unwrap();
        assert_eq!(enabled.value(), None);
        assert!(find_attribute(&first, b"ENABLED").is_some());
        assert!(find_attribute(&first, b"nonexistent").is_none());
    }

    #[test]
    fn destroy_consumes_the_tree() {
        let root = parse("<a/>").unwrap();
        destroy(root);
    }
}
