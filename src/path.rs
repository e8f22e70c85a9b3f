//! Slash-separated path queries over the parsed tree.
//!
//! Matching style (a flat name plus a set of independent predicates) is
//! adapted from `Megadash452-xml-skimmer`'s CSS-like selector matcher
//! (`selector.rs`), which tests a single element against `tag`/`.class`/
//! `#id`/`[attr]`/`[attr=val]` components; here the components are
//! `name` and `key`/`key=value` predicates joined by `&`, tested against
//! one segment of a slash-separated path, one tree level at a time.

use crate::tree::{Attribute, NodeRef};
use std::rc::Rc;

/// One `name?key=value&key` path segment.
#[derive(Debug, Clone)]
struct Segment {
    name: Vec<u8>,
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone)]
struct Predicate {
    key: Vec<u8>,
    value: Option<Vec<u8>>,
}

fn parse_path(path: &[u8]) -> Vec<Segment> {
    path.split(|&b| b == b'/')
        .filter(|s| !s.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &[u8]) -> Segment {
    match segment.iter().position(|&b| b == b'?') {
        Some(idx) => Segment {
            name: segment[..idx].to_vec(),
            predicates: segment[idx + 1..]
                .split(|&b| b == b'&')
                .filter(|p| !p.is_empty())
                .map(parse_predicate)
                .collect(),
        },
        None => Segment {
            name: segment.to_vec(),
            predicates: Vec::new(),
        },
    }
}

fn parse_predicate(predicate: &[u8]) -> Predicate {
    match predicate.iter().position(|&b| b == b'=') {
        Some(idx) => Predicate {
            key: predicate[..idx].to_vec(),
            value: Some(predicate[idx + 1..].to_vec()),
        },
        None => Predicate {
            key: predicate.to_vec(),
            value: None,
        },
    }
}

/// Element-name matching is ASCII case-insensitive; attribute names and
/// values are compared exactly, by byte content.
fn matches_segment(node: &NodeRef, segment: &Segment) -> bool {
    if !node.key().eq_ignore_ascii_case(&segment.name) {
        return false;
    }
    segment.predicates.iter().all(|predicate| {
        node.attributes().iter().any(|attr| {
            attr.key() == predicate.key.as_slice()
                && match &predicate.value {
                    Some(expected) => attr.value() == Some(expected.as_slice()),
                    None => true,
                }
        })
    })
}

/// Depth-first search from `root`'s children down through `path`'s
/// segments, one tree level per segment, returning the first match in
/// document order. A segment with no matching child at some level simply
/// fails that branch; siblings and other branches are still tried.
pub fn find(root: &NodeRef, path: &[u8]) -> Option<NodeRef> {
    let segments = parse_path(path);
    find_segments(root, &segments)
}

fn find_segments(node: &NodeRef, segments: &[Segment]) -> Option<NodeRef> {
    let (first, rest) = segments.split_first()?;
    for child in node.children().iter() {
        if matches_segment(child, first) {
            if rest.is_empty() {
                return Some(Rc::clone(child));
            }
            if let Some(found) = find_segments(child, rest) {
                return Some(found);
            }
        }
    }
    None
}

/// Resumes enumeration after a previously returned element `last`. Only
/// the *deepest* segment of `path` (if given) is used as a predicate;
/// ancestor segments are not re-validated against `last`'s actual
/// ancestry (see SPEC_FULL.md §4.5 and the Open Question resolution in
/// DESIGN.md).
///
/// `last`'s own children are not considered — only nodes *after* it in
/// document order. The search first checks `last`'s own following
/// siblings (and everything nested under each, in document order); if
/// none match, the search climbs to the parent and repeats, so that a
/// match nested under a later, non-matching uncle subtree is still
/// found.
pub fn find_next(last: &NodeRef, path: Option<&[u8]>) -> Option<NodeRef> {
    let segments = path.map(parse_path);
    let deepest = segments.as_ref().and_then(|segs| segs.last());
    find_next_inner(last, deepest)
}

fn find_next_inner(last: &NodeRef, segment: Option<&Segment>) -> Option<NodeRef> {
    let parent = last.parent()?;
    let following: Vec<NodeRef> = {
        let siblings = parent.children();
        let pos = siblings.iter().position(|n| Rc::ptr_eq(n, last))?;
        siblings[pos + 1..].to_vec()
    };
    for sibling in &following {
        if segment.map_or(true, |s| matches_segment(sibling, s)) {
            return Some(Rc::clone(sibling));
        }
        if let Some(found) = find_in_subtree(sibling, segment) {
            return Some(found);
        }
    }
    find_next_inner(&parent, segment)
}

/// Depth-first search of `node`'s descendants (not `node` itself) for the
/// first element matching `segment` (or the first descendant at all, if
/// `segment` is `None`).
fn find_in_subtree(node: &NodeRef, segment: Option<&Segment>) -> Option<NodeRef> {
    for child in node.children().iter() {
        if segment.map_or(true, |s| matches_segment(child, s)) {
            return Some(Rc::clone(child));
        }
        if let Some(found) = find_in_subtree(child, segment) {
            return Some(found);
        }
    }
    None
}

/// Looks up a single attribute on `node` by ASCII case-insensitive key
/// match, exposed here alongside `find`/`find_next` as the third
/// path-query operation named in §4.5. Returns the attribute itself (not
/// just its value) so callers can tell "no such attribute" (`None`) apart
/// from "present, but valueless" (`Some` with `value() == None`).
pub fn find_attribute(node: &NodeRef, name: &[u8]) -> Option<Attribute> {
    node.find_attribute(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::ParserState;

    fn parse(input: &[u8]) -> NodeRef {
        let mut state = ParserState::new();
        state.parse_chunk(input).unwrap();
        state.root().clone()
    }

    #[test]
    fn finds_nested_element_by_path() {
        let root = parse(b"<root><items><item kind=\"alpha\"/></items></root>");
        let found = find(&root, b"root/items/item").unwrap();
        assert_eq!(&*found.key(), b"item");
    }

    #[test]
    fn predicate_picks_correct_sibling() {
        let root = parse(br#"<r><x k="1"/><x k="2"/></r>"#);
        let found = find(&root, b"r/x?k=2").unwrap();
        assert_eq!(find_attribute(&found, b"k").unwrap().value(), Some(&b"2"[..]));
    }

    #[test]
    fn element_name_matching_is_case_insensitive() {
        let root = parse(b"<Root><Item/></Root>");
        assert!(find(&root, b"root/item").is_some());
    }

    #[test]
    fn attribute_matching_is_exact_case() {
        let root = parse(br#"<r><x K="v"/></r>"#);
        assert!(find(&root, b"r/x?k=v").is_none());
        assert!(find(&root, b"r/x?K=v").is_some());
    }

    #[test]
    fn find_next_returns_none_past_last_sibling() {
        let root = parse(br#"<r><x k="1"/><x k="2"/></r>"#);
        let last = find(&root, b"r/x?k=2").unwrap();
        assert!(find_next(&last, Some(b"r/x")).is_none());
    }

    #[test]
    fn find_next_descends_into_later_non_matching_uncle() {
        let root = parse(b"<r><a><x/></a><b><y/><x/></b></r>");
        let first_x = find(&root, b"r/a/x").unwrap();
        let next = find_next(&first_x, Some(b"x")).unwrap();
        assert_eq!(&*next.key(), b"x");
        assert!(Rc::ptr_eq(&next, &root.children()[1].children()[1]));
    }

    #[test]
    fn find_next_without_path_walks_document_order() {
        let root = parse(b"<r><a/><b/></r>");
        let a = find(&root, b"r/a").unwrap();
        let next = find_next(&a, None).unwrap();
        assert_eq!(&*next.key(), b"b");
    }

    #[test]
    fn valueless_predicate_matches_any_value() {
        let root = parse(br#"<r><x a="1"/><y/></r>"#);
        assert!(find(&root, b"r/x?a").is_some());
        assert!(find(&root, b"r/y?a").is_none());
    }

    #[test]
    fn find_attribute_is_case_insensitive_and_distinguishes_absent_from_valueless() {
        let root = parse(br#"<r><x Enabled k="1"/></r>"#);
        let x = find(&root, b"r/x").unwrap();
        let enabled = find_attribute(&x, b"enabled").unwrap();
        assert_eq!(enabled.value(), None);
        assert!(find_attribute(&x, b"nonexistent").is_none());
    }
}
