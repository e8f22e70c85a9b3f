//! Text-content extraction (§4.6): concatenating every descendant `Text`
//! node's value, in document order.

use crate::path;
use crate::tree::{ElementKind, NodeRef};

/// Concatenates the value of every `Text`-kind descendant of `node`, in
/// document order. Returns `None` when `node` has no text descendants at
/// all, rather than an empty, indistinguishable-from-"has one empty text
/// child" `Some(vec![])`.
pub fn content(node: &NodeRef) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    for child in node.children().iter() {
        collect_text(child, &mut buf);
    }
    if buf.is_empty() {
        None
    } else {
        Some(buf)
    }
}

fn collect_text(node: &NodeRef, buf: &mut Vec<u8>) {
    if node.kind == ElementKind::Text {
        buf.extend_from_slice(&node.value());
        return;
    }
    for child in node.children().iter() {
        collect_text(child, buf);
    }
}

/// Runs a path query from `root` and extracts the text content of the
/// result, or `None` if the path matches nothing or matches an element
/// with no text descendants.
pub fn content_find(root: &NodeRef, path: &[u8]) -> Option<Vec<u8>> {
    content(&path::find(root, path)?)
}
