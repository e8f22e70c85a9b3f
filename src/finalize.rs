//! Tag finalization: splitting an element-open tag's raw body into a name
//! and attribute text, and parsing that attribute text into records.
//!
//! The attribute scanning logic (quote-aware, backslash-escape-aware) is
//! adapted from `notviri-lazyxml`'s `AttributeIter`, which walked the same
//! state machine over borrowed spans of the original buffer; here it
//! walks an already-captured, owned tag body and produces owned
//! `Attribute` records directly; see DESIGN.md for why spans were dropped.

use crate::tree::Attribute;

/// Splits an element-open tag's raw captured body (everything between `<`
/// and `>`, exclusive) into `(name, attribute_text, self_closing)` per
/// §4.3's finalize step: trailing whitespace is stripped first, then a
/// trailing `/` (if any) is dropped and noted, then the remainder is split
/// at the first whitespace byte into name and attribute text.
pub fn split_open_key(mut raw: Vec<u8>) -> (Vec<u8>, Vec<u8>, bool) {
    while raw.last().is_some_and(|b| b.is_ascii_whitespace()) {
        raw.pop();
    }
    let self_closing = if raw.last() == Some(&b'/') {
        raw.pop();
        true
    } else {
        false
    };
    match raw.iter().position(|b| b.is_ascii_whitespace()) {
        Some(idx) => {
            let attr_text = raw[idx + 1..].to_vec();
            raw.truncate(idx);
            (raw, attr_text, self_closing)
        }
        None => (raw, Vec::new(), self_closing),
    }
}

/// Parses an attribute-text blob per §4.4:
///
/// 1. Skip whitespace.
/// 2. Read a name as a maximal run of bytes that are neither `=` nor
///    whitespace. An empty name (nothing left to read) ends the scan.
/// 3. Skip whitespace.
/// 4. If the next byte is `=`, skip it and any following whitespace, then
///    read a value: if a quote (`'` or `"`) follows, scan to the matching
///    quote honoring a backslash escape (the escaped byte is taken
///    literally); otherwise the value is a maximal run of non-whitespace
///    bytes. With no `=`, the attribute has no value.
pub fn parse_attributes(text: &[u8]) -> Vec<Attribute> {
    let mut attrs = Vec::new();
    let mut i = 0;
    let len = text.len();

    loop {
        while i < len && text[i].is_ascii_whitespace() {
            i += 1;
        }
        let name_start = i;
        while i < len && text[i] != b'=' && !text[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == name_start {
            break;
        }
        let name = text[name_start..i].to_vec();

        while i < len && text[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = None;
        if i < len && text[i] == b'=' {
            i += 1;
            while i < len && text[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (text[i] == b'\'' || text[i] == b'"') {
                let quote = text[i];
                i += 1;
                let mut val = Vec::new();
                while i < len {
                    let byte = text[i];
                    if byte == b'\\' && i + 1 < len {
                        val.push(text[i + 1]);
                        i += 2;
                        continue;
                    }
                    if byte == quote {
                        i += 1;
                        break;
                    }
                    val.push(byte);
                    i += 1;
                }
                value = Some(val);
            } else {
                let val_start = i;
                while i < len && !text[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = Some(text[val_start..i].to_vec());
            }
        }
        attrs.push(Attribute::new(name, value));
    }
    attrs
}
