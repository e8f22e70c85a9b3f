//! The chunk-driven tag-recognition state machine.
//!
//! Generalizes `notviri-lazyxml`'s `Reader` — a one-shot iterator that
//! scans a single, already-complete `&[u8]`/`&str` buffer with `memchr` —
//! into a `ParserState` that is fed chunks one at a time and remembers,
//! between calls, exactly how far it had matched into whichever delimiter
//! it was racing. The byte-scanning idioms (`memchr` fast paths around a
//! slow per-byte fallback for the interesting bytes) are carried over
//! directly; what changes is that state now survives a chunk boundary
//! instead of living only on the call stack of a single `next()`.

use crate::buffer::ByteBuf;
use crate::error::{Error, Result};
use crate::finalize;
use crate::tree::{self, ElementKind, Node, NodeRef};

#[cfg(feature = "use-memchr")]
use memchr::{memchr, memchr2};
#[cfg(not(feature = "use-memchr"))]
fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&x| x == needle)
}
#[cfg(not(feature = "use-memchr"))]
fn memchr2(n1: u8, n2: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&x| x == n1 || x == n2)
}

/// Lookup table of valid tag-name-start bytes, ported directly from
/// `notviri-lazyxml`'s `IS_VALID_NAME_START` (same byte ranges excluded:
/// controls and space, `!`-`9`, `:`-`@`, `[`-`` ` ``, `{`-DEL).
static IS_VALID_NAME_START: [bool; 256] = lut_name_start_chars();
const fn lut_name_start_chars() -> [bool; 256] {
    let mut arr = [true; 256];
    let mut i = 0;
    while i < 256 {
        arr[i] = match i as u8 {
            0x00..=b' ' => false,
            b'!'..=b'9' => false,
            b':'..=b'@' => false,
            b'['..=b'`' => false,
            b'{'..=0x7F => false,
            _ => true,
        };
        i += 1;
    }
    arr
}

#[inline]
fn is_valid_tag_name_start(byte: u8) -> bool {
    IS_VALID_NAME_START[byte as usize]
}

/// One of the six tag shapes §4.3 recognizes. Distinct from
/// [`ElementKind`] because a close tag never produces a tree node of its
/// own — it only pops `current` back to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    ProcessingInstruction,
    Doctype,
    Comment,
    Cdata,
}

impl TagKind {
    fn element_kind(self) -> ElementKind {
        match self {
            TagKind::Open => ElementKind::Element,
            TagKind::Close => unreachable!("close tags never become tree nodes"),
            TagKind::ProcessingInstruction => ElementKind::ProcessingInstruction,
            TagKind::Doctype => ElementKind::Doctype,
            TagKind::Comment => ElementKind::Comment,
            TagKind::Cdata => ElementKind::Cdata,
        }
    }
}

/// Which of the three sub-parsers in §4.3 is currently driving the
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Content,
    TagOpening,
    TagBody,
}

/// How far the tag-opening sub-parser has raced into the `<!` family of
/// overlapping delimiters (`<!`, `<!--`, `<![CDATA[`). Nothing is tracked
/// here for `</` or `<?`, since those resolve unambiguously on the very
/// next byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenCursor {
    /// Just past the leading `<`; the deciding byte hasn't arrived yet.
    Init,
    /// Matched `<!`. This alone already fully matches the doctype/
    /// declaration pattern, so it is the fallback if nothing longer pans
    /// out.
    Bang,
    /// Matched `<!-`; only the comment candidate (`<!--`) is still alive.
    BangDash,
    /// Matched `<![`; only the CDATA candidate (`<![CDATA[`) is still
    /// alive.
    BangBracket,
    /// Matched `<![` plus this many bytes of the literal `CDATA[` that
    /// follows it (1..=6).
    BangBracketCdata(u8),
}

/// Configuration for [`ParserState`] construction. Controls allocation
/// hints only; parsing semantics are fixed by the specification and are
/// never configurable (see SPEC_FULL.md §8).
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    capacity_hint: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-reserves `bytes` for the active tag-body accumulator, useful
    /// when the caller expects long attribute blobs or CDATA sections.
    pub fn with_capacity_hint(bytes: usize) -> Self {
        Self { capacity_hint: bytes }
    }
}

/// The persistent, chunk-resumable parser state described by §4.3.
///
/// Must be constructed with [`ParserState::new`] (or [`ParserState::with_config`])
/// before the first call to [`ParserState::parse_chunk`]; every subsequent chunk
/// is fed to the *same* state.
pub struct ParserState {
    root: NodeRef,
    current: NodeRef,
    mode: Mode,
    open_cursor: OpenCursor,
    tag_kind: Option<TagKind>,
    body: ByteBuf,
    /// Trailing run length of the closing delimiter's repeated byte
    /// (e.g. consecutive `-` while scanning for `-->`).
    close_run: usize,
}

impl ParserState {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let root = Node::new_root();
        Self {
            current: root.clone(),
            root,
            mode: Mode::Content,
            open_cursor: OpenCursor::Init,
            tag_kind: None,
            body: ByteBuf::with_capacity(config.capacity_hint),
            close_run: 0,
        }
    }

    /// The root of the tree being built. Valid to call at any point,
    /// including mid-parse (the tree is a best-effort, partially-built
    /// structure until the final chunk has been fed).
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Consumes `chunk`, advancing the state machine. An empty chunk is a
    /// no-op — there is no "null chunk pointer" in Rust, so the misuse
    /// error kind from §7 has no observable trigger here.
    pub fn parse_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let mut pos = 0usize;
        while pos < chunk.len() {
            match self.mode {
                Mode::Content => {
                    self.step_content(chunk, &mut pos);
                }
                Mode::TagOpening => {
                    self.step_open(chunk, &mut pos)?;
                }
                Mode::TagBody => {
                    self.step_body(chunk, &mut pos);
                }
            }
        }
        Ok(())
    }

    fn step_content(&mut self, chunk: &[u8], pos: &mut usize) {
        let rest = &chunk[*pos..];
        match memchr(b'<', rest) {
            Some(idx) => {
                tree::append_text(&self.current, &rest[..idx]);
                *pos += idx + 1;
                self.mode = Mode::TagOpening;
                self.open_cursor = OpenCursor::Init;
            }
            None => {
                tree::append_text(&self.current, rest);
                *pos = chunk.len();
            }
        }
    }

    fn step_open(&mut self, chunk: &[u8], pos: &mut usize) -> Result<()> {
        while *pos < chunk.len() {
            let byte = chunk[*pos];
            *pos += 1;
            match self.open_cursor {
                OpenCursor::Init => match byte {
                    b'/' => {
                        log::trace!("tag-opening: committed element-close");
                        self.commit_kind(TagKind::Close);
                        return Ok(());
                    }
                    b'?' => {
                        log::trace!("tag-opening: committed processing-instruction");
                        self.commit_kind(TagKind::ProcessingInstruction);
                        return Ok(());
                    }
                    b'!' => {
                        self.body.push_byte(byte);
                        self.open_cursor = OpenCursor::Bang;
                    }
                    other => {
                        if is_valid_tag_name_start(other) {
                            log::trace!("tag-opening: committed element-open");
                            self.body.push_byte(other);
                            self.commit_kind(TagKind::Open);
                        } else {
                            let offset = *pos - 1;
                            log::debug!("structural stall: invalid tag-name start at {offset}");
                            return Err(Error::StructuralStall { offset });
                        }
                        return Ok(());
                    }
                },
                OpenCursor::Bang => match byte {
                    b'-' => {
                        self.body.push_byte(byte);
                        self.open_cursor = OpenCursor::BangDash;
                    }
                    b'[' => {
                        self.body.push_byte(byte);
                        self.open_cursor = OpenCursor::BangBracket;
                    }
                    _ => {
                        self.fall_back_to_doctype(byte);
                        return Ok(());
                    }
                },
                OpenCursor::BangDash => match byte {
                    b'-' => {
                        log::trace!("tag-opening: committed comment");
                        self.body.push_byte(byte);
                        self.commit_kind(TagKind::Comment);
                        return Ok(());
                    }
                    _ => {
                        self.fall_back_to_doctype(byte);
                        return Ok(());
                    }
                },
                OpenCursor::BangBracket => match byte {
                    b'C' => {
                        self.body.push_byte(byte);
                        self.open_cursor = OpenCursor::BangBracketCdata(1);
                    }
                    _ => {
                        self.fall_back_to_doctype(byte);
                        return Ok(());
                    }
                },
                OpenCursor::BangBracketCdata(n) => {
                    let expected = CDATA_LITERAL[n as usize];
                    if byte == expected {
                        self.body.push_byte(byte);
                        if n as usize + 1 == CDATA_LITERAL.len() {
                            log::trace!("tag-opening: committed CDATA section");
                            self.commit_kind(TagKind::Cdata);
                            return Ok(());
                        }
                        self.open_cursor = OpenCursor::BangBracketCdata(n + 1);
                    } else {
                        self.fall_back_to_doctype(byte);
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// The `<!` prefix is already a complete match of the doctype pattern
    /// on its own, so any byte that kills the comment/CDATA candidates
    /// resolves to `Doctype`. Everything matched so far toward the longer
    /// candidates is already sitting in `self.body`; only the byte that
    /// broke the race still needs appending (the "partial-match flushback"
    /// design note — nothing here is actually discarded, since the
    /// finalized key keeps the whole opening sigil regardless of kind).
    fn fall_back_to_doctype(&mut self, byte: u8) {
        log::trace!("tag-opening: comment/CDATA candidate died, falling back to doctype");
        self.body.push_byte(byte);
        self.commit_kind(TagKind::Doctype);
    }

    fn commit_kind(&mut self, kind: TagKind) {
        self.tag_kind = Some(kind);
        self.close_run = 0;
        self.mode = Mode::TagBody;
    }

    fn step_body(&mut self, chunk: &[u8], pos: &mut usize) {
        let kind = self.tag_kind.expect("tag body active without a committed kind");
        let closed = match kind {
            TagKind::Open | TagKind::Close | TagKind::Doctype => {
                self.scan_simple_close(chunk, pos)
            }
            TagKind::ProcessingInstruction => self.scan_run_close(chunk, pos, b'?', 1),
            TagKind::Comment => self.scan_run_close(chunk, pos, b'-', 2),
            TagKind::Cdata => self.scan_run_close(chunk, pos, b']', 2),
        };
        if closed {
            self.finalize_tag(kind);
        }
    }

    /// Closing pattern is a bare `>`: jump straight to the next one.
    fn scan_simple_close(&mut self, chunk: &[u8], pos: &mut usize) -> bool {
        let rest = &chunk[*pos..];
        match memchr(b'>', rest) {
            Some(idx) => {
                self.body.push_slice(&rest[..idx]);
                *pos += idx + 1;
                true
            }
            None => {
                self.body.push_slice(rest);
                *pos = chunk.len();
                false
            }
        }
    }

    /// Closing pattern is `repeat` repeated `min` times followed by `>`
    /// (`?>`, `-->`, `]]>`). Runs of `repeat` are tracked across chunk
    /// boundaries in `self.close_run`; the run only counts consecutive
    /// occurrences, so any intervening literal byte resets it to zero
    /// before the next occurrence is counted. The closing sigil itself
    /// (the run of `repeat` bytes) stays in the key; only the bare
    /// terminating `>` is dropped.
    fn scan_run_close(&mut self, chunk: &[u8], pos: &mut usize, repeat: u8, min: usize) -> bool {
        loop {
            if *pos >= chunk.len() {
                return false;
            }
            let rest = &chunk[*pos..];
            match memchr2(repeat, b'>', rest) {
                Some(idx) => {
                    if idx > 0 {
                        self.close_run = 0;
                    }
                    self.body.push_slice(&rest[..idx]);
                    *pos += idx;
                    let byte = chunk[*pos];
                    *pos += 1;
                    if byte == b'>' {
                        if self.close_run >= min {
                            return true;
                        }
                        self.close_run = 0;
                        self.body.push_byte(byte);
                    } else {
                        debug_assert_eq!(byte, repeat);
                        self.close_run += 1;
                        self.body.push_byte(byte);
                    }
                }
                None => {
                    if !rest.is_empty() {
                        self.close_run = 0;
                    }
                    self.body.push_slice(rest);
                    *pos = chunk.len();
                    return false;
                }
            }
        }
    }

    fn finalize_tag(&mut self, kind: TagKind) {
        let raw = self.body.take();
        match kind {
            TagKind::Close => {
                log::debug!("finalize: close tag, popping to parent");
                if let Some(parent) = self.current.parent() {
                    self.current = parent;
                }
            }
            TagKind::Open => {
                let (name, attr_text, self_closing) = finalize::split_open_key(raw);
                log::debug!(
                    "finalize: open tag <{}>{}",
                    String::from_utf8_lossy(&name),
                    if self_closing { " (self-closing)" } else { "" }
                );
                let child = tree::create_element(&self.current, ElementKind::Element);
                child.set_key(name);
                child.set_attributes(finalize::parse_attributes(&attr_text));
                if !self_closing {
                    self.current = child;
                }
            }
            other => {
                log::debug!("finalize: {other:?} tag, key len {}", raw.len());
                let child = tree::create_element(&self.current, other.element_kind());
                child.set_key(raw);
            }
        }
        self.tag_kind = None;
        self.close_run = 0;
        self.mode = Mode::Content;
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}

const CDATA_LITERAL: &[u8] = b"CDATA[";
