//! The element tree.
//!
//! Ownership shape is grounded in `markup5ever/rcdom.rs`'s `Node`/`Handle`/
//! `WeakHandle` (from `servo-html5ever`, one of the retrieved example
//! repositories): a node owns its children through a strong `Rc`, and
//! holds a non-owning `Weak` back-link to its parent. That gives us the
//! "owning parent -> children, non-owning parent back-link" shape the
//! source design calls for, for free, without any unsafe code.
//!
//! The source design additionally threads an explicit "next sibling"
//! pointer through every element. This port does not store a second,
//! redundant link for that: an element's position in its parent's
//! `children` vector already gives total, stable document-order among
//! siblings, and `find_next` walks forward from a known position instead
//! of following a pointer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// What kind of tag (if any) produced this element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The synthetic document root.
    Root,
    /// A regular `<name ...>` / `<name ... />` element.
    Element,
    /// A `<?...?>` processing instruction.
    ProcessingInstruction,
    /// A `<!...>` declaration (anything starting `<!` that isn't a comment
    /// or CDATA section, e.g. `<!DOCTYPE html>`).
    Doctype,
    /// A `<!-- ... -->` comment.
    Comment,
    /// A `<![CDATA[ ... ]]>` section.
    Cdata,
    /// A synthetic text island created to hold a run of character data.
    Text,
}

/// A single `key` or `key=value` attribute parsed from an element-open
/// tag's attribute text.
///
/// Keys and values own their bytes directly (`Box<[u8]>`) rather than
/// borrowing spans into a shared, in-place-rewritten element buffer (the
/// source design's approach). That alternative is a self-referential
/// struct in Rust terms with no safe, non-arena expression; owning the
/// bytes is the "simpler, one allocation per attribute" option the
/// design notes explicitly sanction.
#[derive(Debug, Clone)]
pub struct Attribute {
    key: Box<[u8]>,
    value: Option<Box<[u8]>>,
}

impl Attribute {
    pub fn new(key: Vec<u8>, value: Option<Vec<u8>>) -> Self {
        Self {
            key: key.into_boxed_slice(),
            value: value.map(Vec::into_boxed_slice),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// ASCII case-insensitive key comparison, as the path query and
    /// `find_attribute` both require.
    pub fn key_eq_ignore_ascii_case(&self, name: &[u8]) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }
}

/// A node in the parsed tree.
///
/// `key` holds the tag name (for `Element`) or the tag's raw inner text
/// (for every other non-`Text`, non-`Root` kind, per §3). `value` holds
/// accumulated character data and is only ever non-empty on `Text` nodes
/// (see DESIGN.md for why tag-originated elements never populate it
/// directly).
pub struct Node {
    pub kind: ElementKind,
    key: RefCell<Vec<u8>>,
    value: RefCell<Vec<u8>>,
    attributes: RefCell<Vec<Attribute>>,
    children: RefCell<Vec<Rc<Node>>>,
    parent: RefCell<Option<Weak<Node>>>,
}

/// A strong, owning handle to a tree node.
pub type NodeRef = Rc<Node>;
/// A non-owning back-link, as stored in `Node::parent`.
pub type WeakNodeRef = Weak<Node>;

impl Node {
    fn new(kind: ElementKind) -> NodeRef {
        Rc::new(Node {
            kind,
            key: RefCell::new(Vec::new()),
            value: RefCell::new(Vec::new()),
            attributes: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(None),
        })
    }

    /// Creates the synthetic document root.
    pub fn new_root() -> NodeRef {
        Node::new(ElementKind::Root)
    }

    pub fn key(&self) -> std::cell::Ref<'_, Vec<u8>> {
        self.key.borrow()
    }

    pub fn set_key(&self, bytes: Vec<u8>) {
        *self.key.borrow_mut() = bytes;
    }

    pub fn value(&self) -> std::cell::Ref<'_, Vec<u8>> {
        self.value.borrow()
    }

    pub fn children(&self) -> std::cell::Ref<'_, Vec<NodeRef>> {
        self.children.borrow()
    }

    pub fn attributes(&self) -> std::cell::Ref<'_, Vec<Attribute>> {
        self.attributes.borrow()
    }

    pub fn set_attributes(&self, attrs: Vec<Attribute>) {
        *self.attributes.borrow_mut() = attrs;
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Looks up the first attribute whose key matches `name`, ASCII
    /// case-insensitively.
    pub fn find_attribute(&self, name: &[u8]) -> Option<Attribute> {
        self.attributes
            .borrow()
            .iter()
            .find(|attr| attr.key_eq_ignore_ascii_case(name))
            .cloned()
    }
}

/// Creates a new child element of `parent` and links it in, returning the
/// new child. Mirrors §4.2's "create element (parent?)", specialized to
/// always have a parent: every element in this tree except the root is
/// created this way.
pub fn create_element(parent: &NodeRef, kind: ElementKind) -> NodeRef {
    let child = Node::new(kind);
    *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
    parent.children.borrow_mut().push(Rc::clone(&child));
    child
}

/// Appends `bytes` as a character-data run under `current`.
///
/// Reuses `current`'s trailing child if it is already a `Text` node
/// (continuing the same run); otherwise creates a fresh synthetic `Text`
/// child. This is the resolved reading of §4.3's content sub-parser (see
/// SPEC_FULL.md and DESIGN.md): tag-originated elements never hold value
/// directly, all character data lives on `Text` children.
pub fn append_text(current: &NodeRef, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let mut children = current.children.borrow_mut();
    if let Some(last) = children.last() {
        if last.kind == ElementKind::Text {
            last.value.borrow_mut().extend_from_slice(bytes);
            return;
        }
    }
    let text = Node::new(ElementKind::Text);
    *text.parent.borrow_mut() = Some(Rc::downgrade(current));
    text.value.borrow_mut().extend_from_slice(bytes);
    children.push(text);
}

/// Releases the entire tree rooted at `root`.
///
/// Ordinary `Drop` already frees every node reachable only through `root`
/// once the last strong reference to it goes away (parent back-links are
/// `Weak` and never keep a subtree alive), so this function's only job is
/// to consume the caller's handle; it exists for interface fidelity with
/// §6's explicit `destroy(root)` entry point.
pub fn destroy(root: NodeRef) {
    drop(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_element_links_parent_and_child() {
        let root = Node::new_root();
        let a = create_element(&root, ElementKind::Element);
        assert_eq!(root.children().len(), 1);
        assert!(Rc::ptr_eq(&a.parent().unwrap(), &root));
    }

    #[test]
    fn append_text_reuses_trailing_text_child() {
        let root = Node::new_root();
        let p = create_element(&root, ElementKind::Element);
        append_text(&p, b"one");
        let br = create_element(&p, ElementKind::Element);
        let _ = br;
        append_text(&p, b"two");
        assert_eq!(p.children().len(), 3);
        assert_eq!(&*p.children()[0].value(), b"one");
        assert_eq!(&*p.children()[2].value(), b"two");
    }

    #[test]
    fn append_text_continues_same_run() {
        let root = Node::new_root();
        append_text(&root, b"ab");
        append_text(&root, b"cd");
        assert_eq!(root.children().len(), 1);
        assert_eq!(&*root.children()[0].value(), b"abcd");
    }

    #[test]
    fn parent_link_does_not_keep_child_alive_after_destroy() {
        let root = Node::new_root();
        let child = create_element(&root, ElementKind::Element);
        let weak_child = Rc::downgrade(&child);
        drop(child);
        destroy(root);
        assert!(weak_child.upgrade().is_none());
    }
}
