//! Path query engine, exercised through the public API.

#[test]
fn case_insensitive_element_names() {
    let root = skimxml::parse("<Root><Item/></Root>").unwrap();
    assert!(skimxml::find(&root, b"root/item").is_some());
    assert!(skimxml::find(&root, b"ROOT/ITEM").is_some());
}

#[test]
fn attribute_predicates_are_exact_case() {
    let root = skimxml::parse(r#"<r><x K="v"/></r>"#).unwrap();
    assert!(skimxml::find(&root, b"r/x?k=v").is_none());
    assert!(skimxml::find(&root, b"r/x?K=v").is_some());
}

#[test]
fn valueless_predicate_requires_only_presence() {
    let root = skimxml::parse(r#"<r><x a="1"/><y/></r>"#).unwrap();
    assert!(skimxml::find(&root, b"r/x?a").is_some());
    assert!(skimxml::find(&root, b"r/y?a").is_none());
}

#[test]
fn multiple_predicates_are_all_required() {
    let root = skimxml::parse(r#"<r><x a="1" b="2"/><x a="1"/></r>"#).unwrap();
    let found = skimxml::find(&root, b"r/x?a=1&b=2").unwrap();
    assert_eq!(
        skimxml::find_attribute(&found, b"b").unwrap().value(),
        Some(&b"2"[..])
    );
}

#[test]
fn find_next_enumerates_matching_siblings_in_document_order() {
    let root = skimxml::parse(r#"<r><x k="1"/><x k="2"/><x k="3"/></r>"#).unwrap();
    let first = skimxml::find(&root, b"r/x").unwrap();
    let second = skimxml::find_next(&first, Some(b"r/x")).unwrap();
    let third = skimxml::find_next(&second, Some(b"r/x")).unwrap();
    assert_eq!(
        skimxml::find_attribute(&second, b"k").unwrap().value(),
        Some(&b"2"[..])
    );
    assert_eq!(
        skimxml::find_attribute(&third, b"k").unwrap().value(),
        Some(&b"3"[..])
    );
    assert!(skimxml::find_next(&third, Some(b"r/x")).is_none());
}

#[test]
fn find_next_crosses_into_a_later_subtree() {
    let root = skimxml::parse("<r><a><x/></a><b><x/></b></r>").unwrap();
    let first = skimxml::find(&root, b"r/a/x").unwrap();
    let next = skimxml::find_next(&first, Some(b"x")).unwrap();
    assert_eq!(&*next.key(), b"x");
    assert!(std::rc::Rc::ptr_eq(&next, &root.children()[1].children()[0]));
}

#[test]
fn missing_path_returns_none() {
    let root = skimxml::parse("<a/>").unwrap();
    assert!(skimxml::find(&root, b"a/nonexistent").is_none());
}
