//! Edge case tests for formscan-html
//!
//! Malformed markup and the shapes of form markup found in the wild.

use formscan_html::{parse, HtmlParser};

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \t\n\r\n   ").unwrap();
    assert!(doc.body().is_valid());
    assert_eq!(doc.tree().children(doc.body()).count(), 0);
}

#[test]
fn test_parse_only_doctype() {
    let doc = parse("<!DOCTYPE html>").unwrap();
    assert!(doc.document_element().is_valid());
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<form><div><input name=user type=text>").unwrap();
    let input = doc
        .tree()
        .descendants(doc.body())
        .find(|&id| doc.tree().tag_name(id) == Some("input"))
        .unwrap();
    assert_eq!(doc.tree().get_attribute(input, "name"), Some("user"));
}

#[test]
fn test_parse_uppercase_names_are_lowered() {
    let doc = parse("<FORM ID=Login><INPUT TYPE=Password></FORM>").unwrap();
    let form = doc.get_element_by_id("Login").unwrap();
    assert_eq!(doc.tree().tag_name(form), Some("form"));
    let input = doc.tree().children(form).next().unwrap();
    // Attribute values keep their case
    assert_eq!(doc.tree().get_attribute(input, "type"), Some("Password"));
}

// ============================================================================
// FORM MARKUP
// ============================================================================

#[test]
fn test_nested_form_is_dropped_by_html5() {
    // The HTML5 tree builder ignores a <form> start tag inside another form
    let doc = parse("<form id=a><form id=b><input></form></form>").unwrap();
    assert!(doc.get_element_by_id("a").is_some());
    assert!(doc.get_element_by_id("b").is_none());
}

#[test]
fn test_button_text_is_preserved() {
    let doc = parse("<div><button type=button>  Sign in </button></div>").unwrap();
    let button = doc
        .tree()
        .descendants(doc.body())
        .find(|&id| doc.tree().tag_name(id) == Some("button"))
        .unwrap();
    assert_eq!(doc.tree().text_content(button).trim(), "Sign in");
}

#[test]
fn test_fragment_of_many_roots() {
    let parser = HtmlParser::new();
    let mut doc = parser.parse("<body></body>").unwrap();
    let nodes = parser
        .parse_fragment(&mut doc, "<input><input><a href=/x>login</a>")
        .unwrap();
    assert_eq!(nodes.len(), 3);
    let body = doc.body();
    for node in &nodes {
        doc.append_child(body, *node).unwrap();
    }
    assert_eq!(doc.tree().children(body).count(), 3);
}

#[test]
fn test_parse_with_url() {
    let doc = HtmlParser::new()
        .parse_with_url("<p>hi</p>", "https://example.com/")
        .unwrap();
    assert_eq!(doc.url(), "https://example.com/");
}
