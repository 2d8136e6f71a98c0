//! Input classification
//!
//! Finds the interactive elements below a scan root and assigns each one
//! an [`InputType`]. Pure function of the current tree state.

use std::sync::LazyLock;

use formscan_dom::{DomTree, NodeId};
use regex::{Regex, RegexBuilder};

use crate::matchers::{match_attributes, match_name, Matcher, INPUT_MATCHERS};
use crate::types::{Input, InputType};

/// Tags considered by the scan. `select` and `textarea` are left out on
/// purpose: they never carry credentials.
pub const INPUT_SELECTORS: [&str; 3] = ["input", "button", "a"];

/// `<input type>` keywords recognised by HTML; anything else is `text`.
const INPUT_TYPES: [&str; 22] = [
    "hidden", "text", "search", "tel", "url", "email", "password", "date", "month", "week",
    "time", "datetime-local", "number", "range", "color", "checkbox", "radio", "file",
    "submit", "image", "reset", "button",
];

static SUBMIT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("submit|image")
        .case_insensitive(true)
        .build()
        .expect("built-in pattern must compile")
});

// English-only; non-English pages fall back to definite submits
static MAYBE_SUBMIT: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("login|sign|submit")
        .case_insensitive(true)
        .build()
        .expect("built-in pattern must compile")
});

/// Whether the element itself is one of [`INPUT_SELECTORS`]
pub fn is_candidate(tree: &DomTree, node: NodeId) -> bool {
    tree.tag_name(node)
        .is_some_and(|tag| INPUT_SELECTORS.contains(&tag))
}

/// Whether the node or anything below it is a candidate element
pub fn has_candidates(tree: &DomTree, node: NodeId) -> bool {
    is_candidate(tree, node) || tree.descendants(node).any(|n| is_candidate(tree, n))
}

/// Effective `type` of an `<input>`, lowercase, `text` when missing or invalid
fn input_type_of(tree: &DomTree, element: NodeId) -> &'static str {
    tree.get_attribute(element, "type")
        .and_then(|ty| {
            INPUT_TYPES
                .iter()
                .find(|known| known.eq_ignore_ascii_case(ty.trim()))
                .copied()
        })
        .unwrap_or("text")
}

/// Effective `type` of a `<button>`, `submit` when missing or invalid
fn button_type_of(tree: &DomTree, element: NodeId) -> &'static str {
    match tree.get_attribute(element, "type").map(str::trim) {
        Some(ty) if ty.eq_ignore_ascii_case("button") => "button",
        Some(ty) if ty.eq_ignore_ascii_case("reset") => "reset",
        _ => "submit",
    }
}

/// Test the start tag and text of an element for submit wording, for
/// elements whose type alone doesn't make them a submit.
fn is_maybe_submit(tree: &DomTree, element: NodeId) -> bool {
    let mut haystack = tree.opening_tag(element);
    haystack.push_str(&tree.text_content(element));
    MAYBE_SUBMIT.is_match(&haystack)
}

/// Matchers see the raw attributes: an `<input>` without `type` matches
/// its `type` pattern against the empty string, not the `text` default.
fn is_match(tree: &DomTree, element: NodeId, matcher: &Matcher) -> bool {
    match_name(tree, element, Some(&matcher.name))
        && match_attributes(Some(matcher.attributes.as_slice()), |name| {
            tree.get_attribute(element, name)
        })
}

/// Determine the role of a single candidate element.
pub fn element_type(tree: &DomTree, element: NodeId) -> InputType {
    match tree.tag_name(element) {
        Some("button") => match button_type_of(tree, element) {
            "submit" => InputType::Submit,
            "button" if is_maybe_submit(tree, element) => InputType::MaybeSubmit,
            _ => InputType::Discard,
        },
        // Links are sometimes styled as submit buttons
        Some("a") => {
            if is_maybe_submit(tree, element) {
                InputType::MaybeSubmit
            } else {
                InputType::Discard
            }
        }
        Some("input") => {
            let ty = input_type_of(tree, element);
            if SUBMIT_TYPE.is_match(ty) {
                return InputType::Submit;
            }
            if ty == "hidden" {
                return InputType::Hidden;
            }
            INPUT_MATCHERS
                .iter()
                .find(|(_, matchers)| matchers.iter().any(|m| is_match(tree, element, m)))
                .map_or(InputType::Unknown, |(input_type, _)| *input_type)
        }
        _ => InputType::Unknown,
    }
}

/// Classify every candidate below `root` in document order, dropping
/// discarded elements. A detached root yields nothing.
pub fn classify(tree: &DomTree, root: NodeId) -> Vec<Input> {
    if !tree.is_connected(root) {
        tracing::trace!("Scan root {} is detached, skipping", root);
        return Vec::new();
    }

    tree.descendants(root)
        .filter(|&node| is_candidate(tree, node))
        .filter_map(|node| {
            let input_type = element_type(tree, node);
            tracing::trace!("{} <{}> => {}", node, tree.tag_name(node).unwrap_or(""), input_type);
            (input_type != InputType::Discard).then(|| Input::new(node, input_type))
        })
        .collect()
}
