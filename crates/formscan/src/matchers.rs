//! Matching rules
//!
//! Declarative tables used to classify single elements ([`Matcher`]) and
//! form-like clusters ([`FormMatcher`]). All patterns are case-insensitive.
//!
//! The form table is an ordered list, not a map: the same [`FormType`] may
//! appear several times with different predicates, and earlier entries win.

use std::sync::LazyLock;

use formscan_dom::{DomTree, NodeId};
use regex::{Regex, RegexBuilder};

use crate::types::{FormType, Input, InputType};

/// Rule for a single input element.
#[derive(Debug)]
pub struct Matcher {
    /// Every listed attribute must match its pattern
    pub attributes: Vec<(&'static str, Regex)>,
    /// Must match the value of any attribute on the element
    pub name: Regex,
}

/// Required number of inputs of one type within a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCount {
    /// Every input in the form has this type
    All,
    /// At least one
    Any,
    Exactly(usize),
}

impl FieldCount {
    /// Decode the numeric convention: `-2` all, `-1` any, `n >= 0` exactly `n`
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -2 => Some(Self::All),
            -1 => Some(Self::Any),
            n if n >= 0 => Some(Self::Exactly(n as usize)),
            _ => None,
        }
    }

    fn is_satisfied(self, count: usize, total: usize) -> bool {
        match self {
            Self::All => count == total,
            Self::Any => count > 0,
            Self::Exactly(n) => count == n,
        }
    }
}

/// Rule for a form-like cluster. Absent predicates never match.
#[derive(Debug, Default)]
pub struct FormMatcher {
    /// Matched against the attribute values of the form root
    pub name: Option<Regex>,
    pub attributes: Option<Vec<(&'static str, Regex)>>,
    pub fields: Option<Vec<(InputType, FieldCount)>>,
}

fn pattern(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .expect("built-in pattern must compile")
}

fn matcher(type_pattern: &str, name: &str) -> Matcher {
    Matcher {
        attributes: vec![("type", pattern(type_pattern))],
        name: pattern(name),
    }
}

/// Element rules, in priority order. Retype must precede password, as any
/// password field satisfies the password rule.
pub static INPUT_MATCHERS: LazyLock<Vec<(InputType, Vec<Matcher>)>> = LazyLock::new(|| {
    vec![
        (
            InputType::Username,
            vec![matcher("text|email", "user|name|mail|login|namn|id|session_key")],
        ),
        (
            InputType::PasswordRetype,
            vec![matcher("password", "confirm|register|retype")],
        ),
        (InputType::Password, vec![matcher("password", ".*")]),
        // Shadowed by the password rule, kept so pincode stays a known field
        (InputType::Pincode, vec![matcher("password", ".*")]),
        (InputType::CardNo, vec![matcher("text|tel", "card")]),
        (InputType::Expires, vec![matcher("text|tel", "exp")]),
        (InputType::Cvc, vec![matcher("text|tel", "sec|code|cvv|cvc")]),
        (InputType::Search, vec![matcher("text|search", "search")]),
    ]
});

const REGISTER_NAME: &str = "createaccount|reg|signup";

/// Form rules, in priority order.
pub static FORM_MATCHERS: LazyLock<Vec<(FormType, FormMatcher)>> = LazyLock::new(|| {
    vec![
        (
            FormType::Search,
            FormMatcher {
                name: Some(pattern("search")),
                attributes: Some(vec![("role", pattern("search"))]),
                fields: Some(vec![(InputType::Search, FieldCount::Any)]),
            },
        ),
        (
            FormType::Login,
            FormMatcher {
                name: Some(pattern("signin|sign-in")),
                ..Default::default()
            },
        ),
        (
            FormType::Register,
            FormMatcher {
                name: Some(pattern(REGISTER_NAME)),
                fields: Some(vec![(InputType::Password, FieldCount::Exactly(2))]),
                ..Default::default()
            },
        ),
        (
            FormType::Register,
            FormMatcher {
                name: Some(pattern(REGISTER_NAME)),
                fields: Some(vec![(InputType::PasswordRetype, FieldCount::Any)]),
                ..Default::default()
            },
        ),
        (
            FormType::Login,
            FormMatcher {
                fields: Some(vec![
                    (InputType::Username, FieldCount::Any),
                    (InputType::Password, FieldCount::Exactly(1)),
                ]),
                ..Default::default()
            },
        ),
        (
            FormType::Login,
            FormMatcher {
                fields: Some(vec![
                    (InputType::Username, FieldCount::Any),
                    (InputType::Pincode, FieldCount::Exactly(1)),
                ]),
                ..Default::default()
            },
        ),
        (
            FormType::Newsletter,
            FormMatcher {
                name: Some(pattern("news|letter")),
                ..Default::default()
            },
        ),
        (
            FormType::Menu,
            FormMatcher {
                name: Some(pattern("nav|menu")),
                ..Default::default()
            },
        ),
        (FormType::Unknown, FormMatcher::default()),
    ]
});

/// Check `attributes` against values produced by `lookup`; a missing
/// attribute is matched as the empty string. `None` never matches.
pub fn match_attributes<'a>(
    attributes: Option<&[(&'static str, Regex)]>,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> bool {
    let Some(attributes) = attributes else {
        return false;
    };
    attributes
        .iter()
        .all(|(name, regex)| regex.is_match(lookup(name).unwrap_or("")))
}

/// Check if any attribute value of `element` matches `name`.
pub fn match_name(tree: &DomTree, element: NodeId, name: Option<&Regex>) -> bool {
    let Some(name) = name else {
        return false;
    };
    tree.attributes(element).any(|(_, value)| name.is_match(value))
}

/// Check if the cluster contains the required number of each input type.
/// Counts run over every input, including unknown and hidden ones.
pub fn match_fields(inputs: &[Input], fields: Option<&[(InputType, FieldCount)]>) -> bool {
    let Some(fields) = fields else {
        return false;
    };
    fields.iter().all(|&(input_type, expected)| {
        let count = inputs.iter().filter(|i| i.input_type == input_type).count();
        expected.is_satisfied(count, inputs.len())
    })
}
