//! Input and form roles
//!
//! Closed tag sets produced by the classifiers, plus the classified values
//! handed to callers.

use std::fmt;

use formscan_dom::NodeId;
use serde::{Deserialize, Serialize};

/// Semantic role of an interactive element.
///
/// The first six variants line up with vault template fields. The rest
/// drive filtering and form classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Username,
    Password,
    Pincode,
    CardNo,
    Expires,
    Cvc,

    Hidden,
    Unknown,
    Search,
    Submit,
    Reset,
    /// Speculative submit, found by text heuristics
    #[serde(rename = "maybe_submit")]
    MaybeSubmit,
    /// False positive, never surfaced
    Discard,

    /// Filled as `password`; see [`InputType::field_name`]
    #[serde(rename = "password.retype")]
    PasswordRetype,
}

impl InputType {
    /// Input types that map onto a fillable vault field
    pub const FILL_TYPES: [InputType; 7] = [
        InputType::Username,
        InputType::Password,
        InputType::Pincode,
        InputType::CardNo,
        InputType::Expires,
        InputType::Cvc,
        InputType::PasswordRetype,
    ];

    /// Wire name, e.g. `"password.retype"`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Pincode => "pincode",
            Self::CardNo => "cardno",
            Self::Expires => "expires",
            Self::Cvc => "cvc",
            Self::Hidden => "hidden",
            Self::Unknown => "unknown",
            Self::Search => "search",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::MaybeSubmit => "maybe_submit",
            Self::Discard => "discard",
            Self::PasswordRetype => "password.retype",
        }
    }

    /// Canonical field to fill: the part of the wire name before the first `.`
    pub fn field_name(self) -> &'static str {
        let name = self.as_str();
        name.split_once('.').map_or(name, |(field, _)| field)
    }

    /// Whether inputs of this type receive vault data
    pub fn is_fillable(self) -> bool {
        Self::FILL_TYPES.contains(&self)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purpose of a form-like cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    Login,
    Card,
    Search,
    #[serde(rename = "Contactinfo")]
    ContactInfo,
    Newsletter,
    Register,
    Menu,
    Hidden,
    Incomplete,
    Unknown,
}

impl FormType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Card => "Card",
            Self::Search => "Search",
            Self::ContactInfo => "Contactinfo",
            Self::Newsletter => "Newsletter",
            Self::Register => "Register",
            Self::Menu => "Menu",
            Self::Hidden => "Hidden",
            Self::Incomplete => "Incomplete",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified element. `element` is a handle into the live tree, only
/// meaningful while the node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    pub element: NodeId,
    pub input_type: InputType,
}

impl Input {
    pub fn new(element: NodeId, input_type: InputType) -> Self {
        Self { element, input_type }
    }
}

/// A cluster of inputs under a common root. Every input is a descendant
/// of `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub root: NodeId,
    pub form_type: FormType,
    pub inputs: Vec<Input>,
}

impl Form {
    pub fn new(root: NodeId, form_type: FormType, inputs: Vec<Input>) -> Self {
        Self { root, form_type, inputs }
    }

    /// Inputs that receive vault data, in form order
    pub fn fill_inputs(&self) -> impl Iterator<Item = &Input> {
        self.inputs.iter().filter(|input| input.input_type.is_fillable())
    }

    /// First input of the given type
    pub fn find(&self, input_type: InputType) -> Option<&Input> {
        self.inputs.iter().find(|input| input.input_type == input_type)
    }
}
