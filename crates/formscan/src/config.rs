//! Scanner configuration
//!
//! Which form types are surfaced to the change callback. The rule tables
//! themselves are fixed.

use serde::{Deserialize, Serialize};

use crate::types::FormType;

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Form types that may be autofilled
    pub fill_types: Vec<FormType>,
    /// Form types whose submission may be offered for saving
    pub save_types: Vec<FormType>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fill_types: vec![FormType::Login],
            save_types: vec![FormType::Login, FormType::Register],
        }
    }
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_types(mut self, types: impl IntoIterator<Item = FormType>) -> Self {
        self.fill_types = types.into_iter().collect();
        self
    }

    pub fn with_save_types(mut self, types: impl IntoIterator<Item = FormType>) -> Self {
        self.save_types = types.into_iter().collect();
        self
    }

    pub fn is_fillable(&self, form_type: FormType) -> bool {
        self.fill_types.contains(&form_type)
    }

    pub fn is_savable(&self, form_type: FormType) -> bool {
        self.save_types.contains(&form_type)
    }

    /// Whether forms of this type are reported at all
    pub fn is_relevant(&self, form_type: FormType) -> bool {
        self.is_fillable(form_type) || self.is_savable(form_type)
    }
}
