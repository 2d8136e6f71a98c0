//! formscan
//!
//! Finds login and registration forms in arbitrary pages so an autofill
//! layer can act on them. Pages give no reliable hints, so structure is
//! inferred:
//!
//! 1. [`inputs::classify`] assigns an [`InputType`] to every `input`,
//!    `button` and `a` below a root.
//! 2. [`forms::group`] clusters inputs under their common ancestors.
//! 3. [`forms::classify`] gives each cluster a [`FormType`], and
//!    [`forms::get_forms`] keeps the most specific, non-overlapping ones.
//! 4. [`Scanner`] keeps the result current as the page mutates.
//!
//! # Example
//! ```rust,ignore
//! use formscan::{Scanner, ScannerConfig};
//!
//! let mut doc = formscan_html::parse(html)?;
//! let mut scanner = Scanner::start(&mut doc, ScannerConfig::default(), |forms| {
//!     println!("{} forms", forms.len());
//! });
//! // ... page scripts mutate `doc` ...
//! scanner.poll(&mut doc);
//! scanner.stop(&mut doc);
//! ```

pub mod config;
pub mod error;
pub mod forms;
pub mod inputs;
pub mod matchers;
pub mod scanner;
pub mod types;

use std::path::Path;

pub use config::ScannerConfig;
pub use error::{ScanError, ScanResult};
pub use scanner::Scanner;
pub use types::{Form, FormType, Input, InputType};

// Re-export the DOM crates for hosts
pub use formscan_dom as dom;
pub use formscan_html as html;

use formscan_dom::Document;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full, unfiltered scan of a document body
pub fn scan_document(doc: &Document) -> Vec<Form> {
    let root = if doc.body().is_valid() {
        doc.body()
    } else {
        doc.tree().root()
    };
    forms::scan(doc.tree(), root)
}

/// Parse an HTML file and scan it
pub fn scan_file(path: &Path) -> ScanResult<(Document, Vec<Form>)> {
    let html = std::fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let url = format!("file://{}", path.display());
    let doc = formscan_html::HtmlParser::new().parse_with_url(&html, &url)?;
    let forms = scan_document(&doc);
    Ok((doc, forms))
}
