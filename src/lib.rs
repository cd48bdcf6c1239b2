//! # flexdex
//!
//! A flexible back-of-document index generator for markup documents.
//!
//! Authors sprinkle index term markers through a document and place one
//! render marker where the compiled index should appear:
//!
//! ```text
//! The poodle <!-- ix main <Animals,Dog,Poodle> --> is a show dog.
//! ...
//! <!-- ixhere main <style=simple-grouped,cols=2lc.1> -->
//! ```
//!
//! Processing makes two passes: the first collects every term marker into
//! named indices of hierarchical terms and their targets; the second copies
//! the document through, replacing term markers with anchor markup and each
//! render marker with a sorted, optionally multi-column index rendered
//! through data-driven style templates for the chosen backend (XHTML or
//! DocBook).
//!
//! ## Quick start
//!
//! ```
//! use flexdex::{Backend, process_document};
//!
//! let doc = "\
//! A fruit <!-- ix main <Fruit,Apple> --> here.
//! <!-- ixhere main <> -->
//! ";
//! let (output, diagnostics) = process_document(doc, Backend::Xhtml11, &[]);
//! assert!(output.contains("<a href=\"#ix1\">Apple</a>"));
//! assert_eq!(diagnostics.warnings().count(), 0);
//! ```
//!
//! Recoverable problems (unknown styles, unresolved template placeholders,
//! malformed column specs) never abort processing; they collect as
//! diagnostics while the rest of the document still renders.

pub mod attr;
pub mod columns;
pub mod diag;
pub mod entries;
pub mod error;
pub mod index;
pub mod render;
pub mod scan;
pub mod settings;
pub mod style;
pub mod template;

pub use attr::{AttrMap, parse_attr_list};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use index::{Index, IndexSet, Term};
pub use scan::Processor;
pub use settings::Settings;
pub use style::{BUILTIN_CONFIG, Backend, Style, StyleTable};
pub use template::Template;

/// Process a whole document in one call.
///
/// Built-in style definitions load first, then each text in `configs`
/// layers on top in order. Returns the output document and the collected
/// diagnostics.
pub fn process_document(
    input: &str,
    backend: Backend,
    configs: &[&str],
) -> (String, Diagnostics) {
    let mut diag = Diagnostics::new();
    let mut settings = Settings::new();
    settings.parse_str(BUILTIN_CONFIG, &mut diag);
    for config in configs {
        settings.parse_str(config, &mut diag);
    }
    let processor = Processor::from_settings(backend, &settings);
    let output = processor.process(input, &mut diag);
    (output, diag)
}
