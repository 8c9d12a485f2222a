//! Cover page generation over WordprocessingML templates.
//!
//! A template DOCX carries `{{Name}}`, `{{Surname}}`, `{{Class}}`, `{{Year}}`
//! and `{{Subject}}` tokens. [`assemble::generate`] produces one substituted
//! copy per subject and delivers either a single merged document with page
//! breaks between subjects or a ZIP archive of per-subject documents.

pub mod assemble;
pub mod document;
pub mod error;
pub mod package;
pub mod sanitize;
pub mod seed;
pub mod substitute;

pub use assemble::{generate, validate, Artifact, OutputMode};
pub use document::DocxDocument;
pub use error::CoverError;
pub use package::TemplateSource;
pub use substitute::StudentData;
