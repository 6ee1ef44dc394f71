//! Drafting subdomain: writer drafts, editor verdicts and the citation
//! integrity check the controller applies between them.

pub mod citations;
pub mod entities;
pub mod verdict_parser;

pub use citations::{CitationCheck, CitationIntegrityError};
pub use entities::{Draft, EditorVerdict, ReviewComment, Revision};
pub use verdict_parser::parse_editor_verdict;
