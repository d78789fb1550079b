//! Document decoder module
//!
//! Turns a list-page payload into document wrappers. A payload whose envelope
//! cannot be read fails as a whole; a single document body that does not fit
//! the requested type only fails that document.

mod decoders;
mod types;

pub use decoders::{decode_documents, JsonDocumentDecoder};
pub use types::{DocumentDecoder, DocumentList, RawDocument};
