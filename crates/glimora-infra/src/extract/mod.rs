//! Attachment text-extraction implementations.

mod pdf;

pub use pdf::PdfTextExtractor;
