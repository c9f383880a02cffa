//! Document text extraction backends

mod pdf;

pub use pdf::PdfTextExtractor;
