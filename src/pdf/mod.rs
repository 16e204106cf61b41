//! PDF text extraction layer
//!
//! Turns a PDF into page texts using PDFium, and joins them into the
//! page-marked text file the parsers consume.

mod reader;

pub use reader::{
    check_pdf_header, extract_text, layout_text, parse_page_range, render_marked_pages, CharInfo,
    PdfReader, TextMode,
};
