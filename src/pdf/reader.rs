//! PDF text extraction over PDFium

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use pdfium_render::prelude::*;
use std::path::Path;

/// Vertical distance within which characters share a line (points)
const Y_TOLERANCE: f32 = 5.0;

/// Column width used when a page reports no glyph widths (points)
const DEFAULT_CHAR_WIDTH: f32 = 5.0;

/// How page text is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// PDFium's own reading-order text
    #[default]
    Plain,
    /// Characters placed on a fixed column grid so table columns stay aligned
    Layout,
}

/// Character information for layout extraction
#[derive(Debug, Clone)]
pub struct CharInfo {
    /// The character
    pub char: char,
    /// X coordinate (left)
    pub x: f32,
    /// Y coordinate (top)
    pub y: f32,
    /// Character width
    pub width: f32,
}

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Reject data without a PDF header before handing it to PDFium
pub fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}

/// Text of every page of one PDF, extracted up front
pub struct PdfReader {
    page_count: u32,
    page_texts: Vec<String>,
}

impl PdfReader {
    /// Open a PDF from a file path
    pub fn open<P: AsRef<Path>>(path: P, password: Option<&str>, mode: TextMode) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::InputNotFound {
                path: path.display().to_string(),
            });
        }

        let data = std::fs::read(path)?;
        Self::open_bytes(&data, password, mode)
    }

    /// Open a PDF from bytes
    pub fn open_bytes(data: &[u8], password: Option<&str>, mode: TextMode) -> Result<Self> {
        check_pdf_header(data)?;

        let pdfium = create_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, password)
            .map_err(Self::map_pdfium_error)?;

        let page_texts = Self::extract_all_page_texts(&document, mode)?;

        Ok(Self {
            page_count: page_texts.len() as u32,
            page_texts,
        })
    }

    fn extract_all_page_texts(document: &PdfDocument, mode: TextMode) -> Result<Vec<String>> {
        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            let text = Self::extract_page_text(&page, mode);
            if text.trim().is_empty() {
                tracing::warn!(page = index + 1, "page has no extractable text");
            }
            texts.push(text);
        }

        Ok(texts)
    }

    fn extract_page_text(page: &PdfPage, mode: TextMode) -> String {
        let text_obj = match page.text() {
            Ok(t) => t,
            Err(_) => return String::new(),
        };

        match mode {
            TextMode::Plain => text_obj.all(),
            TextMode::Layout => layout_text(Self::collect_chars(&text_obj)),
        }
    }

    /// Collect positioned characters from page text
    fn collect_chars(text_obj: &PdfPageText) -> Vec<CharInfo> {
        let mut chars = Vec::new();

        for segment in text_obj.segments().iter() {
            if let Ok(char_iter) = segment.chars() {
                for char_result in char_iter.iter() {
                    if let Some(c) = char_result.unicode_char() {
                        if let Ok(bounds) = char_result.loose_bounds() {
                            chars.push(CharInfo {
                                char: c,
                                x: bounds.left().value,
                                y: bounds.top().value,
                                width: bounds.width().value,
                            });
                        }
                    }
                }
            }
        }

        chars
    }

    /// Map PDFium errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::PasswordRequired
            }
            _ => Error::Pdfium {
                reason: format!("{}", err),
            },
        }
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Text of a specific page (1-indexed)
    pub fn page_text(&self, page_num: u32) -> Result<&str> {
        if page_num < 1 || page_num > self.page_count {
            return Err(Error::PageOutOfBounds {
                page: page_num,
                total: self.page_count,
            });
        }

        Ok(&self.page_texts[(page_num - 1) as usize])
    }

    /// Text of the specified pages, in the order given
    pub fn pages_text(&self, pages: &[u32]) -> Result<Vec<(u32, String)>> {
        pages
            .iter()
            .map(|&page_num| Ok((page_num, self.page_text(page_num)?.to_string())))
            .collect()
    }

    /// Text of all pages in page order
    pub fn all_text(&self) -> Vec<(u32, String)> {
        (1..=self.page_count)
            .zip(self.page_texts.iter().cloned())
            .collect()
    }
}

/// Extract the selected pages of a PDF file, in page order
pub fn extract_text<P: AsRef<Path>>(path: P, config: &ExtractConfig) -> Result<Vec<(u32, String)>> {
    let mode = if config.layout {
        TextMode::Layout
    } else {
        TextMode::Plain
    };
    let reader = PdfReader::open(path, config.password.as_deref(), mode)?;

    match config.pages.as_deref() {
        Some(range) => {
            let pages = parse_page_range(range, reader.page_count())?;
            reader.pages_text(&pages)
        }
        None => Ok(reader.all_text()),
    }
}

/// Place characters on a column grid derived from the average glyph width,
/// so whitespace in the output mirrors horizontal gaps on the page.
pub fn layout_text(mut chars: Vec<CharInfo>) -> String {
    chars.retain(|c| !c.char.is_whitespace());
    if chars.is_empty() {
        return String::new();
    }

    let widths: Vec<f32> = chars
        .iter()
        .filter(|c| c.width > 0.0)
        .map(|c| c.width)
        .collect();
    let column_width = if widths.is_empty() {
        DEFAULT_CHAR_WIDTH
    } else {
        widths.iter().sum::<f32>() / widths.len() as f32
    };
    let origin = chars.iter().map(|c| c.x).fold(f32::MAX, f32::min);

    // Sort by Y descending (top to bottom in PDF coordinates), then X ascending
    chars.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<Vec<CharInfo>> = Vec::new();
    let mut current_line: Vec<CharInfo> = Vec::new();
    let mut current_y: Option<f32> = None;

    for info in chars {
        match current_y {
            Some(cur_y) if (cur_y - info.y).abs() <= Y_TOLERANCE => current_line.push(info),
            _ => {
                if !current_line.is_empty() {
                    lines.push(current_line);
                }
                current_y = Some(info.y);
                current_line = vec![info];
            }
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }

    let mut result = String::new();
    for mut line in lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let mut column = 0usize;
        let mut text = String::new();
        for info in line {
            let target = ((info.x - origin) / column_width).round().max(0.0) as usize;
            while column < target {
                text.push(' ');
                column += 1;
            }
            text.push(info.char);
            column += 1;
        }

        result.push_str(text.trim_end());
        result.push('\n');
    }

    result.trim_end().to_string()
}

/// Join page texts into one document, each page preceded by a
/// `=== PAGE n ===` marker line
pub fn render_marked_pages(pages: &[(u32, String)]) -> String {
    pages
        .iter()
        .map(|(page, text)| format!("\n\n=== PAGE {} ===\n\n{}", page, text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse page range string (e.g., "1-5,10,15-20")
pub fn parse_page_range(range: &str, max_pages: u32) -> Result<Vec<u32>> {
    let mut pages = Vec::new();
    let invalid = || Error::InvalidPageRange {
        range: range.to_string(),
    };

    for part in range.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end.trim().parse().map_err(|_| invalid())?;

            if start < 1 || end > max_pages || start > end {
                return Err(invalid());
            }

            pages.extend(start..=end);
        } else {
            let page: u32 = part.parse().map_err(|_| invalid())?;

            if page < 1 || page > max_pages {
                return Err(invalid());
            }

            pages.push(page);
        }
    }

    // Remove duplicates and sort
    pages.sort();
    pages.dedup();

    Ok(pages)
}
