//! Document loading with per-page provenance

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::DocumentFormat;

/// One contiguous piece of extracted text with its provenance
#[derive(Debug, Clone)]
pub struct Segment {
    /// Page number (1-indexed) for paginated formats
    pub page: Option<u32>,
    /// Extracted text
    pub text: String,
}

/// A document read from disk and converted to text segments
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Filename component of the source path
    pub filename: String,
    /// Detected format
    pub format: DocumentFormat,
    /// Ordered text segments in document traversal order
    pub segments: Vec<Segment>,
    /// Total page count (paginated formats only)
    pub total_pages: Option<u32>,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// File size in bytes
    pub file_size: u64,
}

/// Reads source documents and converts them to text segments
///
/// Plain text and Markdown files become a single segment; PDFs yield one
/// segment per page. Pages without extractable text are kept as empty
/// segments so page numbers stay aligned with the source document.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a document, detecting the format from the file extension
    pub fn load(path: &Path) -> Result<LoadedDocument> {
        let format = Self::detect_format(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path)?;

        let segments = match format {
            DocumentFormat::Pdf => Self::extract_pdf(&filename, &data)?,
            DocumentFormat::Txt | DocumentFormat::Markdown => Self::extract_text(&data),
        };

        let total_pages = match format {
            DocumentFormat::Pdf => Some(segments.len() as u32),
            _ => None,
        };

        let mut hasher = Sha256::new();
        for segment in &segments {
            hasher.update(segment.text.as_bytes());
        }
        let content_hash = format!("{:x}", hasher.finalize());

        Ok(LoadedDocument {
            filename,
            format,
            segments,
            total_pages,
            content_hash,
            file_size: data.len() as u64,
        })
    }

    /// Resolve the document format from the path's extension
    fn detect_format(path: &Path) -> Result<DocumentFormat> {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_lowercase();
                DocumentFormat::from_extension(&ext)
                    .ok_or_else(|| Error::unsupported_format(format!(".{ext}")))
            }
            None => Err(Error::unsupported_format("(none)")),
        }
    }

    /// Extract PDF text page by page
    fn extract_pdf(filename: &str, data: &[u8]) -> Result<Vec<Segment>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| Error::file_parse(filename, format!("PDF text extraction failed: {e}")))?;

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| Segment {
                page: Some(i as u32 + 1),
                text: text.replace('\0', "").trim().to_string(),
            })
            .collect())
    }

    /// Treat the whole file as one UTF-8 text segment
    fn extract_text(data: &[u8]) -> Vec<Segment> {
        vec![Segment {
            page: None,
            text: String::from_utf8_lossy(data).to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_file_single_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Hello, world.\n\nSecond paragraph.").unwrap();

        let loaded = DocumentLoader::load(&path).unwrap();
        assert_eq!(loaded.filename, "notes.txt");
        assert_eq!(loaded.format, DocumentFormat::Txt);
        assert_eq!(loaded.segments.len(), 1);
        assert_eq!(loaded.segments[0].page, None);
        assert!(loaded.segments[0].text.contains("Second paragraph."));
        assert_eq!(loaded.total_pages, None);
        assert!(!loaded.content_hash.is_empty());
    }

    #[test]
    fn test_markdown_loaded_as_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.md");
        std::fs::write(&path, "# Heading\n\nBody text.").unwrap();

        let loaded = DocumentLoader::load(&path).unwrap();
        assert_eq!(loaded.format, DocumentFormat::Markdown);
        assert_eq!(loaded.segments.len(), 1);
        assert!(loaded.segments[0].text.contains("# Heading"));
    }

    #[test]
    fn test_docx_rejected_with_extension() {
        let err = DocumentLoader::load(Path::new("report.docx")).unwrap_err();
        match err {
            Error::UnsupportedFormat(ext) => assert_eq!(ext, ".docx"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_extension_rejected() {
        let err = DocumentLoader::load(Path::new("report")).unwrap_err();
        match err {
            Error::UnsupportedFormat(ext) => assert_eq!(ext, "(none)"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UPPER.TXT");
        std::fs::write(&path, "upper case extension").unwrap();

        let loaded = DocumentLoader::load(&path).unwrap();
        assert_eq!(loaded.format, DocumentFormat::Txt);
    }

    #[test]
    fn test_invalid_pdf_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a valid pdf").unwrap();

        let err = DocumentLoader::load(&path).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }
}
