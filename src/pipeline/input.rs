//! Input normalisation: turn what the user typed or picked into a source
//! the backend can locate.
//!
//! URLs are passed through untouched except for arXiv abstract and PDF
//! links, which are rewritten to the canonical `https://arxiv.org/pdf/<id>`
//! form so the backend always downloads the PDF rather than the HTML
//! abstract page. Local files are checked for the `%PDF` magic bytes before
//! upload so a mistyped path fails here instead of on the server.
//!
//! Nothing in this module touches the network.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static RE_ARXIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?arxiv\.org/(?:abs|pdf)/(\d{4}\.\d{4,5}(?:v\d+)?)(?:\.pdf)?$")
        .unwrap()
});

/// A content source for summary and podcast requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote document; already normalised.
    Url(NormalizedUrl),
    /// Local PDF that must be uploaded first.
    PdfFile(PathBuf),
}

/// A URL after arXiv canonicalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub url: String,
    /// True when the input was recognised as an arXiv abstract or PDF link.
    pub is_arxiv: bool,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Extract the arXiv identifier from an abstract or PDF URL.
pub fn arxiv_id(url: &str) -> Option<&str> {
    RE_ARXIV
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Canonicalise arXiv links to `https://arxiv.org/pdf/<id>`; leave every
/// other URL unchanged.
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    let raw = raw.trim();
    match arxiv_id(raw) {
        Some(id) => {
            let url = format!("https://arxiv.org/pdf/{id}");
            debug!("arXiv link {raw} -> {url}");
            NormalizedUrl {
                url,
                is_arxiv: true,
            }
        }
        None => NormalizedUrl {
            url: raw.to_string(),
            is_arxiv: false,
        },
    }
}

/// Resolve raw user input into a [`Source`].
///
/// `http://` / `https://` strings are treated as URLs, anything else as a
/// path to a local PDF.
pub fn resolve_source(input: &str) -> Result<Source, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if is_url(trimmed) {
        Ok(Source::Url(normalize_url(trimmed)))
    } else {
        check_pdf(Path::new(trimmed)).map(Source::PdfFile)
    }
}

/// Validate a local PDF: exists, readable, `%PDF` magic bytes.
pub fn check_pdf(path: &Path) -> Result<PathBuf, ValidationError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(ValidationError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(f) => {
            use std::io::Read;
            let mut head = Vec::with_capacity(4);
            let read = f.take(4).read_to_end(&mut head);
            if read.is_err() || head != b"%PDF" {
                let mut magic = [0u8; 4];
                magic[..head.len()].copy_from_slice(&head);
                return Err(ValidationError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ValidationError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ValidationError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// File name to report to the backend for an upload.
pub fn upload_file_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn arxiv_abs_becomes_pdf() {
        let n = normalize_url("https://arxiv.org/abs/2301.12345");
        assert_eq!(n.url, "https://arxiv.org/pdf/2301.12345");
        assert!(n.is_arxiv);
    }

    #[test]
    fn arxiv_variants_canonicalise() {
        for raw in [
            "http://arxiv.org/abs/2301.12345",
            "https://www.arxiv.org/abs/2301.12345",
            "https://arxiv.org/pdf/2301.12345",
            "https://arxiv.org/pdf/2301.12345.pdf",
            "http://www.arxiv.org/pdf/2301.12345.pdf",
        ] {
            assert_eq!(
                normalize_url(raw).url,
                "https://arxiv.org/pdf/2301.12345",
                "input: {raw}"
            );
        }
    }

    #[test]
    fn arxiv_five_digit_and_version() {
        assert_eq!(
            normalize_url("https://arxiv.org/abs/1706.03762v7").url,
            "https://arxiv.org/pdf/1706.03762v7"
        );
        assert_eq!(
            normalize_url("https://arxiv.org/abs/2401.00001").url,
            "https://arxiv.org/pdf/2401.00001"
        );
    }

    #[test]
    fn non_arxiv_urls_are_identity() {
        for raw in [
            "https://example.com/paper.pdf",
            "https://arxiv.org/list/cs.AI/recent",
            "https://arxiv.org/abs/2301.12345/extra",
            "https://notarxiv.org/abs/2301.12345",
            "ftp://arxiv.org/abs/2301.12345",
        ] {
            let n = normalize_url(raw);
            assert_eq!(n.url, raw);
            assert!(!n.is_arxiv);
        }
    }

    #[test]
    fn resolve_empty_is_rejected() {
        assert_eq!(resolve_source("   "), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn resolve_url_normalises() {
        let s = resolve_source(" https://arxiv.org/abs/2301.12345 ").unwrap();
        match s {
            Source::Url(n) => assert_eq!(n.url, "https://arxiv.org/pdf/2301.12345"),
            other => panic!("expected URL, got {other:?}"),
        }
    }

    #[test]
    fn resolve_missing_file() {
        let err = resolve_source("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, ValidationError::FileNotFound { .. }));
    }

    #[test]
    fn resolve_non_pdf_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello world").unwrap();
        let err = resolve_source(tmp.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ValidationError::NotAPdf { magic, .. } if &magic == b"hell"));
    }

    #[test]
    fn resolve_real_pdf_header() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n%...").unwrap();
        let s = resolve_source(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(s, Source::PdfFile(tmp.path().to_path_buf()));
    }

    #[test]
    fn resolve_short_file_is_not_a_pdf() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%P").unwrap();
        let err = resolve_source(tmp.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ValidationError::NotAPdf { magic, .. } if &magic == b"%P\0\0"));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            resolve_source(empty.path().to_str().unwrap()),
            Err(ValidationError::NotAPdf { .. })
        ));
    }

    #[test]
    fn normalize_trims_every_url() {
        let n = normalize_url("  https://example.com/paper.pdf \n");
        assert_eq!(n.url, "https://example.com/paper.pdf");
        assert!(!n.is_arxiv);
        let n = normalize_url(" https://arxiv.org/abs/2301.12345 ");
        assert_eq!(n.url, "https://arxiv.org/pdf/2301.12345");
    }

    #[test]
    fn upload_name_falls_back() {
        assert_eq!(upload_file_name(Path::new("/a/b/paper.pdf"), "x.pdf"), "paper.pdf");
        assert_eq!(upload_file_name(Path::new("/"), "x.pdf"), "x.pdf");
    }
}
