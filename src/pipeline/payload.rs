//! Request payloads and their wire bodies.
//!
//! [`RequestPayload`] names *what* is being sent; [`WireBody`] is *how* it
//! goes over HTTP. Every payload variant carries exactly one content source,
//! so a body with both a URL and an uploaded path cannot be built.

use crate::brainrot::{BrainRotRequest, BrainRotSource};
use crate::pipeline::input::{upload_file_name, NormalizedUrl};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The request a user action produces.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// A plain document URL.
    Url { url: String },
    /// A canonical arXiv PDF URL.
    Arxiv { url: String },
    /// A PDF previously stored by `/upload_pdf`.
    Upload { pdf_path: String },
    /// Free text, optionally with document content to ground it.
    Text {
        text: String,
        file_content: Option<String>,
    },
    /// Caption phrases over a background video, or over a PDF-derived source.
    BrainRot(BrainRotRequest),
}

impl From<NormalizedUrl> for RequestPayload {
    fn from(n: NormalizedUrl) -> Self {
        if n.is_arxiv {
            RequestPayload::Arxiv { url: n.url }
        } else {
            RequestPayload::Url { url: n.url }
        }
    }
}

/// Body of `/query` and `/generate_podcast`.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_arxiv: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdf_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_content: Option<&'a str>,
}

impl<'a> QueryBody<'a> {
    fn empty() -> Self {
        Self {
            url: None,
            is_arxiv: false,
            pdf_path: None,
            text: None,
            file_content: None,
        }
    }
}

/// Body of `/generate-flashcards` and `/generate-mnemonics`.
#[derive(Debug, Serialize)]
pub struct DerivedBody<'a> {
    pub summary: &'a str,
    pub count: u8,
}

/// A file part in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: &'static str,
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

/// How a payload travels over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub enum WireBody {
    Json(serde_json::Value),
    /// One file plus plain-text fields. The file is read when the request
    /// is sent, not when the body is built.
    Multipart {
        file: FilePart,
        fields: Vec<(&'static str, String)>,
    },
}

impl WireBody {
    /// Multipart body for `/upload_pdf`.
    pub fn pdf_upload(path: &Path) -> Self {
        WireBody::Multipart {
            file: FilePart {
                field: "file",
                path: path.to_path_buf(),
                file_name: upload_file_name(path, "document.pdf"),
                mime: "application/pdf".to_string(),
            },
            fields: Vec::new(),
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, WireBody::Multipart { .. })
    }
}

impl RequestPayload {
    /// Serialise into the body the backend expects for this variant.
    pub fn to_wire(&self) -> Result<WireBody, serde_json::Error> {
        let mut q = QueryBody::empty();
        let value = match self {
            RequestPayload::Url { url } => {
                q.url = Some(url.as_str());
                serde_json::to_value(&q)?
            }
            RequestPayload::Arxiv { url } => {
                q.url = Some(url.as_str());
                q.is_arxiv = true;
                serde_json::to_value(&q)?
            }
            RequestPayload::Upload { pdf_path } => {
                q.pdf_path = Some(pdf_path.as_str());
                serde_json::to_value(&q)?
            }
            RequestPayload::Text { text, file_content } => {
                q.text = Some(text.as_str());
                q.file_content = file_content.as_deref();
                serde_json::to_value(&q)?
            }
            RequestPayload::BrainRot(req) => return brainrot_wire(req),
        };
        Ok(WireBody::Json(value))
    }
}

#[derive(Debug, Serialize)]
struct BrainRotMeta<'a> {
    phrases: &'a [String],
    #[serde(flatten)]
    style: &'a crate::brainrot::BrainRotStyle,
}

#[derive(Debug, Serialize)]
struct BrainRotPdfBody<'a> {
    pdf_url: &'a str,
    #[serde(flatten)]
    style: &'a crate::brainrot::BrainRotStyle,
}

fn brainrot_wire(req: &BrainRotRequest) -> Result<WireBody, serde_json::Error> {
    match req.source() {
        BrainRotSource::Video(video) => {
            let meta = BrainRotMeta {
                phrases: req.phrases(),
                style: req.style(),
            };
            Ok(WireBody::Multipart {
                file: FilePart {
                    field: "video",
                    path: video.path.clone(),
                    file_name: video.file_name.clone(),
                    mime: video.mime.clone(),
                },
                fields: vec![("request", serde_json::to_string(&meta)?)],
            })
        }
        BrainRotSource::PdfUrl(url) => {
            let body = BrainRotPdfBody {
                pdf_url: url,
                style: req.style(),
            };
            Ok(WireBody::Json(serde_json::to_value(&body)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brainrot::{BrainRotStyle, PhraseList, VideoFile};
    use crate::pipeline::input::normalize_url;
    use serde_json::json;

    fn json_of(p: &RequestPayload) -> serde_json::Value {
        match p.to_wire().unwrap() {
            WireBody::Json(v) => v,
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn url_payload_body() {
        let p: RequestPayload = normalize_url("https://example.com/a.pdf").into();
        assert_eq!(json_of(&p), json!({ "url": "https://example.com/a.pdf" }));
    }

    #[test]
    fn arxiv_payload_flags_arxiv() {
        let p: RequestPayload = normalize_url("https://arxiv.org/abs/2301.12345").into();
        assert_eq!(
            json_of(&p),
            json!({ "url": "https://arxiv.org/pdf/2301.12345", "is_arxiv": true })
        );
    }

    #[test]
    fn upload_payload_body() {
        let p = RequestPayload::Upload {
            pdf_path: "uploads/x.pdf".into(),
        };
        assert_eq!(json_of(&p), json!({ "pdf_path": "uploads/x.pdf" }));
    }

    #[test]
    fn text_payload_omits_missing_content() {
        let p = RequestPayload::Text {
            text: "what is attention?".into(),
            file_content: None,
        };
        assert_eq!(json_of(&p), json!({ "text": "what is attention?" }));
    }

    #[test]
    fn brainrot_video_is_multipart_with_request_field() {
        let mut phrases = PhraseList::new();
        phrases.set(0, "hello");
        phrases.push("");
        let video = VideoFile {
            path: "/tmp/bg.mp4".into(),
            file_name: "bg.mp4".into(),
            mime: "video/mp4".into(),
            size: 1024,
        };
        let req = BrainRotRequest::from_video(Some(&video), &phrases, BrainRotStyle::default())
            .unwrap();
        let wire = RequestPayload::BrainRot(req).to_wire().unwrap();
        let WireBody::Multipart { file, fields } = wire else {
            panic!("expected multipart");
        };
        assert_eq!(file.field, "video");
        assert_eq!(file.mime, "video/mp4");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "request");
        let meta: serde_json::Value = serde_json::from_str(&fields[0].1).unwrap();
        assert_eq!(
            meta,
            json!({
                "phrases": ["hello"],
                "text_color": "white",
                "font_size": 50,
                "duration_per_phrase": 2.0,
                "position": "center"
            })
        );
    }

    #[test]
    fn brainrot_pdf_url_is_json() {
        let req = BrainRotRequest::from_pdf_url("https://arxiv.org/pdf/2301.12345", BrainRotStyle::default());
        let v = json_of(&RequestPayload::BrainRot(req));
        assert_eq!(v["pdf_url"], "https://arxiv.org/pdf/2301.12345");
        assert_eq!(v["font_size"], 50);
    }

    #[test]
    fn pdf_upload_body() {
        let body = WireBody::pdf_upload(Path::new("/papers/attention.pdf"));
        assert!(body.is_multipart());
        let WireBody::Multipart { file, fields } = body else {
            unreachable!()
        };
        assert_eq!(file.field, "file");
        assert_eq!(file.file_name, "attention.pdf");
        assert!(fields.is_empty());
    }
}
