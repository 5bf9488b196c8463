//! Multipart form bodies: boundary tokens, file attachments and part
//! serialization.
//!
//! Part builders emit opening delimiters only; the single closing
//! `--{boundary}--` marker is appended by the assembler after all field and
//! file parts, so it appears exactly once per body.

use std::fmt;

use uuid::Uuid;

use crate::params::ParamValue;

/// Delimiter token for one multipart body.
///
/// Generated fresh for every assembled multipart/upload request and never
/// reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// Generates a unique boundary.
    pub fn generate() -> Self {
        Self(format!("Boundary-{}", Uuid::new_v4()))
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file posted as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    filename: String,
    bytes: Vec<u8>,
}

impl FileAttachment {
    /// Creates an attachment from a filename and raw content bytes.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// The filename sent in the part's `Content-Disposition`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The raw content bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content type inferred from the payload's first byte.
    ///
    /// A deliberately crude single-byte sniff kept for wire compatibility;
    /// unmatched payloads fall back to `application/octet-stream`.
    pub fn mime_type(&self) -> &'static str {
        match self.bytes.first() {
            Some(0xFF) => "image/jpeg",
            Some(0x89) => "image/png",
            Some(0x47) => "image/gif",
            Some(0x49) | Some(0x4D) => "image/tiff",
            Some(0x25) => "application/pdf",
            Some(0xD0) => "application/vnd",
            Some(0x46) => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

/// A set of files posted under one form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    field: String,
    files: Vec<FileAttachment>,
}

impl FileSet {
    /// Creates a file set keyed by `field`.
    pub fn new(field: impl Into<String>, files: Vec<FileAttachment>) -> Self {
        Self {
            field: field.into(),
            files,
        }
    }

    /// The form field name shared by every file in the set.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The attached files.
    pub fn files(&self) -> &[FileAttachment] {
        &self.files
    }

    /// Serializes the files as multipart parts, without a closing marker.
    ///
    /// An empty set produces no output, distinguishing "no files" from an
    /// empty part sequence.
    pub(crate) fn file_parts(&self, boundary: &Boundary) -> Option<Vec<u8>> {
        if self.files.is_empty() {
            return None;
        }
        let mut body = Vec::new();
        for file in &self.files {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    self.field,
                    file.filename()
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime_type()).as_bytes());
            body.extend_from_slice(file.bytes());
            body.extend_from_slice(b"\r\n");
        }
        Some(body)
    }
}

/// Serializes flat key/value pairs as multipart field parts.
///
/// Returns `None` for an empty pair list so "no data" never turns into an
/// empty body.
pub(crate) fn field_parts(pairs: &[(String, ParamValue)], boundary: &Boundary) -> Option<Vec<u8>> {
    if pairs.is_empty() {
        return None;
    }
    let mut body = Vec::new();
    for (key, value) in pairs {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{key}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(format!("{value}\r\n").as_bytes());
    }
    Some(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::params::ParamBag;

    fn fixed_boundary() -> Boundary {
        Boundary("Boundary-test".into())
    }

    #[test]
    fn boundaries_are_unique() {
        assert_ne!(Boundary::generate(), Boundary::generate());
        assert!(Boundary::generate().as_str().starts_with("Boundary-"));
    }

    #[test]
    fn field_part_layout() {
        let pairs = ParamBag::from_tree(json!({"name": "dp"})).form_pairs();
        let body = field_parts(&pairs, &fixed_boundary()).unwrap();
        assert_eq!(
            body,
            b"--Boundary-test\r\n\
              Content-Disposition: form-data; name=\"name\"\r\n\r\n\
              dp\r\n"
                .to_vec()
        );
    }

    #[test]
    fn empty_pairs_produce_no_body() {
        assert_eq!(field_parts(&[], &fixed_boundary()), None);
        assert_eq!(FileSet::new("file", vec![]).file_parts(&fixed_boundary()), None);
    }

    #[test]
    fn list_fields_render_in_their_json_form() {
        let pairs = ParamBag::from_tree(json!({"ids": [1, 2]})).form_pairs();
        let body = field_parts(&pairs, &fixed_boundary()).unwrap();
        assert!(String::from_utf8(body).unwrap().contains("[1,2]\r\n"));
    }

    #[test]
    fn file_part_carries_sniffed_content_type() {
        let files = FileSet::new(
            "attachments",
            vec![FileAttachment::new("pic.png", vec![0x89, 0x50, 0x4E, 0x47])],
        );
        let body = files.file_parts(&fixed_boundary()).unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--Boundary-test\r\n"));
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"attachments\"; filename=\"pic.png\"\r\n"
        ));
        assert!(text.contains("Content-Type: image/png\r\n\r\n"));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn mime_sniff_table() {
        let cases: &[(u8, &str)] = &[
            (0xFF, "image/jpeg"),
            (0x89, "image/png"),
            (0x47, "image/gif"),
            (0x49, "image/tiff"),
            (0x4D, "image/tiff"),
            (0x25, "application/pdf"),
            (0xD0, "application/vnd"),
            (0x46, "text/plain"),
            (0x00, "application/octet-stream"),
        ];
        for (first, expected) in cases {
            let file = FileAttachment::new("f", vec![*first]);
            assert_eq!(file.mime_type(), *expected, "first byte {first:#04x}");
        }
        assert_eq!(
            FileAttachment::new("empty", Vec::new()).mime_type(),
            "application/octet-stream"
        );
    }
}
