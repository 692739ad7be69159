//! File intake — turns uploaded files or a ZIP archive into staged candidates.
//!
//! Accepted inputs are plain-text résumés (`.txt`, `.md`, or `text/plain`).
//! A single `.zip` upload is expanded; every other upload is taken as-is.
//! Order is preserved. Duplicates are the caller's concern.

use std::io::{Cursor, Read};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md"];

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("No valid .txt or .md files found. Upload text files or a zip containing them.")]
    NoValidEntries,

    #[error("Failed to read ZIP file: {0}")]
    Archive(String),

    #[error("ZIP contents exceed the {limit} byte limit")]
    ArchiveTooLarge { limit: usize },
}

/// A staged résumé. Immutable once staged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub name: String,
    pub content: String,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Extracts staged candidates from one upload batch.
///
/// `max_extracted_bytes` bounds the decompressed text taken from an archive.
pub fn stage_uploads(
    uploads: Vec<UploadedFile>,
    max_extracted_bytes: usize,
) -> Result<Vec<CandidateFile>, IntakeError> {
    let staged = if uploads.len() == 1 && has_extension(&uploads[0].name, &[".zip"]) {
        extract_archive(&uploads[0].bytes, max_extracted_bytes)?
    } else {
        uploads
            .into_iter()
            .filter(is_plain_text)
            .filter_map(|upload| decode(upload.name, upload.bytes.to_vec()))
            .collect()
    };

    if staged.is_empty() {
        return Err(IntakeError::NoValidEntries);
    }
    debug!("Staged {} candidate files", staged.len());
    Ok(staged)
}

fn extract_archive(bytes: &[u8], limit: usize) -> Result<Vec<CandidateFile>, IntakeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IntakeError::Archive(e.to_string()))?;

    let mut staged = Vec::new();
    let mut extracted = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| IntakeError::Archive(e.to_string()))?;
        if entry.is_dir() || !has_extension(entry.name(), TEXT_EXTENSIONS) {
            continue;
        }

        // Header sizes are untrusted; read at most one byte past what is left.
        let name = entry.name().to_string();
        let remaining = limit - extracted;
        let mut raw = Vec::new();
        (&mut entry)
            .take(remaining as u64 + 1)
            .read_to_end(&mut raw)
            .map_err(|e| IntakeError::Archive(format!("{name}: {e}")))?;
        if raw.len() > remaining {
            warn!("Archive entry {name} pushes extraction past {limit} bytes");
            return Err(IntakeError::ArchiveTooLarge { limit });
        }
        extracted += raw.len();

        if let Some(file) = decode(name, raw) {
            staged.push(file);
        }
    }
    Ok(staged)
}

fn is_plain_text(upload: &UploadedFile) -> bool {
    upload.content_type.as_deref() == Some("text/plain")
        || has_extension(&upload.name, TEXT_EXTENSIONS)
}

fn decode(name: String, raw: Vec<u8>) -> Option<CandidateFile> {
    match String::from_utf8(raw) {
        Ok(content) => Some(CandidateFile { name, content }),
        Err(_) => {
            warn!("Skipping {name}: not valid UTF-8 text");
            None
        }
    }
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

// ────────────────────────────────────────────────────────────────────────────
// Demo data
// ────────────────────────────────────────────────────────────────────────────

pub const DEMO_JOB_DESCRIPTION: &str = "Senior Frontend Engineer

We are looking for an experienced Frontend Engineer to lead our core product team.
Key Requirements:
- 5+ years with React, TypeScript, and modern state management.
- Experience with performance optimization and web vitals.
- Strong UI/UX sensibility.";

/// Built-in job description plus five sample résumés for trying the pipeline.
pub fn demo_batch() -> (String, Vec<CandidateFile>) {
    let files = vec![
        CandidateFile::new(
            "sarah_jenkins.txt",
            "Sarah Jenkins\nFrontend Architect\nSUMMARY\nPassionate frontend leader with 7 years of experience scaling React applications. specialized in design systems and performance.\nEXPERIENCE\nTech Giant Corp | Staff Engineer\n- Improved Core Web Vitals LCP by 45%.\nSKILLS\nReact, TypeScript, WebGL, Node.js.",
        ),
        CandidateFile::new(
            "david_kim.txt",
            "David Kim\nSenior UI Engineer\nSUMMARY\n5 years React Native and Web.\nEXPERIENCE\nStartup Inc | Senior Engineer\n- Built design system.\nSKILLS\nReact, CSS, HTML, Figma.",
        ),
        CandidateFile::new(
            "alex_chen.txt",
            "Alex Chen\nFull Stack Engineer\nSUMMARY\n8 years exp. Expert in React and Node.js.\nEXPERIENCE\nTechFlow Inc.\n- Led migration to microservices.\nSKILLS\nJavaScript, TypeScript, React, Node.js.",
        ),
        CandidateFile::new(
            "mike_newman.txt",
            "Mike Newman\nWeb Developer\nSUMMARY\nBackend focus.\nEXPERIENCE\nLegacy Bank | Java Developer\n- Maintained JSP apps.\nSKILLS\nJava, Spring Boot, MySQL.",
        ),
        CandidateFile::new(
            "emily_ross.txt",
            "Emily Ross\nJunior Dev\nSUMMARY\nBootcamp grad.\nSKILLS\nReact, Redux.",
        ),
    ];
    (DEMO_JOB_DESCRIPTION.to_string(), files)
}


#[cfg(test)]
mod tests {
    use super::test_support::zip_bytes;
    use super::*;

    const LIMIT: usize = 4096;

    fn stage(uploads: Vec<UploadedFile>) -> Result<Vec<CandidateFile>, IntakeError> {
        stage_uploads(uploads, LIMIT)
    }

    fn upload(name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            content_type: content_type.map(String::from),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn test_plain_uploads_keep_order_and_filter_types() {
        let staged = stage(vec![
            upload("b.txt", None, b"Bob"),
            upload("photo.png", Some("image/png"), b"\x89PNG"),
            upload("a.md", None, b"# Alice"),
            upload("notes", Some("text/plain"), b"Nora"),
        ])
        .unwrap();

        let names: Vec<_> = staged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.md", "notes"]);
        assert_eq!(staged[1].content, "# Alice");
    }

    #[test]
    fn test_duplicates_are_not_removed() {
        let staged = stage(vec![
            upload("same.txt", None, b"x"),
            upload("same.txt", None, b"x"),
        ])
        .unwrap();
        assert_eq!(staged.len(), 2);
    }

    #[test]
    fn test_single_zip_extracts_text_entries_only() {
        let archive = zip_bytes(&[
            ("resumes/", ""),
            ("resumes/sarah.txt", "Sarah Jenkins"),
            ("resumes/logo.png", "PNG"),
            ("resumes/david.MD", "David Kim"),
        ]);
        let staged = stage(vec![upload("batch.zip", None, &archive)]).unwrap();

        assert_eq!(
            staged,
            vec![
                CandidateFile::new("resumes/sarah.txt", "Sarah Jenkins"),
                CandidateFile::new("resumes/david.MD", "David Kim"),
            ]
        );
    }

    #[test]
    fn test_zip_with_no_text_entries_is_no_valid_entries() {
        let archive = zip_bytes(&[("image.png", "PNG")]);
        let err = stage(vec![upload("batch.zip", None, &archive)]).unwrap_err();
        assert!(matches!(err, IntakeError::NoValidEntries));
    }

    #[test]
    fn test_corrupt_zip_is_archive_error() {
        let err = stage(vec![upload("batch.zip", None, b"not a zip")]).unwrap_err();
        assert!(matches!(err, IntakeError::Archive(_)));
    }

    #[test]
    fn test_zip_among_other_files_is_ignored() {
        let archive = zip_bytes(&[("inner.txt", "hidden")]);
        let staged = stage(vec![
            upload("batch.zip", None, &archive),
            upload("visible.txt", None, b"shown"),
        ])
        .unwrap();
        assert_eq!(staged, vec![CandidateFile::new("visible.txt", "shown")]);
    }

    #[test]
    fn test_archive_entry_over_limit_is_rejected() {
        let bomb = "x".repeat(LIMIT * 16);
        let archive = zip_bytes(&[("big.txt", bomb.as_str())]);
        assert!(archive.len() < LIMIT);

        let err = stage(vec![upload("batch.zip", None, &archive)]).unwrap_err();
        assert!(matches!(err, IntakeError::ArchiveTooLarge { limit } if limit == LIMIT));
    }

    #[test]
    fn test_archive_total_over_limit_is_rejected() {
        let half = "y".repeat(LIMIT / 2 + 1);
        let archive = zip_bytes(&[("one.txt", half.as_str()), ("two.txt", half.as_str())]);

        let err = stage(vec![upload("batch.zip", None, &archive)]).unwrap_err();
        assert!(matches!(err, IntakeError::ArchiveTooLarge { .. }));
    }

    #[test]
    fn test_archive_exactly_at_limit_is_accepted() {
        let exact = "z".repeat(LIMIT);
        let archive = zip_bytes(&[("exact.txt", exact.as_str())]);

        let staged = stage(vec![upload("batch.zip", None, &archive)]).unwrap();
        assert_eq!(staged[0].content.len(), LIMIT);
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let err = stage(vec![upload("bad.txt", None, &[0xff, 0xfe, 0xfd])]).unwrap_err();
        assert!(matches!(err, IntakeError::NoValidEntries));
    }

    #[test]
    fn test_empty_upload_list_is_no_valid_entries() {
        assert!(matches!(
            stage(vec![]),
            Err(IntakeError::NoValidEntries)
        ));
    }

    #[test]
    fn test_demo_batch_has_five_named_resumes() {
        let (jd, files) = demo_batch();
        assert!(jd.contains("Senior Frontend Engineer"));
        assert_eq!(files.len(), 5);
        assert!(files[0].content.starts_with("Sarah Jenkins"));
    }
}
