//! DOCX container handling.
//!
//! A DOCX file is a ZIP archive; the only part this tool rewrites is
//! `word/document.xml`. All entries are read once into an ordered list and
//! written back in the same order, with `word/media/` stored uncompressed the
//! way Word lays archives out.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::document::DocxDocument;
use crate::error::CoverError;

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Default template looked for in the working directory when no explicit
/// path is given.
pub const DEFAULT_TEMPLATE: &str = "template.docx";

/// The template's ZIP entries, order preserved.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoverError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| CoverError::MalformedTemplate(format!("not a DOCX container: {e}")))?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| CoverError::MalformedTemplate(format!("unreadable entry: {e}")))?;
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }
        let package = DocxPackage { entries };
        if package.find(DOCUMENT_PART).is_none() {
            return Err(CoverError::MalformedTemplate(format!(
                "missing {DOCUMENT_PART}"
            )));
        }
        Ok(package)
    }

    fn find(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn document_xml(&self) -> Result<String, CoverError> {
        let data = self
            .find(DOCUMENT_PART)
            .ok_or_else(|| CoverError::MalformedTemplate(format!("missing {DOCUMENT_PART}")))?;
        String::from_utf8(data.to_vec())
            .map_err(|e| CoverError::MalformedTemplate(format!("{DOCUMENT_PART} is not UTF-8: {e}")))
    }

    /// Serialize the container with `document_xml` substituted for the
    /// document part. The buffer is fully finished before being returned.
    pub fn to_bytes(&self, document_xml: &str) -> Result<Vec<u8>, CoverError> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let deflated =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            let stored =
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, data) in &self.entries {
                let options = if name.starts_with("word/media/") {
                    stored
                } else {
                    deflated
                };
                zip.start_file(name.as_str(), options)?;
                if name == DOCUMENT_PART {
                    zip.write_all(document_xml.as_bytes())?;
                } else {
                    zip.write_all(data)?;
                }
            }
            zip.finish()?;
        }
        Ok(buf)
    }
}

/// Read-only template handle. `open()` hands out a fresh owned document on
/// every call; substitution is destructive, so copies are never shared.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    package: DocxPackage,
    xml: String,
}

impl TemplateSource {
    /// Resolve the explicit path or fall back to `template.docx` in the
    /// working directory. Absence is reported before any processing starts.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, CoverError> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE));
        if !path.exists() {
            return Err(CoverError::MissingTemplate(path));
        }
        log::debug!("loading template from {}", path.display());
        Self::from_bytes(&std::fs::read(&path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoverError> {
        let package = DocxPackage::from_bytes(bytes)?;
        let xml = package.document_xml()?;
        // Probe parse so a malformed template fails the request up front
        // rather than mid-batch.
        DocxDocument::parse(&xml)?;
        Ok(TemplateSource { package, xml })
    }

    pub fn open(&self) -> Result<DocxDocument, CoverError> {
        DocxDocument::parse(&self.xml)
    }

    pub fn package(&self) -> &DocxPackage {
        &self.package
    }
}
