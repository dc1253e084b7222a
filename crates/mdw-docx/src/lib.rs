//! OOXML `.docx` document sink.
//!
//! Serializes a rendered [`Document`] into a minimal Office Open XML package:
//! `[Content_Types].xml`, `_rels/.rels`, `word/document.xml`,
//! `word/styles.xml` (declaring `Normal` and `Heading1`..`Heading6`), and
//! `word/_rels/document.xml.rels`. Hyperlink annotations carried by runs are
//! wired into real external relationships. The archive is written with
//! deflate compression.

mod body;
mod parts;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use mdw_renderer::{Document, DocumentSink};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Sink-level failure: the only error source a conversion surfaces.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    /// I/O error writing the package.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Archive structure error.
    #[error("archive error")]
    Zip(#[from] zip::result::ZipError),
}

/// Document appearance knobs, typically sourced from `mdw.toml`.
#[derive(Debug, Clone)]
pub struct DocxOptions {
    /// Default font family declared in the document defaults.
    pub font: String,
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            font: "Calibri".to_owned(),
        }
    }
}

/// Writes a rendered document to a `.docx` file.
#[derive(Debug)]
pub struct DocxSink {
    path: PathBuf,
    options: DocxOptions,
}

impl DocxSink {
    /// Create a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: DocxOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl DocumentSink for DocxSink {
    type Error = DocxError;

    fn serialize(&mut self, document: &Document) -> Result<(), Self::Error> {
        let hyperlinks = body::collect_hyperlinks(document);

        let entries = [
            ("[Content_Types].xml", parts::CONTENT_TYPES.to_owned()),
            ("_rels/.rels", parts::PACKAGE_RELS.to_owned()),
            ("word/document.xml", body::document_xml(document, &hyperlinks)),
            ("word/styles.xml", parts::styles_xml(&self.options.font)),
            (
                "word/_rels/document.xml.rels",
                parts::document_rels(&hyperlinks),
            ),
        ];

        let file = File::create(&self.path)?;
        let mut archive = ZipWriter::new(file);
        let zip_options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in entries {
            archive.start_file(name, zip_options)?;
            archive.write_all(content.as_bytes())?;
        }
        archive.finish()?;
        Ok(())
    }
}
