//! JSON artifacts exchanged between ingestion stages.
//!
//! Each stage's output can be written to a directory and read back by the
//! next one. A missing file reads as an empty list; a malformed one is an
//! error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::pipeline::chunk::ChunkBuilder;
use crate::pipeline::route::RoutedElements;
use crate::pipeline::tables::ProcessedTables;
use crate::types::chunk::{Chunk, ImageRef};
use crate::types::element::ParsedElement;
use crate::types::table::TableIndexEntry;

pub const PARSED_ELEMENTS: &str = "parsed_elements.json";
pub const TEXT_ELEMENTS: &str = "text_elements.json";
pub const TABLE_ELEMENTS: &str = "table_elements.json";
pub const TABLES_RAW: &str = "tables_raw.json";
pub const TABLES_INDEX: &str = "tables_index.json";
pub const IMAGE_SEMANTICS: &str = "image_semantics.json";
pub const CHUNKS: &str = "chunks.json";

/// Read a JSON array, treating a missing file as empty.
pub fn load_json_or_empty<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "Artifact missing, reading as empty");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// File-driven chunking: read the routed text, table index and images,
/// build chunks and write them to `output`.
pub fn build_chunks_from_files(
    builder: &ChunkBuilder,
    text_path: &Path,
    tables_index_path: &Path,
    images_path: &Path,
    output_path: &Path,
) -> Result<Vec<Chunk>> {
    let text: Vec<ParsedElement> = load_json_or_empty(text_path)?;
    let tables: Vec<TableIndexEntry> = load_json_or_empty(tables_index_path)?;
    let images: Vec<ImageRef> = load_json_or_empty(images_path)?;

    let chunks = builder.build(&text, &tables, &images);
    write_json(output_path, &chunks)?;
    Ok(chunks)
}

/// A directory holding one document's artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write every stage's output for one document.
    pub fn write_all(
        &self,
        elements: &[ParsedElement],
        routed: &RoutedElements,
        tables: &ProcessedTables,
        chunks: &[Chunk],
    ) -> Result<()> {
        write_json(&self.path(PARSED_ELEMENTS), elements)?;
        write_json(&self.path(TEXT_ELEMENTS), &routed.text)?;
        write_json(&self.path(TABLE_ELEMENTS), &routed.tables)?;
        write_json(&self.path(IMAGE_SEMANTICS), &routed.images)?;
        write_json(&self.path(TABLES_RAW), &tables.raw)?;
        write_json(&self.path(TABLES_INDEX), &tables.index)?;
        write_json(&self.path(CHUNKS), chunks)?;

        debug!(dir = %self.root.display(), chunks = chunks.len(), "Wrote ingestion artifacts");
        Ok(())
    }

    /// Rebuild chunks from the artifacts in this directory.
    pub fn rebuild_chunks(&self, builder: &ChunkBuilder) -> Result<Vec<Chunk>> {
        build_chunks_from_files(
            builder,
            &self.path(TEXT_ELEMENTS),
            &self.path(TABLES_INDEX),
            &self.path(IMAGE_SEMANTICS),
            &self.path(CHUNKS),
        )
    }
}
