use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::hooks::{AttachmentTypes, MetadataStore};
use crate::metadata::AttachmentMetadata;

/// Attachment metadata kept as one pretty-printed `<id>.json` file per attachment.
///
/// Stands in for the host's database when driving the hooks from the CLI.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    image_extensions: Vec<String>,
}

/// One record found by [`JsonFileStore::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentEntry {
    pub id: u64,
    pub file: Option<String>,
    pub is_image: bool,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, image_extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            image_extensions: image_extensions.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.dir, config.image_extensions.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, attachment_id: u64) -> PathBuf {
        self.dir.join(format!("{attachment_id}.json"))
    }

    /// All records in the store directory, ordered by attachment id.
    ///
    /// Files whose stem is not a numeric id, and records that fail to parse,
    /// are skipped.
    pub fn list(&self) -> Result<Vec<AttachmentEntry>> {
        if !self.dir.exists() {
            log::debug!("Store directory {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read store directory")?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<u64>().ok()) else {
                log::debug!("Skipping {}: not an attachment record", path.display());
                continue;
            };

            let record = match read_record(path) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping unreadable record: {e:#}");
                    continue;
                }
            };
            entries.push(AttachmentEntry {
                id,
                is_image: self.is_image_record(&record),
                file: record.file().map(String::from),
            });
        }

        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    fn is_image_record(&self, record: &AttachmentMetadata) -> bool {
        record
            .file()
            .and_then(|f| Path::new(f).extension())
            .and_then(|e| e.to_str())
            .map(|ext| self.image_extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

fn read_record(path: &Path) -> Result<AttachmentMetadata> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

impl MetadataStore for JsonFileStore {
    fn get_metadata(&self, attachment_id: u64) -> Result<Option<AttachmentMetadata>> {
        let path = self.record_path(attachment_id);
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    fn update_metadata(&mut self, attachment_id: u64, record: &AttachmentMetadata) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.record_path(attachment_id);
        let contents = serde_json::to_string_pretty(record).context("Failed to serialize metadata")?;
        std::fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl AttachmentTypes for JsonFileStore {
    fn is_image_attachment(&self, attachment_id: u64) -> bool {
        match self.get_metadata(attachment_id) {
            Ok(Some(record)) => self.is_image_record(&record),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Attachment {attachment_id}: {e:#}");
                false
            }
        }
    }
}
