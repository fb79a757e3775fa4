//! Writes the scene and metadata documents of each generation to disk.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::generation::GeneratedFiles;
use crate::domain::{AttributeRecord, Scene};

const MODEL_ID_WORDS: usize = 6;

#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

#[derive(Serialize)]
struct MetadataDocument<'a> {
    text_description: &'a str,
    generation_date: String,
    attributes: &'a AttributeRecord,
    seed: u64,
    files: &'a GeneratedFiles,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn scene_path(&self, model_id: &str) -> PathBuf {
        self.dir.join(format!("{model_id}_scene.json"))
    }

    pub fn metadata_path(&self, model_id: &str) -> PathBuf {
        self.dir.join(format!("{model_id}_metadata.json"))
    }

    #[instrument(skip(self, record, scene))]
    pub async fn write(
        &self,
        model_id: &str,
        record: &AttributeRecord,
        scene: &Scene,
        seed: u64,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedFiles> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create output dir {}", self.dir.display()))?;

        let scene_path = self.scene_path(model_id);
        let metadata_path = self.metadata_path(model_id);
        let files = GeneratedFiles {
            scene: scene_path.display().to_string(),
            metadata: metadata_path.display().to_string(),
        };

        let scene_json = serde_json::to_vec_pretty(scene).context("Failed to serialize scene")?;
        let metadata = MetadataDocument {
            text_description: &record.text,
            generation_date: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            attributes: record,
            seed,
            files: &files,
        };
        let metadata_json =
            serde_json::to_vec_pretty(&metadata).context("Failed to serialize metadata")?;

        tokio::fs::write(&scene_path, scene_json)
            .await
            .with_context(|| format!("Failed to write {}", scene_path.display()))?;

        // Never leave a scene document without its metadata.
        if let Err(e) = tokio::fs::write(&metadata_path, metadata_json).await {
            if let Err(remove_err) = tokio::fs::remove_file(&scene_path).await {
                warn!(path = %scene_path.display(), error = %remove_err, "Failed to remove orphaned scene");
            }
            return Err(e).with_context(|| format!("Failed to write {}", metadata_path.display()));
        }

        debug!(scene = %files.scene, metadata = %files.metadata, "Wrote generation outputs");
        Ok(files)
    }
}

/// `house_<first words>_<timestamp>_<8 hex>`, safe as a file stem.
pub fn model_id(description: &str, at: DateTime<Utc>) -> String {
    let words: Vec<String> = description
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .take(MODEL_ID_WORDS)
        .map(str::to_ascii_lowercase)
        .collect();
    let stem = if words.is_empty() {
        "untitled".to_string()
    } else {
        words.join("_")
    };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("house_{stem}_{}_{}", at.format("%Y%m%d_%H%M%S"), &suffix[..8])
}
