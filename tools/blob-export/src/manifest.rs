//! Manifest parsing and build orchestration
//!
//! Parses blobs.toml and runs every export it lists.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::{Layer, SceneRef};
use crate::export::{ExportJob, ExportSummary};

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlobManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub meshes: Vec<ExportEntry>,
    #[serde(default)]
    pub walkmeshes: Vec<ExportEntry>,

    /// Directory relative paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// One `[[meshes]]` or `[[walkmeshes]]` table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportEntry {
    pub input: PathBuf,
    #[serde(default = "default_layer")]
    pub layer: u32,
    pub output: PathBuf,
}

fn default_layer() -> u32 {
    Layer::MIN
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<BlobManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: BlobManifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(manifest)
}

impl BlobManifest {
    fn output_dir(&self, output_override: Option<&Path>) -> PathBuf {
        match (output_override, &self.output.dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => self.base_dir.join(dir),
            (None, None) => self.base_dir.clone(),
        }
    }

    /// Resolve every entry into a job, checking layers and suffixes
    pub fn jobs(&self, output_override: Option<&Path>) -> Result<Vec<ExportJob>> {
        let output_dir = self.output_dir(output_override);
        let mut jobs = Vec::with_capacity(self.meshes.len() + self.walkmeshes.len());

        for (i, entry) in self.meshes.iter().enumerate() {
            let (scene, output) = self.resolve(entry, &output_dir);
            let job = Layer::new(entry.layer)
                .and_then(|layer| ExportJob::meshes(SceneRef::new(scene, layer), output))
                .with_context(|| format!("Invalid [[meshes]] entry {}", i + 1))?;
            jobs.push(job);
        }
        for (i, entry) in self.walkmeshes.iter().enumerate() {
            let (scene, output) = self.resolve(entry, &output_dir);
            let layer = Layer::new(entry.layer)
                .with_context(|| format!("Invalid [[walkmeshes]] entry {}", i + 1))?;
            jobs.push(ExportJob::walkmeshes(SceneRef::new(scene, layer), output));
        }

        Ok(jobs)
    }

    fn resolve(&self, entry: &ExportEntry, output_dir: &Path) -> (PathBuf, PathBuf) {
        (self.base_dir.join(&entry.input), output_dir.join(&entry.output))
    }
}

/// Validate a manifest without exporting anything
pub fn validate(manifest: &BlobManifest) -> Result<Vec<ExportJob>> {
    let jobs = manifest.jobs(None)?;
    for job in &jobs {
        if !job.scene.path.exists() {
            anyhow::bail!("Scene for {:?} not found: {:?}", job.output, job.scene.path);
        }
    }
    if jobs.is_empty() {
        tracing::warn!("Manifest lists no exports");
    }
    Ok(jobs)
}

/// Run every export in a manifest.
///
/// All entries are validated before the first export starts.
pub fn build_all(
    manifest: &BlobManifest,
    output_override: Option<&Path>,
) -> Result<Vec<ExportSummary>> {
    validate(manifest)?;
    let jobs = manifest.jobs(output_override)?;

    let mut summaries = Vec::with_capacity(jobs.len());
    for job in &jobs {
        tracing::info!("Exporting {}: {} -> {:?}", job.kind, job.scene, job.output);
        summaries.push(job.run()?);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::export::ExportKind;
    use blob_common::AttributeSet;

    fn parse(content: &str) -> BlobManifest {
        let mut manifest: BlobManifest = toml::from_str(content).unwrap();
        manifest.base_dir = PathBuf::from("assets");
        manifest
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = parse(
            r#"
            [output]
            dir = "build"

            [[meshes]]
            input = "level.glb"
            output = "level.pnct"

            [[walkmeshes]]
            input = "level.glb"
            layer = 2
            output = "level.wm"
            "#,
        );

        assert_eq!(manifest.meshes.len(), 1);
        assert_eq!(manifest.meshes[0].layer, 1);
        assert_eq!(manifest.walkmeshes[0].layer, 2);

        let jobs = manifest.jobs(None).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].kind,
            ExportKind::Meshes(AttributeSet::from_suffix("pnct").unwrap())
        );
        assert_eq!(jobs[0].scene.path, Path::new("assets/level.glb"));
        assert_eq!(jobs[0].output, Path::new("assets/build/level.pnct"));
        assert_eq!(jobs[1].kind, ExportKind::Walkmeshes);
        assert_eq!(jobs[1].scene.layer.get(), 2);
    }

    #[test]
    fn test_output_override() {
        let manifest = parse(
            r#"
            [[walkmeshes]]
            input = "hub.gltf"
            output = "hub.wm"
            "#,
        );
        assert_eq!(manifest.jobs(None).unwrap()[0].output, Path::new("assets/hub.wm"));

        let jobs = manifest.jobs(Some(Path::new("/tmp/out"))).unwrap();
        assert_eq!(jobs[0].output, Path::new("/tmp/out/hub.wm"));
    }

    #[test]
    fn test_bad_suffix_is_rejected() {
        let manifest = parse(
            r#"
            [[meshes]]
            input = "level.glb"
            output = "level.mesh"
            "#,
        );
        let err = manifest.jobs(None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_bad_layer_is_rejected() {
        let manifest = parse(
            r#"
            [[walkmeshes]]
            input = "level.glb"
            layer = 21
            output = "level.wm"
            "#,
        );
        let err = manifest.jobs(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::LayerOutOfRange(21))
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<BlobManifest, _> = toml::from_str(
            r#"
            [[meshes]]
            input = "level.glb"
            output = "level.p"
            scale = 2.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_scene_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs.toml");
        std::fs::write(
            &path,
            "[[meshes]]\ninput = \"missing.glb\"\noutput = \"out.p\"\n",
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.base_dir, dir.path());
        assert!(validate(&manifest).is_err());
        assert!(build_all(&manifest, None).is_err());
        assert!(!dir.path().join("out.p").exists());
    }
}
