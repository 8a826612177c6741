//! Invocation configuration: scene references, layers and output suffixes

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use blob_common::{AttributeSet, FILE_TYPES};

use crate::error::ConfigError;

/// Opaque scene-partition selector (1-20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer(u32);

impl Layer {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;

    pub fn new(layer: u32) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&layer) {
            Ok(Self(layer))
        } else {
            Err(ConfigError::LayerOutOfRange(layer.into()))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position of the layer
    pub fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input scene identifier: `<path>[:<layer>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRef {
    pub path: PathBuf,
    pub layer: Layer,
}

impl SceneRef {
    pub fn new(path: impl Into<PathBuf>, layer: Layer) -> Self {
        Self {
            path: path.into(),
            layer,
        }
    }
}

impl FromStr for SceneRef {
    type Err = ConfigError;

    /// Only an all-digit tail after the last `:` is a layer, so `C:\scene.glb`
    /// stays a plain path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((path, layer))
                if !path.is_empty()
                    && !layer.is_empty()
                    && layer.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let layer: u64 = layer
                    .parse()
                    .map_err(|_| ConfigError::InvalidLayer(layer.to_string()))?;
                let layer = u32::try_from(layer)
                    .map_err(|_| ConfigError::LayerOutOfRange(layer))
                    .and_then(Layer::new)?;
                Ok(Self::new(path, layer))
            }
            _ => Ok(Self::new(s, Layer::default())),
        }
    }
}

impl fmt::Display for SceneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.layer)
    }
}

/// Resolve the attribute set selected by an output file name.
///
/// The name must end in exactly one registered `.<suffix>`.
pub fn resolve_output_attributes(path: &Path) -> Result<AttributeSet, ConfigError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let matches: Vec<(&str, AttributeSet)> = FILE_TYPES
        .iter()
        .filter(|(suffix, _)| name.ends_with(&format!(".{suffix}")))
        .copied()
        .collect();

    match matches.as_slice() {
        [(_, attributes)] => Ok(*attributes),
        [] => Err(ConfigError::UnknownSuffix {
            path: path.to_path_buf(),
            expected: FILE_TYPES
                .iter()
                .map(|(suffix, _)| format!(".{suffix}"))
                .collect::<Vec<_>>()
                .join(", "),
        }),
        many => Err(ConfigError::AmbiguousSuffix {
            path: path.to_path_buf(),
            matches: many
                .iter()
                .map(|(suffix, _)| format!(".{suffix}"))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
