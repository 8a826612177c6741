//! Vertex attribute sets for triangle-soup mesh blobs
//!
//! An [`AttributeSet`] lists which attributes every vertex record carries.
//! Records are tightly packed in a fixed order with no padding:
//!
//! ```text
//! position  f32 × 3   (always present)
//! normal    f32 × 3   (optional)
//! color     u8 × 4    (optional, RGBA)
//! texcoord  f32 × 2   (optional)
//! ```
//!
//! The set is chosen by the output file's suffix (see [`FILE_TYPES`]) and is
//! recorded in the blob as the magic of the vertex data chunk.

// ============================================================================
// Attribute Sizes
// ============================================================================

/// Position: Float32x3
pub const POSITION_SIZE: usize = 12;
/// Normal: Float32x3
pub const NORMAL_SIZE: usize = 12;
/// Color: Unorm8x4
pub const COLOR_SIZE: usize = 4;
/// Texcoord: Float32x2
pub const TEXCOORD_SIZE: usize = 8;

/// Color written for meshes without a color layer
pub const DEFAULT_COLOR: [u8; 4] = [0xFF; 4];
/// Texcoord written for meshes without a UV layer
pub const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];

/// Enabled vertex attributes of a soup blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeSet {
    position: bool,
    normal: bool,
    color: bool,
    texcoord: bool,
    as_lines: bool,
}

/// Byte offsets of the optional attributes within one vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub normal: Option<usize>,
    pub color: Option<usize>,
    pub texcoord: Option<usize>,
}

/// Output suffix registry: `<name>.<suffix>` selects the attribute set.
pub const FILE_TYPES: [(&str, AttributeSet); 9] = [
    ("p", AttributeSet::triangles(false, false, false)),
    ("pl", AttributeSet::LINES),
    ("pn", AttributeSet::triangles(true, false, false)),
    ("pc", AttributeSet::triangles(false, true, false)),
    ("pt", AttributeSet::triangles(false, false, true)),
    ("pnc", AttributeSet::triangles(true, true, false)),
    ("pct", AttributeSet::triangles(false, true, true)),
    ("pnt", AttributeSet::triangles(true, false, true)),
    ("pnct", AttributeSet::triangles(true, true, true)),
];

impl AttributeSet {
    /// Edges-only export: two position-only records per mesh edge.
    pub const LINES: Self = Self {
        position: true,
        normal: false,
        color: false,
        texcoord: false,
        as_lines: true,
    };

    /// Triangle export with position plus the given optional attributes.
    pub const fn triangles(normal: bool, color: bool, texcoord: bool) -> Self {
        Self {
            position: true,
            normal,
            color,
            texcoord,
            as_lines: false,
        }
    }

    /// Build an arbitrary set, rejecting combinations no blob can hold.
    ///
    /// Returns `None` when position is disabled, or when edges-only mode is
    /// combined with normal, color or texcoord (edges have no per-corner data).
    pub fn new(position: bool, normal: bool, color: bool, texcoord: bool, as_lines: bool) -> Option<Self> {
        if !position {
            return None;
        }
        if as_lines && (normal || color || texcoord) {
            return None;
        }
        Some(Self {
            position,
            normal,
            color,
            texcoord,
            as_lines,
        })
    }

    /// Look up a registry suffix (without the leading dot)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        FILE_TYPES
            .iter()
            .find(|(name, _)| *name == suffix)
            .map(|(_, set)| *set)
    }

    /// Recover the attribute set from a vertex data chunk magic.
    ///
    /// Edges-only blobs share the `p...` magic with plain position blobs, so
    /// this never reports `as_lines`.
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        FILE_TYPES
            .iter()
            .map(|(_, set)| *set)
            .filter(|set| !set.as_lines)
            .find(|set| set.magic() == magic)
    }

    pub const fn position(&self) -> bool {
        self.position
    }

    pub const fn normal(&self) -> bool {
        self.normal
    }

    pub const fn color(&self) -> bool {
        self.color
    }

    pub const fn texcoord(&self) -> bool {
        self.texcoord
    }

    pub const fn as_lines(&self) -> bool {
        self.as_lines
    }

    /// Bytes per vertex record
    #[inline]
    pub const fn stride(&self) -> usize {
        let mut stride = 0;

        if self.position {
            stride += POSITION_SIZE;
        }
        if self.normal {
            stride += NORMAL_SIZE;
        }
        if self.color {
            stride += COLOR_SIZE;
        }
        if self.texcoord {
            stride += TEXCOORD_SIZE;
        }

        stride
    }

    /// Vertex data chunk magic: enabled letters padded with `.` (e.g. `pnc.`)
    pub fn magic(&self) -> [u8; 4] {
        let mut magic = [b'.'; 4];
        let letters = [
            (self.position, b'p'),
            (self.normal, b'n'),
            (self.color, b'c'),
            (self.texcoord, b't'),
        ];
        for (slot, (_, letter)) in magic
            .iter_mut()
            .zip(letters.iter().filter(|(enabled, _)| *enabled))
        {
            *slot = *letter;
        }
        magic
    }

    /// Attribute offsets within a vertex record
    pub fn layout(&self) -> VertexLayout {
        let mut offset = POSITION_SIZE;
        let mut next = |enabled: bool, size: usize| {
            enabled.then(|| {
                let at = offset;
                offset += size;
                at
            })
        };
        let normal = next(self.normal, NORMAL_SIZE);
        let color = next(self.color, COLOR_SIZE);
        let texcoord = next(self.texcoord, TEXCOORD_SIZE);

        VertexLayout {
            stride: self.stride(),
            normal,
            color,
            texcoord,
        }
    }
}

/// Convert f32 to unsigned normalized 8-bit integer (truncating)
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0) as u8
}

/// Pack an RGBA color sample into a color attribute. Alpha is always opaque.
#[inline]
pub fn pack_color_rgba_unorm8(rgba: [f32; 4]) -> [u8; 4] {
    let [r, g, b, _] = rgba;
    [f32_to_unorm8(r), f32_to_unorm8(g), f32_to_unorm8(b), 0xFF]
}
