use std::fmt;

/// The `.nbs` format version a stream is encoded in
///
/// Legacy files have no version byte at all; they are treated as version 0. Which optional
/// fields a stream contains is decided by comparing its version against [`Field::min_version()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Version(u8);

impl Version {
    /// The original layout, which starts with a nonzero song length instead of a version byte
    pub const LEGACY: Self = Self(0);

    pub const fn new(version: u8) -> Self {
        Self(version)
    }

    /// The raw version number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Does a stream of this version contain `field`?
    pub const fn has(self, field: Field) -> bool {
        self.0 >= field.min_version()
    }

    /// Versions 1 and 2 store no song length; it is taken from the last tick instead
    pub const fn infers_length(self) -> bool {
        self.0 > Self::LEGACY.0 && !self.has(Field::Length)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The version-dependent parts of a `.nbs` stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The song length (in ticks) following the version byte
    Length,

    /// Loop on/off, max loop count and loop start tick, after the header bookkeeping
    LoopSettings,

    /// Velocity, panning and fine pitch for every note
    NoteDetails,

    /// The "locked" flag in the per-layer metadata
    LayerLock,

    /// The stereo panning byte in the per-layer metadata
    LayerStereo,
}

impl Field {
    /// The first format version that contains this field
    pub const fn min_version(self) -> u8 {
        match self {
            Self::LayerStereo => 2,
            Self::Length => 3,
            Self::LoopSettings => 4,
            Self::NoteDetails => 4,
            Self::LayerLock => 4,
        }
    }
}
