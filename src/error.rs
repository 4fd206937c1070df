//! Errors reported by the sprite cache.

use std::collections::TryReserveError;
use std::fmt;

/// Recoverable failures of [`GlyphAtlasCache`](crate::GlyphAtlasCache).
///
/// Neither variant leaves the cache inconsistent: coordinates handed out
/// earlier stay valid and cached keys keep resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasError {
    /// Storage for a new chain node could not be reserved.
    ///
    /// The renderer should give up on text for this frame and retry later.
    Allocation,

    /// Every page of the texture array is in use.
    ///
    /// No new glyph can be cached until the limits are raised (followed by
    /// a layout reset) or the layout is reset.
    OutOfTextureSpace { max_array_len: u32 },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => f.write_str("out of memory while allocating sprite cache node"),
            Self::OutOfTextureSpace { max_array_len } => {
                write!(f, "out of texture space for sprites ({max_array_len} pages)")
            }
        }
    }
}

impl std::error::Error for AtlasError {}

impl From<TryReserveError> for AtlasError {
    fn from(_: TryReserveError) -> Self {
        Self::Allocation
    }
}

#[cfg(test)]
mod tests {
    use super::AtlasError;

    #[test]
    fn display_names_the_condition() {
        let err = AtlasError::OutOfTextureSpace { max_array_len: 8 };
        assert_eq!(err.to_string(), "out of texture space for sprites (8 pages)");
        assert!(AtlasError::Allocation.to_string().contains("out of memory"));
    }

    #[test]
    fn reserve_failure_maps_to_allocation() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(AtlasError::from(err), AtlasError::Allocation);
    }
}
