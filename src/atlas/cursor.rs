//! Raster-scan slot allocation across the pages of the texture array.
//!
//! The atlas is a `D2Array` texture: each page holds `xnum` by `max_y` cells
//! of one cell size. The cursor hands out slots x-fastest, then y, then z,
//! and never wraps back; the only way to reclaim slots is a layout reset.

use crate::error::AtlasError;

/// Largest column or row count a page may have (coordinates are `u16`).
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Hard cap on the number of pages, independent of the GPU limit.
pub const MAX_PAGES: u32 = 1 << 16;

/// Row count assumed before the first layout.
const DEFAULT_MAX_Y: u32 = 100;

/// Position of one cell-sized sprite in the texture array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpritePosition {
    pub x: u16,
    pub y: u16,
    /// Texture array layer.
    pub z: u16,
}

impl SpritePosition {
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// GPU capacity limits the atlas must fit within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLimits {
    /// Width and height of one page in pixels.
    pub max_texture_size: u32,
    /// Number of layers the texture array may have.
    pub max_array_len: u32,
}

impl Default for AtlasLimits {
    fn default() -> Self {
        Self {
            max_texture_size: 1000,
            max_array_len: 1000,
        }
    }
}

impl AtlasLimits {
    /// Number of pages the cursor may use.
    pub fn page_limit(self) -> u32 {
        self.max_array_len.min(MAX_PAGES)
    }
}

/// Snapshot of the atlas geometry for sizing the GPU texture array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Columns per page.
    pub xnum: u32,
    /// Rows in use per page (grows as sprites are added).
    pub ynum: u32,
    /// Page the cursor is currently filling.
    pub z: u32,
}

/// Next free slot plus the current page geometry.
#[derive(Debug, Clone)]
pub struct AtlasCursor {
    x: u32,
    y: u32,
    z: u32,
    xnum: u32,
    ynum: u32,
    max_y: u32,
    limits: AtlasLimits,
}

impl AtlasCursor {
    /// A cursor at the origin of an unsized atlas (one column per page).
    pub fn new(limits: AtlasLimits) -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            xnum: 1,
            ynum: 1,
            max_y: DEFAULT_MAX_Y,
            limits,
        }
    }

    pub fn limits(&self) -> AtlasLimits {
        self.limits
    }

    /// Replace the limits. Geometry is only recomputed by `set_layout`.
    pub fn set_limits(&mut self, limits: AtlasLimits) {
        self.limits = limits;
    }

    /// Recompute page geometry for a new cell size and rewind to the origin.
    ///
    /// Zero cell dimensions are treated as one pixel.
    pub fn set_layout(&mut self, cell_width: u32, cell_height: u32) {
        debug_assert!(cell_width > 0 && cell_height > 0, "empty cell size");
        let size = self.limits.max_texture_size;
        self.xnum = (size / cell_width.max(1)).clamp(1, MAX_DIMENSION);
        self.max_y = (size / cell_height.max(1)).clamp(1, MAX_DIMENSION);
        self.ynum = 1;
        self.x = 0;
        self.y = 0;
        self.z = 0;
    }

    /// The slot the next allocation will receive.
    ///
    /// Only meaningful while `!self.is_exhausted()`.
    pub fn position(&self) -> SpritePosition {
        debug_assert!(!self.is_exhausted());
        SpritePosition::new(self.x as u16, self.y as u16, self.z as u16)
    }

    /// Move to the next slot in raster order.
    ///
    /// Returns `OutOfTextureSpace` when the move lands past the last page.
    /// The cursor stays there: every later call fails the same way until
    /// the limits grow or the layout is reset.
    pub fn advance(&mut self) -> Result<(), AtlasError> {
        self.x += 1;
        if self.x >= self.xnum {
            self.x = 0;
            self.y += 1;
            self.ynum = self.ynum.max(self.y + 1).clamp(1, self.max_y);
        }
        if self.y >= self.max_y {
            self.y = 0;
            self.z += 1;
        }
        self.check_capacity()
    }

    /// `true` once the cursor has run past the last usable page.
    pub fn is_exhausted(&self) -> bool {
        self.z >= self.limits.page_limit()
    }

    /// Fails with `OutOfTextureSpace` if no slot is left.
    pub fn check_capacity(&self) -> Result<(), AtlasError> {
        if self.is_exhausted() {
            return Err(AtlasError::OutOfTextureSpace {
                max_array_len: self.limits.max_array_len,
            });
        }
        Ok(())
    }

    pub fn layout(&self) -> AtlasLayout {
        AtlasLayout {
            xnum: self.xnum,
            ynum: self.ynum,
            z: self.z,
        }
    }

    /// Rows per page for the current cell size.
    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Total number of slots across all pages.
    pub fn capacity(&self) -> u64 {
        u64::from(self.xnum) * u64::from(self.max_y) * u64::from(self.limits.page_limit())
    }
}
