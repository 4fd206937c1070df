//! Sprite slot cache for the glyph texture atlas.
//!
//! The renderer resolves every visible cell's `RenderingKey` to a slot in a
//! `D2Array` texture. Slots are handed out in raster order by
//! [`AtlasCursor`] and remembered in a 1024-bucket chained table. New slots
//! start dirty; once per frame the renderer calls
//! [`GlyphAtlasCache::drain_dirty`], rasterizes each returned command into
//! its slot, and the cache records them as rendered.
//!
//! The cache is plain single-threaded state owned by the renderer. Callers
//! that share it across threads must lock the whole cache.

pub mod cursor;
mod table;

pub use cursor::{AtlasCursor, AtlasLayout, AtlasLimits, SpritePosition};
pub use table::{BUCKETS, TableStats};

use log::{debug, warn};

use crate::config::AtlasConfig;
use crate::error::AtlasError;
use crate::key::{CombiningMarks, GlyphStyle, RenderingKey};
use table::{CacheEntry, Lookup, SlotTable};

/// One glyph the rasterizer must draw into the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCommand {
    /// Base character, style bits removed.
    pub ch: char,
    /// Combining marks stacked on `ch`.
    pub marks: CombiningMarks,
    pub bold: bool,
    pub italic: bool,
    /// Draw the right half of a wide glyph.
    pub second_half: bool,
    /// Destination slot.
    pub position: SpritePosition,
}

impl RenderCommand {
    fn new(key: RenderingKey, position: SpritePosition) -> Self {
        let style = key.style();
        Self {
            ch: key.ch(),
            marks: key.marks(),
            bold: style.contains(GlyphStyle::BOLD),
            italic: style.contains(GlyphStyle::ITALIC),
            second_half: key.is_second_half(),
            position,
        }
    }

    /// Text to shape: the base character followed by its marks.
    pub fn text(&self) -> String {
        std::iter::once(self.ch).chain(self.marks.iter()).collect()
    }

    /// The key this command was produced for.
    pub fn key(&self) -> RenderingKey {
        let mut style = GlyphStyle::empty();
        style.set(GlyphStyle::BOLD, self.bold);
        style.set(GlyphStyle::ITALIC, self.italic);
        let key = RenderingKey::new(self.ch, style).with_marks(self.marks);
        if self.second_half {
            key.as_second_half()
        } else {
            key
        }
    }
}

/// Maps rendering keys to atlas slots and queues new slots for rendering.
///
/// # Lifecycle
///
/// - [`new`](Self::new) / [`from_config`](Self::from_config): build.
/// - [`set_layout`](Self::set_layout): on every cell size change. All
///   previously returned positions become invalid; the renderer must drop
///   or reallocate its texture array at the same time.
/// - [`resolve`](Self::resolve) per visible cell,
///   [`drain_dirty`](Self::drain_dirty) once per frame.
/// - [`release`](Self::release): teardown.
#[derive(Debug)]
pub struct GlyphAtlasCache {
    cursor: AtlasCursor,
    table: SlotTable,
    /// Some entry is filled but not rendered, or a layout reset is pending.
    dirty: bool,
}

impl GlyphAtlasCache {
    /// An empty cache. Call [`set_layout`](Self::set_layout) before use.
    pub fn new(limits: AtlasLimits) -> Self {
        Self {
            cursor: AtlasCursor::new(limits),
            table: SlotTable::new(),
            dirty: true,
        }
    }

    /// Build from configuration, applying the cell size if one is set.
    pub fn from_config(config: &AtlasConfig) -> Self {
        let mut cache = Self::new(config.limits());
        if let Some((width, height)) = config.cell_size() {
            cache.set_layout(width, height);
        }
        cache
    }

    pub fn limits(&self) -> AtlasLimits {
        self.cursor.limits()
    }

    /// Update the GPU limits.
    ///
    /// Page geometry is recomputed by the next `set_layout`. A raised
    /// `max_array_len` takes effect immediately, so an exhausted cache can
    /// resume without a reset.
    pub fn set_limits(&mut self, limits: AtlasLimits) {
        debug!(
            "sprite cache: limits texture={} layers={}",
            limits.max_texture_size, limits.max_array_len
        );
        self.cursor.set_limits(limits);
    }

    /// Adopt a new cell size: recompute page geometry and forget every key.
    ///
    /// Chain storage is kept. The cache is left dirty.
    pub fn set_layout(&mut self, cell_width: u32, cell_height: u32) {
        let before = self.table.stats();
        self.cursor.set_layout(cell_width, cell_height);
        self.table.clear();
        self.dirty = true;
        let layout = self.cursor.layout();
        debug!(
            "sprite cache: layout {cell_width}x{cell_height} -> {} cols x {} rows/page, dropped {} sprites",
            layout.xnum,
            self.cursor.max_y(),
            before.filled,
        );
    }

    /// Page geometry for sizing the texture array.
    pub fn current_layout(&self) -> AtlasLayout {
        self.cursor.layout()
    }

    /// Slot for `key`, assigning the next free one on first sight.
    ///
    /// Cached keys always resolve, even when the atlas is full. A miss on a
    /// full atlas fails with `OutOfTextureSpace` and records nothing.
    pub fn resolve(&mut self, key: RenderingKey) -> Result<SpritePosition, AtlasError> {
        let slot = match self.table.lookup(key)? {
            Lookup::Hit(position) => return Ok(position),
            Lookup::Vacant(slot) => slot,
        };
        let position = self.claim()?;
        self.table.fill(
            slot,
            CacheEntry {
                key,
                position,
                rendered: false,
            },
        );
        self.dirty = true;
        Ok(position)
    }

    /// Slot for `key` if it is cached. Never assigns.
    pub fn get(&self, key: RenderingKey) -> Option<SpritePosition> {
        self.table.get(key)
    }

    /// Claim the next slot without a key.
    ///
    /// For sprites the renderer draws itself (cursor shapes, decorations).
    /// The slot is not tracked: it is never drained and is only reclaimed by
    /// a layout reset.
    pub fn reserve(&mut self) -> Result<SpritePosition, AtlasError> {
        self.claim()
    }

    /// `true` if the next `drain_dirty` may return work.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Every slot assigned since the last drain, now marked rendered.
    ///
    /// Cheap when nothing changed. A second call in a row returns nothing.
    pub fn drain_dirty(&mut self) -> Vec<RenderCommand> {
        if !self.dirty {
            return Vec::new();
        }
        let commands = self.table.drain_pending();
        self.dirty = false;
        commands
    }

    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Free all chain storage and drop the cache.
    pub fn release(mut self) {
        let stats = self.table.stats();
        self.table.release();
        debug!(
            "sprite cache: released {} chain nodes ({} sprites)",
            stats.chain_nodes, stats.filled
        );
    }

    /// Take the cursor's slot and step past it.
    fn claim(&mut self) -> Result<SpritePosition, AtlasError> {
        self.cursor.check_capacity()?;
        let position = self.cursor.position();
        if let Err(err) = self.cursor.advance() {
            warn!("sprite cache: {err}, no further glyphs can be cached");
        }
        Ok(position)
    }
}
