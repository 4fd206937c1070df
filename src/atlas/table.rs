//! Fixed-size hash table of sprite slots with chained collisions.
//!
//! 1024 buckets, indexed by `RenderingKey::bucket`. Each bucket owns an
//! inline head slot; collisions extend the bucket with nodes stored in a
//! shared arena and linked by index. Chains are never unlinked before
//! `release`: a layout reset only empties the slots, so a warmed-up table
//! serves later frames without allocating.

use std::iter;

use log::trace;

use super::RenderCommand;
use super::cursor::SpritePosition;
use crate::error::AtlasError;
use crate::key::RenderingKey;

/// Number of buckets. `RenderingKey::bucket` produces indices below this.
pub const BUCKETS: usize = 1024;

/// A filled slot: one key and the sprite it was assigned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CacheEntry {
    pub key: RenderingKey,
    pub position: SpritePosition,
    /// Already rasterized and uploaded.
    pub rendered: bool,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    /// `None` while the slot is unfilled.
    entry: Option<CacheEntry>,
    /// Next node in this bucket's chain (arena index).
    next: Option<usize>,
}

/// Location of a slot: a bucket head or an arena node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotId {
    Head(usize),
    Node(usize),
}

/// Outcome of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// The key is cached at this position.
    Hit(SpritePosition),
    /// The key is absent; this unfilled slot in its bucket can take it.
    Vacant(SlotId),
}

/// Occupancy counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Slots holding a key.
    pub filled: usize,
    /// Filled slots not yet rendered.
    pub pending: usize,
    /// Arena nodes allocated for collision chains.
    pub chain_nodes: usize,
    /// Slots in the longest bucket, head included.
    pub longest_chain: usize,
}

#[derive(Debug)]
pub(crate) struct SlotTable {
    heads: Box<[Slot]>,
    nodes: Vec<Slot>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self {
            heads: iter::repeat_with(Slot::default).take(BUCKETS).collect(),
            nodes: Vec::new(),
        }
    }

    /// Find `key`, or the slot it should be written to.
    ///
    /// Appends a node when the bucket is full. That is the only allocation
    /// here, and it fails cleanly with `AtlasError::Allocation`.
    pub fn lookup(&mut self, key: RenderingKey) -> Result<Lookup, AtlasError> {
        let bucket = key.bucket();

        // Plain ASCII hits the inline head; no chain walk.
        if let Some(entry) = &self.heads[bucket].entry {
            if entry.key == key {
                return Ok(Lookup::Hit(entry.position));
            }
        }

        let mut id = SlotId::Head(bucket);
        loop {
            let slot = self.slot(id);
            match &slot.entry {
                Some(entry) if entry.key == key => return Ok(Lookup::Hit(entry.position)),
                Some(_) => {}
                None => return Ok(Lookup::Vacant(id)),
            }
            let next = slot.next;
            id = match next {
                Some(next) => SlotId::Node(next),
                None => SlotId::Node(self.grow(id, bucket)?),
            };
        }
    }

    /// Read-only lookup; never allocates.
    pub fn get(&self, key: RenderingKey) -> Option<SpritePosition> {
        self.chain(key.bucket())
            .filter_map(|slot| slot.entry.as_ref())
            .find(|entry| entry.key == key)
            .map(|entry| entry.position)
    }

    /// Store `entry` in a slot returned by `lookup` as vacant.
    pub fn fill(&mut self, id: SlotId, entry: CacheEntry) {
        let slot = self.slot_mut(id);
        debug_assert!(slot.entry.is_none(), "overwriting a filled sprite slot");
        slot.entry = Some(entry);
    }

    /// Empty every slot, keeping chain nodes for reuse.
    pub fn clear(&mut self) {
        for slot in self.heads.iter_mut().chain(self.nodes.iter_mut()) {
            slot.entry = None;
        }
    }

    /// Mark every unrendered entry rendered and return a command for each.
    ///
    /// Walks buckets in index order, each chain head to tail.
    pub fn drain_pending(&mut self) -> Vec<RenderCommand> {
        let mut commands = Vec::new();
        for bucket in 0..BUCKETS {
            let mut cursor = Some(SlotId::Head(bucket));
            while let Some(id) = cursor {
                let slot = self.slot_mut(id);
                if let Some(entry) = slot.entry.as_mut().filter(|e| !e.rendered) {
                    entry.rendered = true;
                    commands.push(RenderCommand::new(entry.key, entry.position));
                }
                cursor = slot.next.map(SlotId::Node);
            }
        }
        commands
    }

    /// Free every chain node and empty the heads.
    pub fn release(&mut self) {
        for head in &mut *self.heads {
            *head = Slot::default();
        }
        self.nodes = Vec::new();
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            chain_nodes: self.nodes.len(),
            ..TableStats::default()
        };
        for bucket in 0..BUCKETS {
            let mut len = 0;
            for slot in self.chain(bucket) {
                len += 1;
                if let Some(entry) = &slot.entry {
                    stats.filled += 1;
                    if !entry.rendered {
                        stats.pending += 1;
                    }
                }
            }
            stats.longest_chain = stats.longest_chain.max(len);
        }
        stats
    }

    /// Link a fresh node after `tail` and return its arena index.
    fn grow(&mut self, tail: SlotId, bucket: usize) -> Result<usize, AtlasError> {
        self.nodes.try_reserve(1)?;
        let idx = self.nodes.len();
        self.nodes.push(Slot::default());
        self.slot_mut(tail).next = Some(idx);
        trace!("sprite cache: bucket {bucket:#05x} grew to node {idx}");
        Ok(idx)
    }

    fn chain(&self, bucket: usize) -> impl Iterator<Item = &Slot> {
        iter::successors(Some(&self.heads[bucket]), |slot| {
            slot.next.map(|idx| &self.nodes[idx])
        })
    }

    fn slot(&self, id: SlotId) -> &Slot {
        match id {
            SlotId::Head(bucket) => &self.heads[bucket],
            SlotId::Node(idx) => &self.nodes[idx],
        }
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        match id {
            SlotId::Head(bucket) => &mut self.heads[bucket],
            SlotId::Node(idx) => &mut self.nodes[idx],
        }
    }
}
