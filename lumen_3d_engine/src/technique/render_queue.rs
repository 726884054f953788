/// Render queues: named, prioritized buckets of batches.
///
/// Queues are rendered in ascending priority. Within a queue, entries are
/// ordered by their own priority, then by the queue's `SortMode`, then by
/// insertion order. Sorting packs those three criteria into one 128-bit key
/// and radix-sorts it.
///
/// A `QueueGroup` is a nested list sorted independently and drawn as a
/// unit where its parent places it.

use rdst::{RadixKey, RadixSort};
use crate::error::Result;
use crate::engine_err;
use crate::renderer::{Renderer, StateTracker};
use super::batch::Batch;

/// Ordering applied within a queue or group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Nearest first; equal depths grouped by state
    #[default]
    FrontToBack,
    /// Farthest first
    BackToFront,
    /// Insertion order
    None,
}

/// Order-preserving mapping of a float onto u32
fn depth_bits(depth: f32) -> u32 {
    let bits = depth.to_bits();
    if bits & 0x8000_0000 != 0 { !bits } else { bits | 0x8000_0000 }
}

fn priority_bits(priority: i32) -> u32 {
    (priority as u32) ^ 0x8000_0000
}

#[derive(Debug, Clone, Copy)]
struct SortEntry {
    key: u128,
    index: u32,
}

impl RadixKey for SortEntry {
    const LEVELS: usize = 16;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.key >> (level * 8)) as u8
    }
}

#[derive(Debug, Clone)]
enum QueueItem {
    Batch(Batch),
    Group(QueueGroup),
}

#[derive(Debug, Clone)]
struct QueueEntry {
    priority: i32,
    item: QueueItem,
}

/// Sortable list of batches and nested groups
#[derive(Debug, Clone)]
pub struct QueueGroup {
    sort: SortMode,
    entries: Vec<QueueEntry>,
    nearest: f32,
    farthest: f32,
}

impl QueueGroup {
    pub fn new(sort: SortMode) -> Self {
        Self { sort, entries: Vec::new(), nearest: f32::INFINITY, farthest: f32::NEG_INFINITY }
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn add_batch(&mut self, priority: i32, batch: Batch) {
        self.nearest = self.nearest.min(batch.depth);
        self.farthest = self.farthest.max(batch.depth);
        self.entries.push(QueueEntry { priority, item: QueueItem::Batch(batch) });
    }

    /// Add a nested group; empty groups are dropped
    pub fn add_group(&mut self, priority: i32, group: QueueGroup) {
        if group.is_empty() {
            return;
        }
        self.nearest = self.nearest.min(group.nearest);
        self.farthest = self.farthest.max(group.farthest);
        self.entries.push(QueueEntry { priority, item: QueueItem::Group(group) });
    }

    /// Direct entries (batches and groups)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Batches including those of nested groups
    pub fn batch_count(&self) -> usize {
        self.entries.iter().map(|entry| match &entry.item {
            QueueItem::Batch(_) => 1,
            QueueItem::Group(group) => group.batch_count(),
        }).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.nearest = f32::INFINITY;
        self.farthest = f32::NEG_INFINITY;
    }

    /// All batches in draw order (as currently sorted)
    pub fn batches(&self) -> Vec<&Batch> {
        let mut batches = Vec::with_capacity(self.entries.len());
        self.collect_batches(&mut batches);
        batches
    }

    fn collect_batches<'a>(&'a self, out: &mut Vec<&'a Batch>) {
        for entry in &self.entries {
            match &entry.item {
                QueueItem::Batch(batch) => out.push(batch),
                QueueItem::Group(group) => group.collect_batches(out),
            }
        }
    }

    fn secondary_key(&self, item: &QueueItem) -> u64 {
        match (self.sort, item) {
            (SortMode::FrontToBack, QueueItem::Batch(batch)) => {
                ((depth_bits(batch.depth) as u64) << 32) | batch.state_key() as u64
            }
            (SortMode::FrontToBack, QueueItem::Group(group)) => (depth_bits(group.nearest) as u64) << 32,
            (SortMode::BackToFront, QueueItem::Batch(batch)) => (!depth_bits(batch.depth) as u64) << 32,
            (SortMode::BackToFront, QueueItem::Group(group)) => (!depth_bits(group.farthest) as u64) << 32,
            (SortMode::None, _) => 0,
        }
    }

    /// Sort this group and every nested group
    pub fn sort(&mut self) {
        for entry in &mut self.entries {
            if let QueueItem::Group(group) = &mut entry.item {
                group.sort();
            }
        }
        if self.entries.len() < 2 {
            return;
        }

        let mut keys: Vec<SortEntry> = self.entries.iter().enumerate().map(|(index, entry)| {
            let key = ((priority_bits(entry.priority) as u128) << 96)
                | ((self.secondary_key(&entry.item) as u128) << 32)
                | index as u128;
            SortEntry { key, index: index as u32 }
        }).collect();
        keys.radix_sort_unstable();

        let mut slots: Vec<Option<QueueEntry>> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(Some)
            .collect();
        self.entries = keys.iter()
            .filter_map(|key| slots[key.index as usize].take())
            .collect();
    }

    /// Apply and draw every batch in current order; returns the draw count
    pub fn render(&self, renderer: &mut dyn Renderer, tracker: &mut StateTracker) -> Result<u32> {
        let mut draws = 0;
        for entry in &self.entries {
            match &entry.item {
                QueueItem::Batch(batch) => {
                    tracker.apply_set(renderer, &batch.states)?;
                    renderer.draw(&batch.command)?;
                    draws += 1;
                }
                QueueItem::Group(group) => draws += group.render(renderer, tracker)?,
            }
        }
        Ok(draws)
    }
}

impl Default for QueueGroup {
    fn default() -> Self {
        Self::new(SortMode::default())
    }
}

/// One named queue
#[derive(Debug, Clone)]
pub struct RenderQueue {
    name: String,
    priority: i32,
    root: QueueGroup,
}

impl RenderQueue {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn group(&self) -> &QueueGroup {
        &self.root
    }
}

/// Registry of render queues, kept in render order
#[derive(Debug, Clone)]
pub struct RenderQueues {
    queues: Vec<RenderQueue>,
}

impl RenderQueues {
    pub const OPAQUE: &'static str = "opaque";
    pub const TRANSPARENT: &'static str = "transparent";
    pub const OVERLAY: &'static str = "overlay";

    /// Registry with the `opaque` (0), `transparent` (100) and `overlay`
    /// (200) queues
    pub fn new() -> Self {
        let mut queues = Self::empty();
        queues.queues.push(Self::make(Self::OPAQUE, 0, SortMode::FrontToBack));
        queues.queues.push(Self::make(Self::TRANSPARENT, 100, SortMode::BackToFront));
        queues.queues.push(Self::make(Self::OVERLAY, 200, SortMode::None));
        queues
    }

    pub fn empty() -> Self {
        Self { queues: Vec::new() }
    }

    fn make(name: &str, priority: i32, sort: SortMode) -> RenderQueue {
        RenderQueue { name: name.to_string(), priority, root: QueueGroup::new(sort) }
    }

    /// Register a queue; fails if the name is taken
    pub fn add_queue(&mut self, name: &str, priority: i32, sort: SortMode) -> Result<()> {
        if self.queue(name).is_some() {
            return Err(engine_err!("lumen3d::RenderQueues", "Render queue '{}' already exists", name));
        }
        let at = self.queues.partition_point(|queue| queue.priority <= priority);
        self.queues.insert(at, Self::make(name, priority, sort));
        Ok(())
    }

    pub fn queue(&self, name: &str) -> Option<&RenderQueue> {
        self.queues.iter().find(|queue| queue.name == name)
    }

    /// Queues in render order
    pub fn queues(&self) -> &[RenderQueue] {
        &self.queues
    }

    /// Root group of a queue; fails for unknown names
    pub fn group_mut(&mut self, name: &str) -> Result<&mut QueueGroup> {
        match self.queues.iter_mut().find(|queue| queue.name == name) {
            Some(queue) => Ok(&mut queue.root),
            None => Err(engine_err!("lumen3d::RenderQueues", "Unknown render queue '{}'", name)),
        }
    }

    pub fn enqueue(&mut self, name: &str, priority: i32, batch: Batch) -> Result<()> {
        self.group_mut(name)?.add_batch(priority, batch);
        Ok(())
    }

    pub fn batch_count(&self) -> usize {
        self.queues.iter().map(|queue| queue.root.batch_count()).sum()
    }

    pub fn sort(&mut self) {
        for queue in &mut self.queues {
            queue.root.sort();
        }
    }

    /// Sort, draw every queue in priority order, then empty the queues.
    ///
    /// Returns the number of draws.
    pub fn render(&mut self, renderer: &mut dyn Renderer, tracker: &mut StateTracker) -> Result<u32> {
        self.sort();
        let mut draws = 0;
        for queue in &self.queues {
            draws += queue.root.render(renderer, tracker)?;
        }
        self.clear();
        Ok(draws)
    }

    pub fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.root.clear();
        }
    }
}

impl Default for RenderQueues {
    fn default() -> Self {
        Self::new()
    }
}
