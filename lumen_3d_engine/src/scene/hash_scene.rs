/// HashSceneIndex: multi-resolution spatial hash for frustum culling.
///
/// Levels are ordered coarsest to finest; level `ii` of `n` has cells of
/// size `finest * 2^(n-1-ii)`. Each cell is an integer `Coord` in a hash map
/// and holds the keys of the members overlapping it, plus the union of
/// their bounds.
///
/// Placement: a member goes into the finest level whose cell size is at
/// least its longest edge, and is registered in every cell of that level
/// its bounds overlap (at most 8). Members larger than the coarsest cells
/// are kept in an oversized list tested individually.
///
/// Cells are created on first insertion and deleted when they empty.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{Key, SecondaryMap};
use glam::Vec3;
use crate::camera::{Frustum, FrustumTest};
use crate::config::SpatialConfig;
use super::bounds::AABB;
use super::scene_index::{classify_against_box, QueryStats, SceneIndex};

/// Integer cell identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing `point` (saturating at the i32 range)
    pub fn floor(point: Vec3, size: f32) -> Self {
        let c = (point / size).floor();
        Self::new(c.x as i32, c.y as i32, c.z as i32)
    }

    /// Upper end of a query range: `ceil(point / size)`
    pub fn ceil(point: Vec3, size: f32) -> Self {
        let c = (point / size).ceil();
        Self::new(c.x as i32, c.y as i32, c.z as i32)
    }

    fn within(&self, lo: &Coord, hi: &Coord) -> bool {
        (lo.x..=hi.x).contains(&self.x)
            && (lo.y..=hi.y).contains(&self.y)
            && (lo.z..=hi.z).contains(&self.z)
    }

    /// Number of coordinates in the inclusive range `lo..=hi` (None if huge)
    fn range_volume(lo: &Coord, hi: &Coord) -> Option<u64> {
        let span = |a: i32, b: i32| if b < a { 0 } else { (b as i64 - a as i64 + 1) as u64 };
        span(lo.x, hi.x)
            .checked_mul(span(lo.y, hi.y))?
            .checked_mul(span(lo.z, hi.z))
    }
}

/// One hash cell
#[derive(Debug, Clone)]
pub struct Cell<K> {
    bounds: AABB,
    keys: Vec<K>,
}

impl<K> Cell<K> {
    /// Union of the members' bounds
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

/// One resolution of the hash
#[derive(Debug, Clone)]
pub struct Level<K> {
    size: f32,
    cells: FxHashMap<Coord, Cell<K>>,
}

impl<K> Level<K> {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn cell(&self, coord: &Coord) -> Option<&Cell<K>> {
        self.cells.get(coord)
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Cells { level: usize, lo: Coord, hi: Coord },
    Oversized,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    bounds: AABB,
    placement: Placement,
}

/// Multi-level spatial hash scene index
pub struct HashSceneIndex<K: Key> {
    /// Coarsest first
    levels: Vec<Level<K>>,
    oversized: Vec<K>,
    entries: SecondaryMap<K, Entry>,
}

impl<K: Key> HashSceneIndex<K> {
    /// Create an empty index
    ///
    /// # Arguments
    ///
    /// * `config` - Finest cell size and level count (assumed validated)
    pub fn new(config: &SpatialConfig) -> Self {
        let levels = (0..config.levels)
            .map(|ii| Level { size: config.cell_size(ii), cells: FxHashMap::default() })
            .collect();
        Self {
            levels,
            oversized: Vec::new(),
            entries: SecondaryMap::new(),
        }
    }

    /// Levels, coarsest first
    pub fn levels(&self) -> &[Level<K>] {
        &self.levels
    }

    pub fn oversized(&self) -> &[K] {
        &self.oversized
    }

    /// Total populated cells across all levels
    pub fn cell_count(&self) -> usize {
        self.levels.iter().map(Level::cell_count).sum()
    }

    fn place(&self, bounds: &AABB) -> Placement {
        if bounds.is_empty() {
            return Placement::Oversized;
        }
        let edge = bounds.longest_edge();
        match self.levels.iter().rposition(|level| level.size >= edge) {
            Some(level) => {
                let size = self.levels[level].size;
                Placement::Cells {
                    level,
                    lo: Coord::floor(bounds.min, size),
                    hi: Coord::floor(bounds.max, size),
                }
            }
            None => Placement::Oversized,
        }
    }

    fn remove_from_cell(&mut self, level: usize, coord: Coord, key: K) {
        let Some(cell) = self.levels[level].cells.get_mut(&coord) else {
            return;
        };
        if let Some(pos) = cell.keys.iter().position(|&k| k == key) {
            cell.keys.swap_remove(pos);
        }
        if cell.keys.is_empty() {
            self.levels[level].cells.remove(&coord);
            return;
        }
        let mut bounds = AABB::EMPTY;
        for member in &cell.keys {
            if let Some(entry) = self.entries.get(*member) {
                bounds.add_local(&entry.bounds);
            }
        }
        cell.bounds = bounds;
    }

    fn query_with(
        &self,
        region: &AABB,
        classify: impl Fn(&AABB) -> FrustumTest,
        results: &mut Vec<K>,
    ) -> QueryStats {
        let mut stats = QueryStats::default();
        let mut seen: FxHashSet<K> = FxHashSet::default();
        let mut emit = |key: K, stats: &mut QueryStats| {
            if seen.insert(key) {
                results.push(key);
                stats.results += 1;
            }
        };

        for level in &self.levels {
            if level.cells.is_empty() {
                continue;
            }
            let lo = Coord::floor(region.min, level.size);
            let hi = Coord::ceil(region.max, level.size);
            let volume = Coord::range_volume(&lo, &hi).unwrap_or(u64::MAX);
            if volume == 0 {
                continue;
            }

            let mut visit = |cell: &Cell<K>, stats: &mut QueryStats| {
                stats.cells_tested += 1;
                match classify(&cell.bounds) {
                    FrustumTest::Outside => {}
                    FrustumTest::Inside => {
                        stats.cells_visited += 1;
                        for &key in &cell.keys {
                            emit(key, stats);
                        }
                    }
                    FrustumTest::Partial => {
                        stats.cells_visited += 1;
                        for &key in &cell.keys {
                            stats.candidates += 1;
                            let hit = self.entries.get(key)
                                .is_some_and(|entry| classify(&entry.bounds) != FrustumTest::Outside);
                            if hit {
                                emit(key, stats);
                            }
                        }
                    }
                }
            };

            if volume > level.cells.len() as u64 {
                for (coord, cell) in &level.cells {
                    if coord.within(&lo, &hi) {
                        visit(cell, &mut stats);
                    }
                }
            } else {
                for x in lo.x..=hi.x {
                    for y in lo.y..=hi.y {
                        for z in lo.z..=hi.z {
                            if let Some(cell) = level.cells.get(&Coord::new(x, y, z)) {
                                visit(cell, &mut stats);
                            }
                        }
                    }
                }
            }
        }

        for &key in &self.oversized {
            stats.candidates += 1;
            let hit = self.entries.get(key)
                .is_some_and(|entry| classify(&entry.bounds) != FrustumTest::Outside);
            if hit {
                emit(key, &mut stats);
            }
        }
        stats
    }
}

impl<K: Key + Send + Sync> SceneIndex<K> for HashSceneIndex<K> {
    fn insert(&mut self, key: K, bounds: &AABB) {
        if self.entries.contains_key(key) {
            self.remove(key);
        }
        let placement = self.place(bounds);
        match placement {
            Placement::Cells { level, lo, hi } => {
                let cells = &mut self.levels[level].cells;
                for x in lo.x..=hi.x {
                    for y in lo.y..=hi.y {
                        for z in lo.z..=hi.z {
                            let cell = cells.entry(Coord::new(x, y, z)).or_insert_with(|| Cell {
                                bounds: AABB::EMPTY,
                                keys: Vec::new(),
                            });
                            cell.keys.push(key);
                            cell.bounds.add_local(bounds);
                        }
                    }
                }
            }
            Placement::Oversized => self.oversized.push(key),
        }
        self.entries.insert(key, Entry { bounds: *bounds, placement });
    }

    fn remove(&mut self, key: K) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        match entry.placement {
            Placement::Cells { level, lo, hi } => {
                for x in lo.x..=hi.x {
                    for y in lo.y..=hi.y {
                        for z in lo.z..=hi.z {
                            self.remove_from_cell(level, Coord::new(x, y, z), key);
                        }
                    }
                }
            }
            Placement::Oversized => {
                if let Some(pos) = self.oversized.iter().position(|&k| k == key) {
                    self.oversized.swap_remove(pos);
                }
            }
        }
        true
    }

    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<K>) -> QueryStats {
        self.query_with(frustum.bounds(), |bounds| frustum.classify_aabb(bounds), results)
    }

    fn query_bounds(&self, bounds: &AABB, results: &mut Vec<K>) -> QueryStats {
        self.query_with(bounds, |member| classify_against_box(bounds, member), results)
    }

    fn bounds(&self, key: K) -> Option<AABB> {
        self.entries.get(key).map(|entry| entry.bounds)
    }

    fn clear(&mut self) {
        for level in &mut self.levels {
            level.cells.clear();
        }
        self.oversized.clear();
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "hash_scene_tests.rs"]
mod tests;
