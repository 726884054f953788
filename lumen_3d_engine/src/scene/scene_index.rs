/// Spatial acceleration structures for scene queries.
///
/// A SceneIndex indexes scene members by their world-space AABB
/// for efficient frustum culling and spatial queries.
///
/// Ownership: the scene owns one index per member kind (elements,
/// influences, viewer effects) and keeps them in sync with member bounds.

use slotmap::{Key, SecondaryMap};
use crate::camera::{Frustum, FrustumTest};
use super::bounds::AABB;

/// Work done by one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Cells looked up and classified
    pub cells_tested: u32,
    /// Cells not classified `Outside`
    pub cells_visited: u32,
    /// Members whose bounds were tested individually
    pub candidates: u32,
    /// Keys appended to the results
    pub results: u32,
}

/// Trait for spatial indexing of scene members.
///
/// Every query appends each matching key at most once.
pub trait SceneIndex<K: Key>: Send + Sync {
    /// Insert a member with its world-space AABB (replacing any previous entry).
    fn insert(&mut self, key: K, bounds: &AABB);

    /// Remove a member; returns `false` if it was not indexed.
    fn remove(&mut self, key: K) -> bool;

    /// Update a member's world-space AABB (e.g. after transform change).
    fn update(&mut self, key: K, bounds: &AABB) {
        self.remove(key);
        self.insert(key, bounds);
    }

    /// Append all members whose bounds intersect the frustum.
    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<K>) -> QueryStats;

    /// Append all members whose bounds intersect `bounds`.
    fn query_bounds(&self, bounds: &AABB, results: &mut Vec<K>) -> QueryStats;

    /// Indexed bounds of a member
    fn bounds(&self, key: K) -> Option<AABB>;

    /// Remove all members from the index.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 3-way classification of `bounds` against a query box
pub(crate) fn classify_against_box(query: &AABB, bounds: &AABB) -> FrustumTest {
    if bounds.is_empty() || !query.intersects(bounds) {
        FrustumTest::Outside
    } else if query.contains(bounds) {
        FrustumTest::Inside
    } else {
        FrustumTest::Partial
    }
}

// ============================================================================
// BRUTE FORCE
// ============================================================================

/// Tests every member against every query.
///
/// Reference implementation for small scenes and for checking the
/// hashed index.
pub struct BruteForceSceneIndex<K: Key> {
    members: SecondaryMap<K, AABB>,
}

impl<K: Key> BruteForceSceneIndex<K> {
    pub fn new() -> Self {
        Self { members: SecondaryMap::new() }
    }

    fn query_with(
        &self,
        classify: impl Fn(&AABB) -> FrustumTest,
        results: &mut Vec<K>,
    ) -> QueryStats {
        let mut stats = QueryStats::default();
        for (key, bounds) in &self.members {
            stats.candidates += 1;
            if classify(bounds) != FrustumTest::Outside {
                results.push(key);
                stats.results += 1;
            }
        }
        stats
    }
}

impl<K: Key> Default for BruteForceSceneIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key + Send + Sync> SceneIndex<K> for BruteForceSceneIndex<K> {
    fn insert(&mut self, key: K, bounds: &AABB) {
        self.members.insert(key, *bounds);
    }

    fn remove(&mut self, key: K) -> bool {
        self.members.remove(key).is_some()
    }

    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<K>) -> QueryStats {
        self.query_with(|bounds| frustum.classify_aabb(bounds), results)
    }

    fn query_bounds(&self, bounds: &AABB, results: &mut Vec<K>) -> QueryStats {
        self.query_with(|member| classify_against_box(bounds, member), results)
    }

    fn bounds(&self, key: K) -> Option<AABB> {
        self.members.get(key).copied()
    }

    fn clear(&mut self) {
        self.members.clear();
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}
