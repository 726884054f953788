/// Per-pass visitation stamps.
///
/// Each enqueue pass draws a fresh non-zero id from a `VisitCounter`;
/// members reached more than once in the same pass are skipped by comparing
/// against their `VisitStamp`.

/// Last visitation id seen by a scene member (0 = never visited)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitStamp {
    last_visit: u32,
}

impl VisitStamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `visit`; returns `false` if it was already the last visit.
    pub fn update_last_visit(&mut self, visit: u32) -> bool {
        if self.last_visit == visit {
            return false;
        }
        self.last_visit = visit;
        true
    }

    pub fn last_visit(&self) -> u32 {
        self.last_visit
    }
}

/// Source of visitation ids; never yields 0
#[derive(Debug, Clone, Default)]
pub struct VisitCounter {
    current: u32,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u32 {
        self.current = self.current.wrapping_add(1);
        if self.current == 0 {
            self.current = 1;
        }
        self.current
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}
