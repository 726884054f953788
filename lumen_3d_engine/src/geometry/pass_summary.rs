/// Union of the vertex data a set of passes reads.

use std::collections::BTreeSet;
use bitflags::bitflags;

bitflags! {
    /// Fixed-function arrays requested by a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SummaryFlags: u8 {
        const COLOR = 1 << 0;
        const NORMAL = 1 << 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PassSummary {
    /// Generic attribute names (shader inputs)
    pub attributes: BTreeSet<String>,
    /// Texture coordinate set indices
    pub tex_coord_sets: BTreeSet<u32>,
    pub flags: SummaryFlags,
}

impl PassSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_color(&self) -> bool {
        self.flags.contains(SummaryFlags::COLOR)
    }

    pub fn needs_normal(&self) -> bool {
        self.flags.contains(SummaryFlags::NORMAL)
    }

    /// Merge `other` into `self`
    pub fn add(&mut self, other: &PassSummary) {
        self.attributes.extend(other.attributes.iter().cloned());
        self.tex_coord_sets.extend(other.tex_coord_sets.iter().copied());
        self.flags |= other.flags;
    }

    pub fn union(&self, other: &PassSummary) -> PassSummary {
        let mut result = self.clone();
        result.add(other);
        result
    }
}
