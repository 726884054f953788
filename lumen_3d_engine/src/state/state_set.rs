/// Fixed-size array of optional render states, one slot per type.
///
/// A full set (every slot `Some`) describes complete pipeline state; a
/// sparse set describes overrides applied on top of a base with `copy`.

use super::render_state::{RenderState, RenderStateType, STATE_COUNT};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStateSet {
    states: [Option<RenderState>; STATE_COUNT],
}

impl RenderStateSet {
    /// One empty slot per render state type
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from any number of states (later states win per slot)
    pub fn from_states<I: IntoIterator<Item = RenderState>>(states: I) -> Self {
        let mut set = Self::empty();
        for state in states {
            set.set(state);
        }
        set
    }

    pub fn get(&self, state_type: RenderStateType) -> Option<&RenderState> {
        self.states[state_type.index()].as_ref()
    }

    /// Store `state` in its type's slot, returning the previous occupant
    pub fn set(&mut self, state: RenderState) -> Option<RenderState> {
        let index = state.state_type().index();
        self.states[index].replace(state)
    }

    pub fn clear(&mut self, state_type: RenderStateType) -> Option<RenderState> {
        self.states[state_type.index()].take()
    }

    /// Slots in index order
    pub fn slots(&self) -> &[Option<RenderState>; STATE_COUNT] {
        &self.states
    }

    /// Present states in index order
    pub fn iter(&self) -> impl Iterator<Item = &RenderState> {
        self.states.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.states.iter().all(Option::is_none)
    }

    /// Every slot populated
    pub fn is_full(&self) -> bool {
        self.states.iter().all(Option::is_some)
    }

    /// Sparse override: every `Some` slot of `src` overwrites the same slot of
    /// `dst`; `None` slots of `src` leave `dst` unchanged.
    pub fn copy(src: &RenderStateSet, dst: &mut RenderStateSet) {
        for (source, target) in src.states.iter().zip(dst.states.iter_mut()) {
            if let Some(state) = source {
                *target = Some(state.clone());
            }
        }
    }

    /// A copy of `self` with `overrides` applied on top
    pub fn overlaid(&self, overrides: &RenderStateSet) -> RenderStateSet {
        let mut result = self.clone();
        Self::copy(overrides, &mut result);
        result
    }
}
