/// Tracks the states last pushed to a renderer so identical states are not
/// re-applied.

use crate::error::Result;
use crate::state::{RenderState, RenderStateSet, RenderStateType, STATE_COUNT};
use super::renderer::Renderer;

#[derive(Debug, Default)]
pub struct StateTracker {
    current: [Option<RenderState>; STATE_COUNT],
    applied: u64,
    skipped: u64,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `state` unless an equal state is already current.
    ///
    /// Returns `true` if the renderer was called.
    pub fn apply(&mut self, renderer: &mut dyn Renderer, state: &RenderState) -> Result<bool> {
        let slot = &mut self.current[state.state_type().index()];
        if slot.as_ref() == Some(state) {
            self.skipped += 1;
            return Ok(false);
        }
        state.apply(renderer)?;
        *slot = Some(state.clone());
        self.applied += 1;
        Ok(true)
    }

    /// Apply every present state of `states`, returning how many changed
    pub fn apply_set(&mut self, renderer: &mut dyn Renderer, states: &RenderStateSet) -> Result<u32> {
        let mut changed = 0;
        for state in states.iter() {
            if self.apply(renderer, state)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn current(&self, state_type: RenderStateType) -> Option<&RenderState> {
        self.current[state_type.index()].as_ref()
    }

    /// Forget the current states (after the context was reset externally)
    pub fn invalidate(&mut self) {
        self.current = Default::default();
    }

    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
#[path = "state_tracker_tests.rs"]
mod tests;
