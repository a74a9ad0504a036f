//! Spawn scheduling
//!
//! Walks the catalogue in order, emitting one item every `delay` ticks.
//! The delay shrinks as later (harder) types come up, and a fixed pause is
//! taken when one type runs out and the next begins.

use serde::{Deserialize, Serialize};

use super::catalog::ItemTypeSpec;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Catalogue entry currently being spawned
    pub type_index: usize,
    /// Items of `type_index` spawned so far
    pub count_so_far: u32,
    /// Ticks since the last firing
    pub timer: u32,
    /// Ticks between firings
    pub delay: u32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self {
            type_index: 0,
            count_so_far: 0,
            timer: 0,
            delay: INITIAL_SPAWN_DELAY,
        }
    }
}

/// Steady-state delay for a catalogue index
pub fn spawn_delay_for(type_index: usize) -> u32 {
    let step = SPAWN_DELAY_STEP.saturating_mul(type_index as u32);
    INITIAL_SPAWN_DELAY.saturating_sub(step).max(MIN_SPAWN_DELAY)
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalogue entry has been spawned in full
    pub fn is_exhausted(&self, catalog: &[ItemTypeSpec]) -> bool {
        self.type_index >= catalog.len()
    }

    /// Advance one tick. Returns the catalogue index of the item to emit, if any.
    ///
    /// A firing that finds the current type used up moves the cursor to the
    /// next type instead of emitting, and arms the inter-type pause.
    pub fn tick(&mut self, catalog: &[ItemTypeSpec]) -> Option<usize> {
        self.timer += 1;
        if self.timer < self.delay {
            return None;
        }
        self.timer = 0;

        let spec = catalog.get(self.type_index)?;
        if self.count_so_far < spec.total_count {
            let index = self.type_index;
            self.count_so_far += 1;
            self.delay = spawn_delay_for(index);
            return Some(index);
        }

        self.type_index += 1;
        self.count_so_far = 0;
        if let Some(next) = catalog.get(self.type_index) {
            log::debug!("Spawning next item type: {}", next.name);
            self.delay = TYPE_CHANGE_PAUSE;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::default_catalog;

    #[test]
    fn test_delay_curve() {
        assert_eq!(spawn_delay_for(0), 60);
        assert_eq!(spawn_delay_for(1), 50);
        assert_eq!(spawn_delay_for(3), 30);
        assert_eq!(spawn_delay_for(4), 20);
        assert_eq!(spawn_delay_for(9), 20);
    }

    #[test]
    fn test_first_spawn_after_initial_delay() {
        let catalog = default_catalog();
        let mut sched = SpawnScheduler::new();
        for _ in 0..INITIAL_SPAWN_DELAY - 1 {
            assert_eq!(sched.tick(&catalog), None);
        }
        assert_eq!(sched.tick(&catalog), Some(0));
        assert_eq!(sched.count_so_far, 1);
    }

    #[test]
    fn test_emits_whole_catalogue_in_order() {
        let catalog = default_catalog();
        let mut sched = SpawnScheduler::new();
        let mut emitted = Vec::new();
        let mut type_changes = 0;
        for _ in 0..10_000 {
            let before = sched.type_index;
            if let Some(index) = sched.tick(&catalog) {
                emitted.push(index);
            }
            if sched.type_index != before && !sched.is_exhausted(&catalog) {
                assert_eq!(sched.delay, TYPE_CHANGE_PAUSE);
                type_changes += 1;
            }
        }
        assert_eq!(type_changes, 4);
        assert!(sched.is_exhausted(&catalog));
        assert_eq!(emitted.len(), 38);
        assert!(emitted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(emitted.iter().filter(|&&i| i == 0).count(), 15);
        assert_eq!(*emitted.last().unwrap(), 4);
    }
}
