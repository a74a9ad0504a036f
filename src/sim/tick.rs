//! Fixed timestep simulation tick
//!
//! Core catch loop that advances the phase deterministically. Randomness
//! (spawn x, fall speed) comes only from the RNG handed in by the caller.

use rand::Rng;

use super::collision::{ItemOutcome, resolve_item};
use super::item::FallingItem;
use super::state::{CatchPhaseState, CatchStatus};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in play-area coordinates (catcher centers on it)
    pub pointer_x: Option<f32>,
    /// Idle/demo mode - autopilot steers the catcher
    pub idle_mode: bool,
}

/// Advance the catch phase by one fixed timestep
///
/// Order per tick: clock, catcher, spawn, then every live item falls and is
/// resolved. A win or a miss stops item processing for the rest of the tick.
pub fn tick<R: Rng + ?Sized>(
    state: &mut CatchPhaseState,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    // Time limit is independent of anything still falling
    if state.set_elapsed(state.elapsed_time + dt) {
        return;
    }

    // Update catcher position
    let target_x = if input.idle_mode {
        autopilot_target(state).or(input.pointer_x)
    } else {
        input.pointer_x
    };
    if let Some(x) = target_x {
        state.catcher.follow(x, state.play_width);
    }

    // Spawn
    if let Some(type_index) = state.spawner.tick(&state.catalog) {
        let id = state.next_item_id();
        let item = FallingItem::spawn(
            id,
            type_index,
            &state.catalog[type_index],
            state.play_width,
            state.item_size,
            rng,
        );
        state.items.push(item);
        state.items_spawned += 1;
    }

    // Fall + resolve
    let catcher = state.catcher.rect;
    let mut i = 0;
    while i < state.items.len() {
        state.items[i].fall();
        match resolve_item(&catcher, &state.items[i], state.play_height) {
            ItemOutcome::Caught => {
                let item = state.items.remove(i);
                state.register_catch(item.point_value);
                if state.status == CatchStatus::Won {
                    break;
                }
            }
            ItemOutcome::Missed => {
                let item = state.items.remove(i);
                state.register_miss(item.is_final);
                break;
            }
            ItemOutcome::InFlight => i += 1,
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Pure form of [`tick`]: returns the next state, leaving `state` untouched
pub fn advance<R: Rng + ?Sized>(
    state: &CatchPhaseState,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> CatchPhaseState {
    let mut next = state.clone();
    tick(&mut next, input, dt, rng);
    next
}

/// Track the item closest to the catcher (lowest on screen)
fn autopilot_target(state: &CatchPhaseState) -> Option<f32> {
    state
        .items
        .iter()
        .max_by(|a, b| {
            a.rect
                .bottom()
                .partial_cmp(&b.rect.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|item| item.rect.center().x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::GameConfig;
    use crate::sim::item::Rect;
    use crate::sim::state::LossReason;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn final_item(id: u32, x: f32, y: f32) -> FallingItem {
        FallingItem {
            id,
            type_index: 4,
            rect: Rect::new(x, y, ITEM_SIZE, ITEM_SIZE),
            fall_speed: 2.5,
            point_value: 10,
            is_final: true,
        }
    }

    #[test]
    fn test_tick_spawns_after_delay() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(12345);
        let input = TickInput::default();
        for _ in 0..INITIAL_SPAWN_DELAY - 1 {
            tick(&mut state, &input, SIM_DT, &mut rng);
        }
        assert!(state.items.is_empty());
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items_spawned, 1);
    }

    #[test]
    fn test_timeout_ignores_live_items() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(1);
        state.items.push(final_item(99, 0.0, 0.0));
        state.elapsed_time = TIME_LIMIT;
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.status, CatchStatus::Lost);
        assert_eq!(state.loss, Some(LossReason::TimeUp));
        // Nothing moved
        assert_eq!(state.items[0].rect.top(), 0.0);
    }

    #[test]
    fn test_final_miss_after_37_catches_loses() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..37 {
            state.register_catch(2);
        }
        state.spawner.type_index = state.catalog.len();
        state.items_spawned = 38;
        // Final item about to fall off the left side, catcher parked right
        state.items.push(final_item(100, 0.0, SCREEN_HEIGHT - 1.0));
        let input = TickInput {
            pointer_x: Some(SCREEN_WIDTH),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.status, CatchStatus::Lost);
        assert_eq!(state.items_caught, 37);
        assert_eq!(state.items_missed, 1);
        assert!(state.missed_final_item());
    }

    #[test]
    fn test_last_catch_wins() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..37 {
            state.register_catch(2);
        }
        state.spawner.type_index = state.catalog.len();
        let catcher_top = state.catcher.rect.top();
        let x = state.catcher.rect.left();
        state.items.push(final_item(100, x, catcher_top - ITEM_SIZE - 1.0));
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.status, CatchStatus::Won);
        assert_eq!(state.items_caught, state.total_to_catch);
        assert_eq!(state.score, 37 * 2 + 10);
    }

    #[test]
    fn test_miss_stops_processing() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(4);
        state.items.push(final_item(1, 0.0, SCREEN_HEIGHT));
        state.items.push(final_item(2, 500.0, 100.0));
        let input = TickInput {
            pointer_x: Some(SCREEN_WIDTH),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.status, CatchStatus::Lost);
        // Second item never advanced
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].rect.top(), 100.0);
    }

    #[test]
    fn test_lost_is_terminal() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(5);
        state.register_miss(false);
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.status, CatchStatus::Lost);
    }

    #[test]
    fn test_caught_iff_won_over_a_run() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(6);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(TIME_LIMIT as u32 * FPS + 10) {
            tick(&mut state, &input, SIM_DT, &mut rng);
            assert_eq!(
                state.items_caught == state.total_to_catch,
                state.status == CatchStatus::Won
            );
            assert!(state.items_caught + state.items_missed <= state.items_spawned);
            assert!(state.items_spawned <= state.total_to_catch);
            if state.is_over() {
                break;
            }
        }
        assert!(state.is_over());
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and inputs produce identical results
        let config = GameConfig::default();
        let mut state1 = CatchPhaseState::new(&config);
        let mut state2 = CatchPhaseState::new(&config);
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);

        let inputs = [
            TickInput {
                pointer_x: Some(120.0),
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for n in 0..600 {
            let input = &inputs[n % inputs.len()];
            tick(&mut state1, input, SIM_DT, &mut rng1);
            state2 = advance(&state2, input, SIM_DT, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.items.len(), state2.items.len());
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.status, state2.status);
        for (a, b) in state1.items.iter().zip(&state2.items) {
            assert_eq!(a.rect, b.rect);
            assert_eq!(a.fall_speed, b.fall_speed);
        }
    }
}
