//! Per-frame simulation step
//!
//! One call per rendered frame, no sub-stepping. All timers count frames.

use super::collision::overlaps;
use super::particles;
use super::spawn::{spawn_shape, split_fragments};
use super::state::{GameEvent, GamePhase, GameState, Shape, ShapeKind};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Move-left held
    pub left: bool,
    /// Move-right held
    pub right: bool,
    /// Touch/pointer x in playfield pixels; centers the player and
    /// overrides the direction keys for this frame
    pub pointer_x: Option<f32>,
}

/// Advance the game state by one frame, returning what happened.
///
/// Does nothing unless the game is `Active`. The frame that ends the run stops
/// after the shape pass and particles, so `GameOver { score }` is the final score.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Active {
        return events;
    }

    state.frame += 1;

    move_player(state, input);
    run_spawners(state, &mut events);

    let game_over = update_shapes(state, &mut events);
    particles::advance(&mut state.particles, state.tuning.particles.life_decay);
    if game_over {
        return events;
    }

    // Survival trickle
    state.timers.survival += 1;
    if state.timers.survival >= state.tuning.survival_period {
        state.score += state.tuning.survival_points * state.combo.max(1) as f64;
        state.timers.survival = 0;
    }

    ramp_difficulty(state);

    if let Some(score) = state.take_score_change() {
        events.push(GameEvent::ScoreChanged(score));
    }

    events
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    match input.pointer_x {
        Some(px) if px.is_finite() => player.x = px - player.width / 2.0,
        _ => {
            if input.left {
                player.x -= player.speed;
            }
            if input.right {
                player.x += player.speed;
            }
        }
    }

    let max_x = player.max_x(&state.playfield);
    player.x = player.x.clamp(0.0, max_x);
}

fn run_spawners(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.timers.spawn += 1;
    if state.timers.spawn >= state.spawn_interval {
        let shape = spawn_shape(
            None,
            state.game_speed,
            &state.playfield,
            &state.tuning,
            &mut state.rng,
        );
        state.shapes.push(shape);
        state.timers.spawn = 0;
    }

    state.timers.boss += 1;
    if state.timers.boss >= state.tuning.boss_period {
        let boss = spawn_shape(
            Some(ShapeKind::Boss),
            state.game_speed,
            &state.playfield,
            &state.tuning,
            &mut state.rng,
        );
        log::debug!("Boss incoming at x={:.0} (frame {})", boss.x, state.frame);
        state.shapes.push(boss);
        state.timers.boss = 0;
        events.push(GameEvent::BossSpawned);
    }
}

/// Move, split, collide and cull every shape.
///
/// Survivors are rebuilt into a fresh vector in their original order;
/// splitter fragments go after them and are first processed next frame.
/// Returns true if the player was hit.
fn update_shapes(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let player_rect = state.player.rect();
    let bottom = state.playfield.height;

    let mut shapes = std::mem::take(&mut state.shapes).into_iter();
    let mut kept: Vec<Shape> = Vec::with_capacity(shapes.len());
    let mut fragments: Vec<Shape> = Vec::new();
    let mut game_over = false;

    while let Some(mut shape) = shapes.next() {
        shape.advance();

        if shape.ready_to_split(&state.playfield) {
            shape.has_split = true;
            fragments.extend(split_fragments(&shape, &state.tuning.splitter));
            events.push(GameEvent::SplitterBurst {
                x: shape.x,
                y: shape.y,
            });
            continue;
        }

        if overlaps(&player_rect, &shape.rect()) {
            if !shape.kind.is_hazard() {
                collect_bonus(state, &shape, events);
                continue;
            }

            // Fatal: the hit shape and everything not yet visited stay put
            kept.push(shape);
            kept.extend(shapes.by_ref());
            end_run(state, events);
            game_over = true;
            break;
        }

        if shape.y > bottom {
            register_dodge(state, shape.kind, events);
            continue;
        }

        kept.push(shape);
    }

    kept.append(&mut fragments);
    state.shapes = kept;
    game_over
}

fn collect_bonus(state: &mut GameState, shape: &Shape, events: &mut Vec<GameEvent>) {
    let points = state.tuning.bonus_points * state.combo.max(1) as f64;
    state.score += points;
    state.combo += 1;
    particles::emit(
        &mut state.particles,
        shape.center(),
        shape.color,
        &state.tuning.particles,
        &mut state.rng,
    );
    events.push(GameEvent::BonusCollected {
        points: points.floor() as u64,
        combo: state.combo,
    });
}

fn end_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::Over;
    particles::emit(
        &mut state.particles,
        state.player.center(),
        state.player.color,
        &state.tuning.particles,
        &mut state.rng,
    );

    let score = state.floored_score();
    log::info!("Game over at frame {} with score {}", state.frame, score);
    events.push(GameEvent::GameOver { score });
}

/// A dodge soon after the previous one extends the combo, a lull resets it
fn register_dodge(state: &mut GameState, kind: ShapeKind, events: &mut Vec<GameEvent>) {
    let frame = state.frame;
    state.combo = match state.last_dodge_frame {
        Some(prev) if frame - prev <= state.tuning.combo_window_frames => state.combo + 1,
        _ => 1,
    };
    state.last_dodge_frame = Some(frame);
    events.push(GameEvent::ShapeDodged {
        kind,
        combo: state.combo,
    });
}

fn ramp_difficulty(state: &mut GameState) {
    state.timers.difficulty += 1;
    if state.timers.difficulty < state.tuning.difficulty_period {
        return;
    }

    let tuning = &state.tuning;
    state.game_speed += tuning.game_speed_step;
    state.spawn_interval = state
        .spawn_interval
        .saturating_sub(tuning.spawn_interval_step)
        .max(tuning.min_spawn_interval);
    state.timers.difficulty = 0;
    log::debug!(
        "Difficulty up: speed {:.2}, spawn every {} frames",
        state.game_speed,
        state.spawn_interval
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Playfield, palette};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn active_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(Playfield::new(800.0, 600.0), tuning, 12345);
        state.reset();
        state
    }

    /// Tuning with the random spawner effectively switched off
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_spawn_interval: u32::MAX,
            ..Tuning::default()
        }
    }

    fn shape_at(kind: ShapeKind, x: f32, y: f32, size: f32) -> Shape {
        Shape {
            kind,
            x,
            y,
            size,
            speed: 5.0,
            rotation: 0.0,
            rotation_speed: 0.03,
            has_split: false,
            color: kind.color(),
        }
    }

    #[test]
    fn test_idle_and_over_are_frozen() {
        let mut state = GameState::new(Playfield::new(800.0, 600.0), Tuning::default(), 1);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.frame, 0);
        assert_eq!(state.timers.spawn, 0);

        state.reset();
        state.phase = GamePhase::Over;
        let before = state.clone();
        tick(
            &mut state,
            &TickInput {
                left: true,
                ..Default::default()
            },
        );
        assert_eq!(state.frame, before.frame);
        assert_eq!(state.player.x, before.player.x);
        assert_eq!(state.timers, before.timers);
    }

    #[test]
    fn test_keys_move_and_clamp() {
        let mut state = active_state(quiet_tuning());
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.player.x, 373.0);

        for _ in 0..200 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.x, 0.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.x, 760.0);
    }

    #[test]
    fn test_pointer_overrides_keys() {
        let mut state = active_state(quiet_tuning());
        let input = TickInput {
            left: true,
            right: false,
            pointer_x: Some(100.0),
        };
        tick(&mut state, &input);
        assert_eq!(state.player.x, 80.0);

        let input = TickInput {
            pointer_x: Some(10_000.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.x, 760.0);
    }

    #[test]
    fn test_random_spawn_cadence() {
        let mut state = active_state(Tuning::default());
        for _ in 0..44 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.shapes.is_empty());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.shapes.len(), 1);
        assert_eq!(state.timers.spawn, 0);
    }

    #[test]
    fn test_bonus_pickup_scores_and_continues() {
        let mut state = active_state(quiet_tuning());
        let player = state.player.rect();
        // Overlaps the player once it falls 5px
        state.shapes.push(shape_at(ShapeKind::Bonus, player.x, player.y - 20.0, 25.0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 50.0);
        assert_eq!(state.combo, 2);
        assert!(state.shapes.is_empty());
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.particles.len(), 15);
        assert!(events.contains(&GameEvent::BonusCollected {
            points: 50,
            combo: 2
        }));
        assert!(events.contains(&GameEvent::ScoreChanged(50)));
    }

    #[test]
    fn test_bonus_uses_combo_multiplier() {
        let mut state = active_state(quiet_tuning());
        state.combo = 3;
        let player = state.player.rect();
        state.shapes.push(shape_at(ShapeKind::Bonus, player.x, player.y, 25.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 150.0);
        assert_eq!(state.combo, 4);
    }

    #[test]
    fn test_cube_hit_ends_game() {
        let mut state = active_state(quiet_tuning());
        let player = state.player.rect();
        state.shapes.push(shape_at(ShapeKind::Cube, player.x, player.y - 20.0, 40.0));
        state.score = 10.0;

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(events, vec![GameEvent::GameOver { score: 10 }]);

        // Burst at the player's center in the player's color, aged one frame
        assert_eq!(state.particles.len(), 15);
        let center = player.center();
        for p in &state.particles {
            assert_eq!(p.color, palette::PLAYER);
            assert!((p.pos - center).length() <= 4.0 * 2f32.sqrt() + 1e-3);
        }

        // Frozen from here on
        let frozen_score = state.score;
        for _ in 0..300 {
            assert!(tick(&mut state, &TickInput::default()).is_empty());
        }
        assert_eq!(state.score, frozen_score);
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn test_game_over_frame_skips_survival_and_ramp() {
        let mut state = active_state(quiet_tuning());
        state.timers.survival = 59;
        state.timers.difficulty = 239;
        state.score = 7.0;
        let player = state.player.rect();
        state.shapes.push(shape_at(ShapeKind::Cube, player.x, player.y - 20.0, 40.0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::GameOver { score: 7 }]);
        assert_eq!(state.score, 7.0);
        assert_eq!(state.timers.survival, 59);
        assert_eq!(state.timers.difficulty, 239);
        assert_eq!(state.game_speed, 1.5);
    }

    #[test]
    fn test_fatal_hit_leaves_unvisited_shapes_untouched() {
        let mut state = active_state(quiet_tuning());
        let player = state.player.rect();
        state.shapes.push(shape_at(ShapeKind::Spike, player.x, player.y, 40.0));
        state.shapes.push(shape_at(ShapeKind::Disc, 10.0, 100.0, 40.0));

        tick(&mut state, &TickInput::default());
        assert!(state.is_over());
        assert_eq!(state.shapes.len(), 2);
        assert_eq!(state.shapes[1].y, 100.0);
    }

    #[test]
    fn test_splitter_bursts_once() {
        let mut state = active_state(quiet_tuning());
        // Far from the player, just above the midpoint
        state.shapes.push(shape_at(ShapeKind::Splitter, 100.0, 297.0, 40.0));

        let events = tick(&mut state, &TickInput::default());
        assert!(events.iter().any(|e| matches!(e, GameEvent::SplitterBurst { .. })));
        assert_eq!(state.shapes.len(), 5);
        assert!(state.shapes.iter().all(|s| s.kind == ShapeKind::Cube && s.has_split));

        let xs: Vec<f32> = state.shapes.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![50.0, 75.0, 100.0, 125.0, 150.0]);
        assert!(state.shapes.iter().all(|s| (s.speed - 9.0).abs() < 1e-4));

        // Fragments fall on without splitting again
        for _ in 0..5 {
            let events = tick(&mut state, &TickInput::default());
            assert!(!events.iter().any(|e| matches!(e, GameEvent::SplitterBurst { .. })));
        }
        assert_eq!(state.shapes.len(), 5);
    }

    #[test]
    fn test_dodge_combo_window() {
        let mut state = active_state(quiet_tuning());
        state.shapes.push(shape_at(ShapeKind::Cube, 0.0, 598.0, 40.0));
        let events = tick(&mut state, &TickInput::default());
        assert!(state.shapes.is_empty());
        assert_eq!(state.combo, 1);
        assert!(events.contains(&GameEvent::ShapeDodged {
            kind: ShapeKind::Cube,
            combo: 1
        }));

        // Second dodge inside the window
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        state.shapes.push(shape_at(ShapeKind::Disc, 0.0, 598.0, 40.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.combo, 2);

        // After a long lull the combo drops back
        for _ in 0..121 {
            tick(&mut state, &TickInput::default());
        }
        state.shapes.push(shape_at(ShapeKind::Disc, 0.0, 598.0, 40.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_survival_scoring() {
        let mut state = active_state(quiet_tuning());
        state.combo = 2;
        let mut events = Vec::new();
        for _ in 0..60 {
            events = tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 2.0);
        assert_eq!(events, vec![GameEvent::ScoreChanged(2)]);
    }

    #[test]
    fn test_difficulty_ramp_after_240_frames() {
        let mut state = active_state(Tuning::default());
        for _ in 0..239 {
            state.shapes.clear();
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.game_speed, 1.5);
        assert_eq!(state.spawn_interval, 45);

        state.shapes.clear();
        tick(&mut state, &TickInput::default());
        assert!((state.game_speed - 1.65).abs() < 1e-6);
        assert_eq!(state.spawn_interval, 42);
        assert_eq!(state.timers.difficulty, 0);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut state = active_state(quiet_tuning());
        state.spawn_interval = 22;
        state.timers.difficulty = 239;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.spawn_interval, 20);
        state.timers.difficulty = 239;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.spawn_interval, 20);
    }

    #[test]
    fn test_boss_timer_spawns_exactly_one() {
        let mut state = active_state(quiet_tuning());
        let mut boss_events = 0;
        for _ in 0..720 {
            let events = tick(&mut state, &TickInput::default());
            boss_events += events
                .iter()
                .filter(|e| matches!(e, GameEvent::BossSpawned))
                .count();
        }
        assert_eq!(boss_events, 1);
        let bosses: Vec<_> = state
            .shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Boss)
            .collect();
        assert_eq!(bosses.len(), 1);
        assert_eq!(bosses[0].size, 80.0);
        assert_eq!(state.timers.boss, 0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                pointer_x: Some(200.0),
                ..Default::default()
            },
        ];

        let mut a = active_state(Tuning::default());
        let mut b = active_state(Tuning::default());
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            assert_eq!(tick(&mut a, input), tick(&mut b, input));
        }
        assert_eq!(a.shapes, b.shapes);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (
            any::<bool>(),
            any::<bool>(),
            proptest::option::of(-5000.0f32..5000.0),
        )
            .prop_map(|(left, right, pointer_x)| TickInput {
                left,
                right,
                pointer_x,
            })
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(arb_input(), 1..400),
        ) {
            let mut state = GameState::new(Playfield::new(600.0, 800.0), Tuning::default(), seed);
            state.reset();
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!(state.player.x >= 0.0);
                prop_assert!(state.player.x <= 600.0 - state.player.width);
            }
        }

        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(arb_input(), 1..600),
        ) {
            let mut state = GameState::new(Playfield::new(800.0, 600.0), Tuning::default(), seed);
            state.reset();
            let mut last = state.score;
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }

        #[test]
        fn prop_game_over_fires_once(
            seed in any::<u64>(),
            frames in 1usize..3000,
        ) {
            let mut state = GameState::new(Playfield::new(400.0, 600.0), Tuning::default(), seed);
            state.reset();
            let mut game_overs = 0;
            for _ in 0..frames {
                game_overs += tick(&mut state, &TickInput::default())
                    .iter()
                    .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                    .count();
            }
            prop_assert!(game_overs <= 1);
            prop_assert_eq!(game_overs == 1, state.is_over());
        }

        #[test]
        fn prop_splitters_burst_at_most_once(
            drops in proptest::collection::vec((0.0f32..760.0, -300.0f32..0.0, 2.0f32..8.0), 1..6),
        ) {
            let mut state = active_state(quiet_tuning());
            for &(x, y, speed) in &drops {
                let mut splitter = shape_at(ShapeKind::Splitter, x, y, 40.0);
                splitter.speed = speed;
                state.shapes.push(splitter);
            }

            let mut bursts = 0;
            for _ in 0..600 {
                bursts += tick(&mut state, &TickInput::default())
                    .iter()
                    .filter(|e| matches!(e, GameEvent::SplitterBurst { .. }))
                    .count();
                prop_assert!(
                    !state
                        .shapes
                        .iter()
                        .any(|s| s.kind == ShapeKind::Splitter && s.has_split)
                );
            }
            prop_assert!(bursts <= drops.len());
            if !state.is_over() {
                prop_assert_eq!(bursts, drops.len());
            }
        }
    }
}
