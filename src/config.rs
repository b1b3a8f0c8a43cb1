/// Fixed tuning constants and difficulty tables.
///
/// Nothing here is read from disk; the grid and physics are deliberately
/// not user-configurable.

use std::time::Duration;

use crate::entities::Difficulty;

// ── Grid ─────────────────────────────────────────────────────────────────────

pub const GRID_WIDTH: i32 = 60;
pub const GRID_HEIGHT: i32 = 22;

/// Points needed to win a match.
pub const WIN_SCORE: u32 = 7;

// ── Scheduling ───────────────────────────────────────────────────────────────

/// Budget for one iteration of the main loop (≈22 ticks/sec).
pub const TICK: Duration = Duration::from_millis(45);

/// Upper bound on keypresses drained per tick.
pub const MAX_KEYS_PER_TICK: usize = 15;

/// Serve countdown length, in rounds of `COUNTDOWN_STEP`.
pub const COUNTDOWN_ROUNDS: u8 = 3;
pub const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

// ── Paddles ──────────────────────────────────────────────────────────────────

pub const PADDLE_HEIGHT: i32 = 5;
pub const PADDLE_HEIGHT_BIG: i32 = 7;
pub const PADDLE_HEIGHT_TINY: i32 = 3;

/// Rows moved per keypress.
pub const PADDLE_STEP: f32 = 2.0;

/// Columns the paddles are drawn in.
pub const LEFT_PADDLE_COLUMN: i32 = 1;
pub const RIGHT_PADDLE_COLUMN: i32 = GRID_WIDTH - 2;

// ── Ball ─────────────────────────────────────────────────────────────────────

pub const BALL_START_SPEED: f32 = 1.0;
pub const BALL_MIN_SPEED: f32 = 0.5;
pub const BALL_MAX_SPEED: f32 = 2.5;

/// Speed gained on every paddle return.
pub const PADDLE_SPEEDUP: f32 = 0.08;

/// Band the speed is pulled back into when an effect ends.
pub const TAME_SPEED_MIN: f32 = 0.8;
pub const TAME_SPEED_MAX: f32 = 1.5;

/// Bounds on |dy| after any bounce.
pub const MIN_DY: f32 = 0.3;
pub const MAX_DY: f32 = 0.9;

/// Guard on the wall reflection loop.
pub const MAX_WALL_REFLECTIONS: u32 = 10;

pub const TRAIL_LENGTH: usize = 4;

// ── Powerups ─────────────────────────────────────────────────────────────────

/// Per-tick chance of a field powerup appearing.
pub const POWERUP_SPAWN_CHANCE: f64 = 0.003;
/// Ticks an uncollected powerup stays on the field.
pub const POWERUP_FIELD_TICKS: u32 = 200;
/// Ticks a collected effect stays in force.
pub const POWERUP_EFFECT_TICKS: u32 = 150;

pub const FAST_FACTOR: f32 = 1.5;
pub const SLOW_FACTOR: f32 = 0.6;

// ── Screen shake ─────────────────────────────────────────────────────────────

pub const SHAKE_ON_HIT: u32 = 2;
pub const SHAKE_ON_SCORE: u32 = 5;

// ── Difficulty tables ────────────────────────────────────────────────────────

/// The CPU only reacts on ticks divisible by this.
pub fn react_every(difficulty: &Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 6,
        Difficulty::Medium => 3,
        Difficulty::Hard => 1,
    }
}

/// Half-width of the random error added to the CPU's aim.
pub fn aim_jitter(difficulty: &Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 4.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 0.0,
    }
}

/// Rows the CPU paddle moves per reaction.
pub fn cpu_step(difficulty: &Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 2.0,
        Difficulty::Hard => 2.0,
    }
}
