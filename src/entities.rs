/// Game entity types: pure data, no logic.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{
    BALL_START_SPEED, GRID_HEIGHT, GRID_WIDTH, LEFT_PADDLE_COLUMN, PADDLE_HEIGHT,
    RIGHT_PADDLE_COLUMN, TRAIL_LENGTH, WIN_SCORE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Player 1, left paddle.
    Left,
    /// Player 2 or the CPU, right paddle.
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Pvp,
    Cpu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps a menu index (0, 1, 2) to a difficulty; anything above 2 is Hard.
    pub fn from_index(index: usize) -> Difficulty {
        match index {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// 1 for Easy through 3 for Hard.
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Difficulty,
    Playing,
    GameOver,
}

/// A value held once per player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerSide<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerSide<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

// ── Paddles & ball ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Paddle {
    /// Top row, kept within `0 ..= grid_height - height`.
    pub y: f32,
    /// 3, 5 or 7 rows depending on the active effect.
    pub height: i32,
    pub column: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// Steps per tick; lives in `BALL_MIN_SPEED ..= BALL_MAX_SPEED`.
    pub speed: f32,
    /// Fractional steps carried over between ticks.
    pub accum: f32,
    /// Oldest position first, at most `TRAIL_LENGTH` entries.
    pub trail: VecDeque<(f32, f32)>,
}

// ── Effects ──────────────────────────────────────────────────────────────────

/// A short-lived visual speck.  Removed once `life` reaches zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub life: i32,
    pub glyph: char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    /// Collector's paddle grows to 7 rows.
    Big,
    /// Ball speed × 1.5, capped.
    Fast,
    /// Ball speed × 0.6, floored.
    Slow,
    /// Opponent's paddle shrinks to 3 rows.
    Tiny,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Big,
        PowerupKind::Fast,
        PowerupKind::Slow,
        PowerupKind::Tiny,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Big => "BIG",
            PowerupKind::Fast => "FAST",
            PowerupKind::Slow => "SLOW",
            PowerupKind::Tiny => "TINY",
        }
    }
}

/// An uncollected powerup sitting on the field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPowerup {
    pub x: i32,
    pub y: i32,
    pub kind: PowerupKind,
    pub ticks_left: u32,
}

/// The consequence of a collected powerup while it is in force.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    pub kind: PowerupKind,
    pub ticks_left: u32,
    pub owner: Side,
}

// ── Session bookkeeping ──────────────────────────────────────────────────────

/// Serve countdown.  Ball physics is frozen while `rounds > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    pub rounds: u8,
    /// Clock reading when `rounds` last changed.
    pub stamped_at: Duration,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RallyStats {
    /// Returns since the last serve.
    pub current: u32,
    pub longest: u32,
    /// Points played this match.
    pub total: u32,
}

/// One match: everything the simulation reads and writes while playing.
#[derive(Clone, Debug)]
pub struct Session {
    pub width: i32,
    pub height: i32,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub score: PerSide<u32>,
    pub win_score: u32,
    pub combo: PerSide<u32>,
    pub rally: RallyStats,
    pub particles: Vec<Particle>,
    pub field_powerup: Option<FieldPowerup>,
    pub effect: Option<ActiveEffect>,
    pub countdown: Countdown,
    pub paused: bool,
    pub winner: Option<Side>,
    pub started_at: Duration,
    /// Match length, set once a winner is known.
    pub total_time: Duration,
    pub shake_frames: u32,
    /// Horizontal field offset (-1, 0 or 1) for the current frame.
    pub shake_offset: i32,
    /// Ticks simulated while playing; paces the CPU.
    pub tick: u64,
}

impl Default for Session {
    fn default() -> Self {
        let paddle_y = (GRID_HEIGHT / 2 - PADDLE_HEIGHT / 2) as f32;
        Session {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            mode: Mode::Pvp,
            difficulty: Difficulty::Medium,
            left: Paddle {
                y: paddle_y,
                height: PADDLE_HEIGHT,
                column: LEFT_PADDLE_COLUMN,
            },
            right: Paddle {
                y: paddle_y,
                height: PADDLE_HEIGHT,
                column: RIGHT_PADDLE_COLUMN,
            },
            ball: Ball {
                x: (GRID_WIDTH / 2) as f32,
                y: (GRID_HEIGHT / 2) as f32,
                dx: 1.0,
                dy: 0.0,
                speed: BALL_START_SPEED,
                accum: 0.0,
                trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            },
            score: PerSide::default(),
            win_score: WIN_SCORE,
            combo: PerSide::default(),
            rally: RallyStats::default(),
            particles: Vec::new(),
            field_powerup: None,
            effect: None,
            countdown: Countdown {
                rounds: 0,
                stamped_at: Duration::ZERO,
            },
            paused: false,
            winner: None,
            started_at: Duration::ZERO,
            total_time: Duration::ZERO,
            shake_frames: 0,
            shake_offset: 0,
            tick: 0,
        }
    }
}

// ── Top-level state ──────────────────────────────────────────────────────────

/// The whole program state: which screen is up, the menu cursors and the
/// current (or last finished) session.
#[derive(Clone, Debug)]
pub struct Game {
    pub screen: Screen,
    pub menu_selection: usize,
    pub difficulty_selection: usize,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub session: Session,
    /// Cleared once the player asks to quit.
    pub running: bool,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            screen: Screen::Menu,
            menu_selection: 0,
            difficulty_selection: 1,
            mode: Mode::Pvp,
            difficulty: Difficulty::Medium,
            session: Session::default(),
            running: true,
        }
    }
}
