/// Screen state machine: MENU → DIFFICULTY → PLAYING → GAME_OVER.
///
/// `step` is the only entry point the main loop needs.  Like the rest of
/// the public API it takes the current `Game` by reference and returns the
/// next one; randomness and time are injected so every transition can be
/// replayed in tests.

use std::time::Duration;

use log::info;
use rand::Rng;

use crate::config::PADDLE_STEP;
use crate::cpu;
use crate::entities::{Difficulty, Game, Mode, Screen, Session, Side};
use crate::input::INTERRUPT;
use crate::particles;
use crate::physics::{self, move_paddle};
use crate::powerups;

/// Entries on the main menu, in display order.
pub const MENU_ITEMS: [&str; 3] = ["Play vs Player (PVP)", "Play vs CPU", "Quit"];

/// Entries on the difficulty screen, in display order.
pub const DIFFICULTY_ITEMS: [&str; 3] = [
    "Easy   - CPU is sleepy",
    "Medium - A fair match",
    "Hard   - CPU is relentless",
];

// ── Session lifecycle ────────────────────────────────────────────────────────

/// A fresh match: centred paddles, zero scores, ball served to a random side.
pub fn init_session(mode: Mode, difficulty: Difficulty, now: Duration, rng: &mut impl Rng) -> Session {
    let mut session = Session {
        mode,
        difficulty,
        started_at: now,
        ..Session::default()
    };
    physics::reset_ball(&mut session, None, now, rng);
    info!("new match: {:?}, difficulty {}", mode, difficulty.level());
    session
}

fn start_playing(game: &mut Game, now: Duration, rng: &mut impl Rng) {
    game.session = init_session(game.mode, game.difficulty, now, rng);
    game.screen = Screen::Playing;
}

fn quit(game: &mut Game) {
    info!("quit requested from {:?}", game.screen);
    game.running = false;
}

/// "PLAYER 1", "PLAYER 2" or "CPU"; empty while the match is undecided.
pub fn winner_label(session: &Session) -> &'static str {
    match session.winner {
        Some(Side::Left) => "PLAYER 1",
        Some(Side::Right) => right_player_name(session.mode),
        None => "",
    }
}

pub fn right_player_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Cpu => "CPU",
        Mode::Pvp => "PLAYER 2",
    }
}

fn is_select(key: char) -> bool {
    matches!(key, ' ' | '\r' | '\n')
}

fn wrap_up(selection: usize, len: usize) -> usize {
    (selection + len - 1) % len
}

fn wrap_down(selection: usize, len: usize) -> usize {
    (selection + 1) % len
}

// ── Per-screen input ─────────────────────────────────────────────────────────
//
// Each handler consumes keys until the screen changes or the game quits;
// whatever is left of the batch is dropped.

pub fn handle_menu_input(game: &mut Game, keys: &[char], now: Duration, rng: &mut impl Rng) {
    for &key in keys {
        match key {
            'q' | INTERRUPT => quit(game),
            'w' | 'i' => game.menu_selection = wrap_up(game.menu_selection, MENU_ITEMS.len()),
            's' | 'k' => game.menu_selection = wrap_down(game.menu_selection, MENU_ITEMS.len()),
            k if is_select(k) => match game.menu_selection {
                0 => {
                    game.mode = Mode::Pvp;
                    start_playing(game, now, rng);
                }
                1 => {
                    game.mode = Mode::Cpu;
                    game.screen = Screen::Difficulty;
                }
                _ => quit(game),
            },
            _ => {}
        }
        if !game.running || game.screen != Screen::Menu {
            return;
        }
    }
}

pub fn handle_difficulty_input(game: &mut Game, keys: &[char], now: Duration, rng: &mut impl Rng) {
    let len = DIFFICULTY_ITEMS.len();
    for &key in keys {
        match key {
            INTERRUPT => quit(game),
            'q' => game.screen = Screen::Menu,
            'w' | 'i' => game.difficulty_selection = wrap_up(game.difficulty_selection, len),
            's' | 'k' => game.difficulty_selection = wrap_down(game.difficulty_selection, len),
            k if is_select(k) => {
                game.difficulty = Difficulty::from_index(game.difficulty_selection);
                start_playing(game, now, rng);
            }
            _ => {}
        }
        if !game.running || game.screen != Screen::Difficulty {
            return;
        }
    }
}

pub fn handle_game_input(game: &mut Game, keys: &[char], now: Duration, rng: &mut impl Rng) {
    for &key in keys {
        match key {
            'q' | INTERRUPT => {
                quit(game);
                return;
            }
            'p' => game.session.paused = !game.session.paused,
            'r' => start_playing(game, now, rng),
            _ if game.session.paused || game.session.winner.is_some() => {}
            key => move_paddles(&mut game.session, key),
        }
    }
}

fn move_paddles(session: &mut Session, key: char) {
    let h = session.height;
    match key {
        'w' => move_paddle(&mut session.left, -PADDLE_STEP, h),
        's' => move_paddle(&mut session.left, PADDLE_STEP, h),
        'i' if session.mode == Mode::Pvp => move_paddle(&mut session.right, -PADDLE_STEP, h),
        'k' if session.mode == Mode::Pvp => move_paddle(&mut session.right, PADDLE_STEP, h),
        _ => {}
    }
}

pub fn handle_game_over_input(game: &mut Game, keys: &[char], now: Duration, rng: &mut impl Rng) {
    for &key in keys {
        match key {
            'q' | INTERRUPT => quit(game),
            'r' => start_playing(game, now, rng),
            'm' => game.screen = Screen::Menu,
            _ => {}
        }
        if !game.running || game.screen != Screen::GameOver {
            return;
        }
    }
}

// ── Simulation ───────────────────────────────────────────────────────────────

/// One live tick: countdown, ball, CPU, particles, powerups, screen shake.
/// Frozen while paused or once the match is decided.
pub fn update_playing(session: &mut Session, now: Duration, rng: &mut impl Rng) {
    if session.paused || session.winner.is_some() {
        session.shake_offset = 0;
        return;
    }

    physics::advance_countdown(session, now);
    physics::advance(session, now, rng);
    cpu::update(session, rng);
    particles::update(&mut session.particles);
    powerups::update(session, rng);

    if session.shake_frames > 0 {
        session.shake_offset = rng.gen_range(-1..=1);
        session.shake_frames -= 1;
    } else {
        session.shake_offset = 0;
    }
}

/// Advance the whole program by one tick given this tick's keys.
pub fn step(game: &Game, keys: &[char], now: Duration, rng: &mut impl Rng) -> Game {
    let mut next = game.clone();

    match next.screen {
        Screen::Menu => handle_menu_input(&mut next, keys, now, rng),
        Screen::Difficulty => handle_difficulty_input(&mut next, keys, now, rng),
        Screen::Playing => {
            handle_game_input(&mut next, keys, now, rng);
            if next.running {
                update_playing(&mut next.session, now, rng);
                if next.session.winner.is_some() {
                    info!(
                        "game over: {} wins {} - {} in {:.1}s",
                        winner_label(&next.session),
                        next.session.score.left,
                        next.session.score.right,
                        next.session.total_time.as_secs_f32()
                    );
                    next.screen = Screen::GameOver;
                }
            }
        }
        Screen::GameOver => {
            handle_game_over_input(&mut next, keys, now, rng);
            particles::update(&mut next.session.particles);
        }
    }

    next
}
