/// Fixed-tick main loop.
///
/// One iteration: drain input → step the game → build and show a frame →
/// sleep out the rest of the tick.  An overrun tick is not made up for.

use std::io;

use log::trace;
use rand::Rng;

use crate::clock::Clock;
use crate::config::TICK;
use crate::entities::Game;
use crate::frame::{self, Frame};
use crate::game;
use crate::input::{read_keys, KeySource};

/// Where frames go.  Implemented over crossterm by the binary.
pub trait Display {
    fn render(&mut self, frame: &Frame) -> io::Result<()>;
    fn clear_screen(&mut self) -> io::Result<()>;
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
}

/// Run a single tick and return the next game state.
pub fn tick<K, D, C, R>(
    game: &Game,
    keys: &mut K,
    display: &mut D,
    clock: &C,
    rng: &mut R,
) -> io::Result<Game>
where
    K: KeySource,
    D: Display,
    C: Clock,
    R: Rng,
{
    let started = clock.now();

    let batch = read_keys(keys);
    let next = game::step(game, &batch, started, rng);
    display.render(&frame::build(&next, clock.now()))?;

    let elapsed = clock.now().saturating_sub(started);
    if elapsed < TICK {
        clock.sleep(TICK - elapsed);
    } else {
        trace!("tick overran by {:?}", elapsed - TICK);
    }
    Ok(next)
}

/// Tick until the player quits.  Returns the final state.
pub fn run<K, D, C, R>(
    mut game: Game,
    keys: &mut K,
    display: &mut D,
    clock: &C,
    rng: &mut R,
) -> io::Result<Game>
where
    K: KeySource,
    D: Display,
    C: Clock,
    R: Rng,
{
    display.hide_cursor()?;
    display.clear_screen()?;

    while game.running {
        game = tick(&game, keys, display, clock, rng)?;
    }

    display.clear_screen()?;
    display.show_cursor()?;
    Ok(game)
}
