/// Field powerups and the timed effects they grant.
///
/// At most one powerup sits on the field and at most one effect is in force.
/// Collecting a second powerup overwrites the running effect.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{
    BALL_MAX_SPEED, BALL_MIN_SPEED, FAST_FACTOR, PADDLE_HEIGHT, PADDLE_HEIGHT_BIG,
    PADDLE_HEIGHT_TINY, POWERUP_EFFECT_TICKS, POWERUP_FIELD_TICKS, POWERUP_SPAWN_CHANCE,
    SLOW_FACTOR, TAME_SPEED_MAX, TAME_SPEED_MIN,
};
use crate::entities::{ActiveEffect, FieldPowerup, Paddle, PowerupKind, Session, Side};
use crate::particles::{self, PICKUP_GLYPHS};

const PICKUP_BURST: usize = 10;

/// Place a random powerup in the middle half of the field.
pub fn spawn(session: &mut Session, rng: &mut impl Rng) {
    let x = rng.gen_range(session.width / 4..=3 * session.width / 4);
    let y = rng.gen_range(2..=session.height - 3);
    let kind = *PowerupKind::ALL.choose(rng).unwrap_or(&PowerupKind::Big);
    debug!("powerup {} spawned at ({}, {})", kind.name(), x, y);
    session.field_powerup = Some(FieldPowerup {
        x,
        y,
        kind,
        ticks_left: POWERUP_FIELD_TICKS,
    });
}

/// Give the field powerup to `side`.  No-op when the field is empty.
pub fn collect(session: &mut Session, side: Side, rng: &mut impl Rng) {
    let Some(field) = session.field_powerup.take() else {
        return;
    };
    debug!("powerup {} collected by {:?}", field.kind.name(), side);

    // A new effect replaces the old one outright.
    if let Some(old) = session.effect.take() {
        undo_effect(session, old.kind);
    }

    let grid_height = session.height;
    match field.kind {
        PowerupKind::Big => resize(paddle_mut(session, side), PADDLE_HEIGHT_BIG, grid_height),
        PowerupKind::Tiny => resize(
            paddle_mut(session, side.opponent()),
            PADDLE_HEIGHT_TINY,
            grid_height,
        ),
        PowerupKind::Fast => {
            session.ball.speed = (session.ball.speed * FAST_FACTOR).min(BALL_MAX_SPEED);
        }
        PowerupKind::Slow => {
            session.ball.speed = (session.ball.speed * SLOW_FACTOR).max(BALL_MIN_SPEED);
        }
    }

    session.effect = Some(ActiveEffect {
        kind: field.kind,
        ticks_left: POWERUP_EFFECT_TICKS,
        owner: side,
    });

    particles::spawn(
        &mut session.particles,
        field.x as f32,
        field.y as f32,
        PICKUP_BURST,
        PICKUP_GLYPHS,
        rng,
    );
}

/// End any running effect: default paddle heights, ball speed pulled into
/// the tame band.
pub fn clear_effect(session: &mut Session) {
    session.effect = None;
    reset_paddles(session);
    session.ball.speed = session.ball.speed.clamp(TAME_SPEED_MIN, TAME_SPEED_MAX);
}

/// Per-tick bookkeeping: age or spawn the field powerup, age the effect.
pub fn update(session: &mut Session, rng: &mut impl Rng) {
    match session.field_powerup.as_mut() {
        Some(field) => {
            field.ticks_left = field.ticks_left.saturating_sub(1);
            if field.ticks_left == 0 {
                debug!("powerup {} expired unclaimed", field.kind.name());
                session.field_powerup = None;
            }
        }
        None => {
            if session.countdown.rounds == 0 && rng.gen_bool(POWERUP_SPAWN_CHANCE) {
                spawn(session, rng);
            }
        }
    }

    if let Some(effect) = session.effect.as_mut() {
        effect.ticks_left = effect.ticks_left.saturating_sub(1);
        if effect.ticks_left == 0 {
            debug!("effect {} wore off", effect.kind.name());
            clear_effect(session);
        }
    }
}

fn paddle_mut(session: &mut Session, side: Side) -> &mut Paddle {
    match side {
        Side::Left => &mut session.left,
        Side::Right => &mut session.right,
    }
}

/// Take back what `kind` did to the paddles and the ball speed.
fn undo_effect(session: &mut Session, kind: PowerupKind) {
    reset_paddles(session);
    let factor = match kind {
        PowerupKind::Fast => FAST_FACTOR,
        PowerupKind::Slow => SLOW_FACTOR,
        PowerupKind::Big | PowerupKind::Tiny => return,
    };
    session.ball.speed = (session.ball.speed / factor).clamp(BALL_MIN_SPEED, BALL_MAX_SPEED);
}

fn reset_paddles(session: &mut Session) {
    let h = session.height;
    resize(&mut session.left, PADDLE_HEIGHT, h);
    resize(&mut session.right, PADDLE_HEIGHT, h);
}

/// Change a paddle's height, keeping it inside the grid.
fn resize(paddle: &mut Paddle, height: i32, grid_height: i32) {
    paddle.height = height;
    paddle.y = paddle.y.clamp(0.0, (grid_height - height) as f32);
}
