/// Ball integration, wall and paddle collisions, scoring and serves.
///
/// The ball moves on a continuous plane but collides against integer rows.
/// Each tick adds the ball's speed to an accumulator and takes one discrete
/// step per whole unit, so a faster ball takes more steps instead of longer
/// ones and can never tunnel through a paddle.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::config::{
    BALL_MAX_SPEED, BALL_START_SPEED, COUNTDOWN_ROUNDS, COUNTDOWN_STEP, MAX_DY,
    MAX_WALL_REFLECTIONS, MIN_DY, PADDLE_SPEEDUP, SHAKE_ON_HIT, SHAKE_ON_SCORE, TRAIL_LENGTH,
};
use crate::entities::{Ball, Countdown, Paddle, Session, Side};
use crate::particles::{self, AMBIENT_GLYPHS, WALL_GLYPHS};
use crate::powerups;

const WALL_SPARKS: usize = 3;
const HIT_SPARKS: usize = 4;

// ── Paddles ──────────────────────────────────────────────────────────────────

/// Shift a paddle by `delta` rows, keeping it fully on the grid.
pub fn move_paddle(paddle: &mut Paddle, delta: f32, grid_height: i32) {
    let lowest = (grid_height - paddle.height) as f32;
    paddle.y = (paddle.y + delta).clamp(0.0, lowest);
}

pub fn paddle_center(paddle: &Paddle) -> f32 {
    paddle.y + paddle.height as f32 / 2.0
}

/// True when integer row `row` is one of the paddle's cells.
pub fn paddle_covers(paddle: &Paddle, row: i32) -> bool {
    let top = paddle.y as i32;
    top <= row && row < top + paddle.height
}

// ── Serve & countdown ────────────────────────────────────────────────────────

/// Put the ball back in the centre and start a fresh countdown.
///
/// `toward` picks the serve direction; `None` serves to a random side.
pub fn reset_ball(session: &mut Session, toward: Option<Side>, now: Duration, rng: &mut impl Rng) {
    let toward = toward.unwrap_or_else(|| {
        if rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    });
    session.ball = Ball {
        x: (session.width / 2) as f32,
        y: (session.height / 2) as f32,
        dx: match toward {
            Side::Left => -1.0,
            Side::Right => 1.0,
        },
        dy: rng.gen_range(-0.5..=0.5),
        speed: BALL_START_SPEED,
        accum: 0.0,
        trail: Default::default(),
    };
    session.countdown = Countdown {
        rounds: COUNTDOWN_ROUNDS,
        stamped_at: now,
    };
    session.rally.current = 0;
}

/// Tick the serve countdown down once a full step has elapsed.
pub fn advance_countdown(session: &mut Session, now: Duration) {
    let countdown = &mut session.countdown;
    if countdown.rounds > 0 && now.saturating_sub(countdown.stamped_at) >= COUNTDOWN_STEP {
        countdown.rounds -= 1;
        countdown.stamped_at = now;
    }
}

// ── Integration ──────────────────────────────────────────────────────────────

/// Advance the ball by one tick's worth of steps.
///
/// Does nothing while paused, during a countdown or after the match is
/// decided.  Returns the scoring side if a point was played out; the score
/// has already been applied when this returns.
pub fn advance(session: &mut Session, now: Duration, rng: &mut impl Rng) -> Option<Side> {
    if session.paused || session.winner.is_some() || session.countdown.rounds > 0 {
        return None;
    }

    session.ball.accum += session.ball.speed;
    while session.ball.accum >= 1.0 {
        session.ball.accum -= 1.0;
        if let Some(scorer) = step(session, rng) {
            score(session, scorer, now, rng);
            return Some(scorer);
        }
    }
    None
}

/// One discrete ball step.  Returns the scoring side when the ball leaves
/// the field; the ball position is left untouched in that case.
pub fn step(session: &mut Session, rng: &mut impl Rng) -> Option<Side> {
    let ball = &mut session.ball;
    ball.trail.push_back((ball.x, ball.y));
    while ball.trail.len() > TRAIL_LENGTH {
        ball.trail.pop_front();
    }

    let mut nx = session.ball.x + session.ball.dx;
    let ny = reflect_off_walls(session, nx, rng);

    let w = session.width as f32;
    let by = (ny.round() as i32).clamp(1, session.height - 2);

    // Left paddle
    if nx <= 2.0 && session.ball.dx < 0.0 {
        if paddle_covers(&session.left, by) {
            nx = 3.0;
            return_ball(session, Side::Left, by, rng);
            contact_pickup(session, Side::Left, nx, by, rng);
        } else if nx < 0.0 {
            return Some(Side::Right);
        }
    }

    // Right paddle
    if nx >= w - 3.0 && session.ball.dx > 0.0 {
        if paddle_covers(&session.right, by) {
            nx = w - 4.0;
            return_ball(session, Side::Right, by, rng);
            contact_pickup(session, Side::Right, nx, by, rng);
        } else if nx >= w {
            return Some(Side::Left);
        }
    }

    // Ball flying through a field powerup
    if let Some(field) = &session.field_powerup {
        let (bx, byr) = (nx.round() as i32, ny.round() as i32);
        if (bx - field.x).abs() <= 1 && (byr - field.y).abs() <= 1 {
            let owner = if session.ball.dx > 0.0 { Side::Left } else { Side::Right };
            powerups::collect(session, owner, rng);
        }
    }

    session.ball.x = nx;
    session.ball.y = ny;
    None
}

/// Mirror the tentative row back inside `[1, height - 2]`, flipping `dy`
/// away from each wall hit.  Returns the corrected row.
fn reflect_off_walls(session: &mut Session, nx: f32, rng: &mut impl Rng) -> f32 {
    let top = 1.0;
    let bottom = (session.height - 2) as f32;
    let mut ny = session.ball.y + session.ball.dy;

    let mut reflections = 0;
    while (ny < top || ny > bottom) && reflections < MAX_WALL_REFLECTIONS {
        reflections += 1;
        if ny < top {
            ny = 2.0 * top - ny;
            session.ball.dy = session.ball.dy.abs().max(MIN_DY);
            particles::spawn(&mut session.particles, nx, 0.0, WALL_SPARKS, WALL_GLYPHS, rng);
        }
        if ny > bottom {
            ny = 2.0 * bottom - ny;
            session.ball.dy = -session.ball.dy.abs().max(MIN_DY);
            let floor = (session.height - 1) as f32;
            particles::spawn(&mut session.particles, nx, floor, WALL_SPARKS, WALL_GLYPHS, rng);
        }
    }

    // Never leave the ball resting on a wall row.
    if ny < top || ny > bottom {
        debug!("wall reflection gave up after {} passes (y={})", reflections, ny);
    }
    if ny <= top {
        debug!("ball pinned on top wall row (y={}), nudged inward", ny);
        ny = top + 0.5;
        session.ball.dy = session.ball.dy.abs().max(MIN_DY);
    }
    if ny >= bottom {
        debug!("ball pinned on bottom wall row (y={}), nudged inward", ny);
        ny = bottom - 0.5;
        session.ball.dy = -session.ball.dy.abs().max(MIN_DY);
    }
    ny
}

/// Bounce the ball off `side`'s paddle at integer row `by`.
fn return_ball(session: &mut Session, side: Side, by: i32, rng: &mut impl Rng) {
    let paddle = match side {
        Side::Left => &session.left,
        Side::Right => &session.right,
    };
    let half = paddle.height as f32 / 2.0;
    let offset = (by as f32 - paddle_center(paddle)) / half;

    let ball = &mut session.ball;
    ball.dx = match side {
        Side::Left => ball.dx.abs(),
        Side::Right => -ball.dx.abs(),
    };
    ball.dy = bounce_dy(offset);
    ball.speed = (ball.speed + PADDLE_SPEEDUP).min(BALL_MAX_SPEED);

    session.rally.current += 1;
    *session.combo.get_mut(side) += 1;
    *session.combo.get_mut(side.opponent()) = 0;

    let face = match side {
        Side::Left => 3.0,
        Side::Right => (session.width - 4) as f32,
    };
    particles::spawn(&mut session.particles, face, by as f32, HIT_SPARKS, AMBIENT_GLYPHS, rng);
    session.shake_frames = SHAKE_ON_HIT;
}

/// Vertical velocity after a paddle hit `offset` half-heights from centre.
/// The result always satisfies `MIN_DY <= |dy| <= MAX_DY`.
pub fn bounce_dy(offset: f32) -> f32 {
    let dy = if offset.abs() < MIN_DY {
        if offset >= 0.0 {
            MIN_DY
        } else {
            -MIN_DY
        }
    } else {
        offset
    };
    dy.clamp(-MAX_DY, MAX_DY)
}

/// The returning player grabs a powerup sitting right at the paddle face.
fn contact_pickup(session: &mut Session, side: Side, nx: f32, by: i32, rng: &mut impl Rng) {
    if let Some(field) = &session.field_powerup {
        let bx = nx.round() as i32;
        if (bx - field.x).abs() < 2 && (by - field.y).abs() < 2 {
            powerups::collect(session, side, rng);
        }
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Award a point to `scorer` and either end the match or serve again.
pub fn score(session: &mut Session, scorer: Side, now: Duration, rng: &mut impl Rng) {
    *session.score.get_mut(scorer) += 1;

    // Burst at the goal of the side that conceded.
    let goal_x = match scorer {
        Side::Left => (session.width - 2) as f32,
        Side::Right => 2.0,
    };
    let mid_y = (session.height / 2) as f32;
    particles::spawn_celebration(&mut session.particles, goal_x, mid_y, rng);
    session.shake_frames = SHAKE_ON_SCORE;

    session.rally.longest = session.rally.longest.max(session.rally.current);
    session.rally.total += 1;
    powerups::clear_effect(session);

    let points = *session.score.get(scorer);
    info!(
        "{:?} scores ({} - {}) after a {}-hit rally",
        scorer, session.score.left, session.score.right, session.rally.current
    );

    if points >= session.win_score {
        session.winner = Some(scorer);
        session.total_time = now.saturating_sub(session.started_at);
        let mid_x = (session.width / 2) as f32;
        particles::spawn_celebration(&mut session.particles, mid_x, mid_y, rng);
    } else {
        reset_ball(session, Some(scorer.opponent()), now, rng);
    }
}
