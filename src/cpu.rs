/// The CPU opponent, which always plays the right paddle.
///
/// Reaction delay is modelled by only looking at the ball every few ticks;
/// aim error by jittering the target row.  Easy and Medium only chase a ball
/// that is coming toward them, Hard tracks it all the time.

use rand::Rng;

use crate::config::{aim_jitter, cpu_step, react_every};
use crate::entities::{Difficulty, Mode, Session};
use crate::physics::{move_paddle, paddle_center};

/// Move the CPU paddle for this tick.  Call once per playing tick.
pub fn update(session: &mut Session, rng: &mut impl Rng) {
    if session.mode != Mode::Cpu {
        return;
    }

    session.tick += 1;
    let difficulty = session.difficulty;
    if session.tick % react_every(&difficulty) != 0 {
        return;
    }

    let jitter = aim_jitter(&difficulty);
    let target = if jitter > 0.0 {
        session.ball.y + rng.gen_range(-jitter..=jitter)
    } else {
        session.ball.y
    };

    let incoming = session.ball.dx > 0.0;
    if !incoming && difficulty != Difficulty::Hard {
        return;
    }

    let gap = target - paddle_center(&session.right);
    if gap.abs() > 1.0 {
        let step = cpu_step(&difficulty);
        let delta = if gap > 0.0 { step } else { -step };
        move_paddle(&mut session.right, delta, session.height);
    }
}
