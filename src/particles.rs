/// Particle spawning and decay.
///
/// Particles are purely cosmetic: nothing in the simulation reads them back.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::Particle;

/// Glyphs for small bursts (paddle hits).
pub const AMBIENT_GLYPHS: &[char] = &['*', '+', '.', '·', ':', '~'];
/// Glyphs for wall sparks.
pub const WALL_GLYPHS: &[char] = &['─', '~', '.'];
/// Glyphs for a powerup pickup.
pub const PICKUP_GLYPHS: &[char] = &['★', '✦', '◆', '●'];
/// Glyphs for points and victories.
pub const CELEBRATION_GLYPHS: &[char] = &['★', '!', '*', '●', '◆', '+'];

/// Downward pull added to every particle each tick.
pub const GRAVITY: f32 = 0.1;

const CELEBRATION_COUNT: usize = 12;

/// Push `count` particles at (x, y) with random headings.  Glyphs are drawn
/// uniformly from `glyphs`, falling back to `AMBIENT_GLYPHS` when empty.
pub fn spawn(
    particles: &mut Vec<Particle>,
    x: f32,
    y: f32,
    count: usize,
    glyphs: &[char],
    rng: &mut impl Rng,
) {
    let glyphs = if glyphs.is_empty() { AMBIENT_GLYPHS } else { glyphs };
    for _ in 0..count {
        particles.push(Particle {
            x,
            y,
            dx: rng.gen_range(-2.0..=2.0),
            dy: rng.gen_range(-1.5..=1.5),
            life: rng.gen_range(3..=8),
            glyph: *glyphs.choose(rng).unwrap_or(&'*'),
        });
    }
}

/// A wider, longer-lived burst used when a point is scored or a match won.
pub fn spawn_celebration(particles: &mut Vec<Particle>, x: f32, y: f32, rng: &mut impl Rng) {
    for _ in 0..CELEBRATION_COUNT {
        particles.push(Particle {
            x,
            y,
            dx: rng.gen_range(-3.0..=3.0),
            dy: rng.gen_range(-2.0..=2.0),
            life: rng.gen_range(4..=12),
            glyph: *CELEBRATION_GLYPHS.choose(rng).unwrap_or(&'★'),
        });
    }
}

/// Move, age and pull down every particle, then drop the dead ones.
pub fn update(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.x += p.dx;
        p.y += p.dy;
        p.life -= 1;
        p.dy += GRAVITY;
    }
    particles.retain(|p| p.life > 0);
}
