use console_pong::entities::Particle;
use console_pong::particles::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn speck(x: f32, y: f32, dx: f32, dy: f32, life: i32) -> Particle {
    Particle { x, y, dx, dy, life, glyph: '*' }
}

#[test]
fn spawn_pushes_requested_count_within_ranges() {
    let mut particles = Vec::new();
    spawn(&mut particles, 10.0, 5.0, 50, WALL_GLYPHS, &mut seeded_rng());

    assert_eq!(particles.len(), 50);
    for p in &particles {
        assert_eq!((p.x, p.y), (10.0, 5.0));
        assert!(p.dx >= -2.0 && p.dx <= 2.0);
        assert!(p.dy >= -1.5 && p.dy <= 1.5);
        assert!((3..=8).contains(&p.life));
        assert!(WALL_GLYPHS.contains(&p.glyph));
    }
}

#[test]
fn spawn_appends_to_existing_particles() {
    let mut particles = vec![speck(0.0, 0.0, 0.0, 0.0, 5)];
    spawn(&mut particles, 1.0, 1.0, 3, PICKUP_GLYPHS, &mut seeded_rng());
    assert_eq!(particles.len(), 4);
    assert_eq!(particles[0].life, 5);
}

#[test]
fn spawn_with_no_glyphs_uses_ambient_set() {
    let mut particles = Vec::new();
    spawn(&mut particles, 0.0, 0.0, 20, &[], &mut seeded_rng());
    assert!(particles.iter().all(|p| AMBIENT_GLYPHS.contains(&p.glyph)));
}

#[test]
fn celebration_is_a_dozen_longer_lived_specks() {
    let mut particles = Vec::new();
    spawn_celebration(&mut particles, 30.0, 11.0, &mut seeded_rng());

    assert_eq!(particles.len(), 12);
    for p in &particles {
        assert!(p.dx >= -3.0 && p.dx <= 3.0);
        assert!(p.dy >= -2.0 && p.dy <= 2.0);
        assert!((4..=12).contains(&p.life));
        assert!(CELEBRATION_GLYPHS.contains(&p.glyph));
    }
}

#[test]
fn update_moves_ages_and_pulls_down() {
    let mut particles = vec![speck(5.0, 5.0, 1.0, -1.0, 3)];
    update(&mut particles);

    let p = &particles[0];
    assert!((p.x - 6.0).abs() < 1e-6);
    assert!((p.y - 4.0).abs() < 1e-6);
    assert!((p.dy - (-1.0 + GRAVITY)).abs() < 1e-6);
    assert_eq!(p.life, 2);
}

#[test]
fn update_removes_expired_particles() {
    let mut particles = vec![speck(0.0, 0.0, 0.0, 0.0, 1), speck(0.0, 0.0, 0.0, 0.0, 2)];
    update(&mut particles);
    assert_eq!(particles.len(), 1);
    assert_eq!(particles[0].life, 1);

    update(&mut particles);
    assert!(particles.is_empty());
}

#[test]
fn every_burst_dies_out() {
    let mut particles = Vec::new();
    let mut rng = seeded_rng();
    spawn(&mut particles, 0.0, 0.0, 30, AMBIENT_GLYPHS, &mut rng);
    spawn_celebration(&mut particles, 0.0, 0.0, &mut rng);

    for _ in 0..12 {
        update(&mut particles);
    }
    assert!(particles.is_empty());
}
