use std::sync::Mutex;
use std::time::Duration;

use console_pong::entities::*;
use console_pong::physics::*;

use log::{LevelFilter, Log, Metadata, Record};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default 60×22 session, paddles centred on rows 9..=13, no countdown.
fn make_session() -> Session {
    Session::default()
}

fn place_ball(s: &mut Session, x: f32, y: f32, dx: f32, dy: f32) {
    s.ball.x = x;
    s.ball.y = y;
    s.ball.dx = dx;
    s.ball.dy = dy;
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

/// Keeps every log line emitted by this test binary.
struct CapturedLog(Mutex<Vec<String>>);

impl Log for CapturedLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static CAPTURED: CapturedLog = CapturedLog(Mutex::new(Vec::new()));

fn capture_logs() {
    // Already installed by another test in this binary is fine
    let _ = log::set_logger(&CAPTURED);
    log::set_max_level(LevelFilter::Debug);
}

fn logged(fragment: &str) -> bool {
    CAPTURED.0.lock().unwrap().iter().any(|line| line.contains(fragment))
}

// ── step: free flight ─────────────────────────────────────────────────────────

#[test]
fn step_moves_by_velocity() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 11.0, 1.0, 0.5);
    let scored = step(&mut s, &mut seeded_rng());
    assert_eq!(scored, None);
    assert!(close(s.ball.x, 31.0));
    assert!(close(s.ball.y, 11.5));
    assert!(s.particles.is_empty());
}

#[test]
fn step_records_trail_capped_at_four() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 11.0, 1.0, 0.0);
    let mut rng = seeded_rng();
    for _ in 0..6 {
        step(&mut s, &mut rng);
    }
    assert_eq!(s.ball.trail.len(), 4);
    // Oldest kept entry is the third position visited
    assert!(close(s.ball.trail.front().unwrap().0, 32.0));
    assert!(close(s.ball.trail.back().unwrap().0, 35.0));
}

// ── step: walls ───────────────────────────────────────────────────────────────

#[test]
fn step_reflects_off_top_wall() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 1.5, 1.0, -1.0);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.y, 1.5)); // 0.5 mirrored about 1.0
    assert!(close(s.ball.dy, 1.0));
    assert_eq!(s.particles.len(), 3); // wall sparks
}

#[test]
fn step_reflects_off_bottom_wall() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 19.5, 1.0, 1.0);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.y, 19.5)); // 20.5 mirrored about 20.0
    assert!(close(s.ball.dy, -1.0));
}

#[test]
fn step_wall_bounce_enforces_min_dy() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 1.05, 1.0, -0.1);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.dy, 0.3));
    assert!(s.ball.y >= 1.0);
}

#[test]
fn step_nudges_ball_off_wall_row() {
    // Lands exactly on row 1: no mirror needed, but it must not rest there
    let mut s = make_session();
    place_ball(&mut s, 30.0, 2.0, 1.0, -1.0);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.y, 1.5));
    assert!(close(s.ball.dy, 1.0));
}

#[test]
fn wall_row_nudge_is_logged() {
    capture_logs();

    let mut s = make_session();
    place_ball(&mut s, 30.0, 2.0, 1.0, -1.0);
    step(&mut s, &mut seeded_rng());
    assert!(logged("pinned on top wall row"));

    let mut s = make_session();
    place_ball(&mut s, 30.0, 19.0, 1.0, 1.0);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.y, 19.5));
    assert!(close(s.ball.dy, -1.0));
    assert!(logged("pinned on bottom wall row"));
}

#[test]
fn step_survives_absurd_vertical_velocity() {
    let mut s = make_session();
    place_ball(&mut s, 30.0, 10.0, 1.0, 250.0);
    let mut rng = seeded_rng();
    for _ in 0..5 {
        step(&mut s, &mut rng);
        assert!(s.ball.y >= 1.0 && s.ball.y <= 20.0, "y = {}", s.ball.y);
    }
}

// ── step: paddles ─────────────────────────────────────────────────────────────

#[test]
fn left_paddle_returns_ball() {
    let mut s = make_session(); // left paddle rows 9..=13, centre 11.5
    place_ball(&mut s, 3.0, 11.0, -1.0, 0.0);
    let scored = step(&mut s, &mut seeded_rng());

    assert_eq!(scored, None);
    assert!(close(s.ball.x, 3.0));
    assert!(s.ball.dx > 0.0);
    // offset -0.2 is too flat, pushed out to -0.3
    assert!(close(s.ball.dy, -0.3));
    assert!(close(s.ball.speed, 1.08));
    assert_eq!(s.rally.current, 1);
    assert_eq!(s.combo.left, 1);
    assert_eq!(s.combo.right, 0);
    assert_eq!(s.shake_frames, 2);
    assert_eq!(s.particles.len(), 4);
}

#[test]
fn paddle_edge_returns_steep_but_capped() {
    let mut s = make_session();
    place_ball(&mut s, 3.0, 9.0, -1.0, 0.0); // top cell: offset -1.0
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.dy, -0.9));

    let mut s = make_session();
    place_ball(&mut s, 3.0, 13.0, -1.0, 0.0); // bottom cell: offset +0.6
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.dy, 0.6));
}

#[test]
fn right_paddle_returns_ball() {
    let mut s = make_session();
    s.combo.left = 3;
    place_ball(&mut s, 56.0, 11.0, 1.0, 0.0);
    step(&mut s, &mut seeded_rng());

    assert!(close(s.ball.x, 56.0)); // width - 4
    assert!(s.ball.dx < 0.0);
    assert_eq!(s.combo.right, 1);
    assert_eq!(s.combo.left, 0); // opponent's combo broken
}

#[test]
fn speed_ramp_is_capped() {
    let mut s = make_session();
    s.ball.speed = 2.48;
    place_ball(&mut s, 3.0, 11.0, -1.0, 0.0);
    step(&mut s, &mut seeded_rng());
    assert!(close(s.ball.speed, 2.5));
}

#[test]
fn combo_builds_across_returns() {
    let mut s = make_session();
    let mut rng = seeded_rng();
    for _ in 0..3 {
        place_ball(&mut s, 3.0, 11.0, -1.0, 0.0);
        step(&mut s, &mut rng);
    }
    assert_eq!(s.combo.left, 3);
    assert_eq!(s.rally.current, 3);
}

// ── step: scoring boundaries ──────────────────────────────────────────────────

#[test]
fn ball_past_left_edge_scores_for_right() {
    let mut s = make_session();
    s.left.y = 0.0; // rows 0..=4, ball on row 15
    place_ball(&mut s, 0.5, 15.0, -1.0, 0.0);
    assert_eq!(step(&mut s, &mut seeded_rng()), Some(Side::Right));
    assert!(close(s.ball.x, 0.5)); // position not committed
}

#[test]
fn missed_ball_between_paddle_and_edge_is_not_a_point() {
    let mut s = make_session();
    s.left.y = 0.0;
    place_ball(&mut s, 2.5, 15.0, -1.0, 0.0);
    assert_eq!(step(&mut s, &mut seeded_rng()), None);
    assert!(close(s.ball.x, 1.5));
}

#[test]
fn ball_reaching_right_edge_scores_for_left() {
    let mut s = make_session();
    s.right.y = 0.0;
    place_ball(&mut s, 59.5, 15.0, 1.0, 0.0);
    assert_eq!(step(&mut s, &mut seeded_rng()), Some(Side::Left));

    let mut s = make_session();
    s.right.y = 0.0;
    place_ball(&mut s, 58.5, 15.0, 1.0, 0.0);
    assert_eq!(step(&mut s, &mut seeded_rng()), None); // x = 59.5 < width
}

// ── step: powerup pickups ─────────────────────────────────────────────────────

#[test]
fn ball_through_powerup_gives_it_to_the_hitter() {
    let mut s = make_session();
    s.field_powerup = Some(FieldPowerup { x: 31, y: 11, kind: PowerupKind::Fast, ticks_left: 100 });
    place_ball(&mut s, 30.0, 11.0, 1.0, 0.0);
    step(&mut s, &mut seeded_rng());

    assert!(s.field_powerup.is_none());
    let effect = s.effect.as_ref().expect("effect should be active");
    assert_eq!(effect.owner, Side::Left); // travelling right → P1 hit it
    assert!(close(s.ball.speed, 1.5));
}

#[test]
fn leftward_ball_through_powerup_credits_right_player() {
    let mut s = make_session();
    s.field_powerup = Some(FieldPowerup { x: 29, y: 12, kind: PowerupKind::Big, ticks_left: 100 });
    place_ball(&mut s, 30.0, 11.0, -1.0, 0.0);
    step(&mut s, &mut seeded_rng());

    assert_eq!(s.effect.as_ref().unwrap().owner, Side::Right);
    assert_eq!(s.right.height, 7);
}

#[test]
fn paddle_contact_collects_nearby_powerup() {
    let mut s = make_session();
    s.field_powerup = Some(FieldPowerup { x: 4, y: 12, kind: PowerupKind::Big, ticks_left: 100 });
    place_ball(&mut s, 3.0, 11.0, -1.0, 0.0);
    step(&mut s, &mut seeded_rng());

    assert!(s.field_powerup.is_none());
    assert_eq!(s.effect.as_ref().unwrap().owner, Side::Left);
    assert_eq!(s.left.height, 7);
}

// ── advance: speed accumulator ───────────────────────────────────────────────

#[test]
fn advance_takes_fractional_steps_over_ticks() {
    let mut s = make_session();
    s.ball.speed = 1.5;
    place_ball(&mut s, 20.0, 11.0, 1.0, 0.0);
    let mut rng = seeded_rng();

    advance(&mut s, Duration::ZERO, &mut rng); // 1 step, 0.5 carried
    assert!(close(s.ball.x, 21.0));
    assert!(close(s.ball.accum, 0.5));

    advance(&mut s, Duration::ZERO, &mut rng); // 2 steps
    assert!(close(s.ball.x, 23.0));
    assert!(close(s.ball.accum, 0.0));
}

#[test]
fn advance_is_frozen_during_countdown() {
    let mut s = make_session();
    s.countdown.rounds = 2;
    place_ball(&mut s, 20.0, 11.0, 1.0, 0.0);
    assert_eq!(advance(&mut s, Duration::ZERO, &mut seeded_rng()), None);
    assert!(close(s.ball.x, 20.0));
    assert!(close(s.ball.accum, 0.0));
}

#[test]
fn advance_is_frozen_while_paused() {
    let mut s = make_session();
    s.paused = true;
    place_ball(&mut s, 20.0, 11.0, 1.0, 0.0);
    advance(&mut s, Duration::ZERO, &mut seeded_rng());
    assert!(close(s.ball.x, 20.0));
}

#[test]
fn advance_applies_point_and_serves_toward_conceding_side() {
    let mut s = make_session();
    s.left.y = 0.0;
    s.rally.current = 4;
    place_ball(&mut s, 0.5, 15.0, -1.0, 0.0);

    let now = Duration::from_secs(12);
    let scored = advance(&mut s, now, &mut seeded_rng());

    assert_eq!(scored, Some(Side::Right));
    assert_eq!(s.score.right, 1);
    assert_eq!(s.score.left, 0);
    assert_eq!(s.rally.longest, 4);
    assert_eq!(s.rally.current, 0);
    assert_eq!(s.rally.total, 1);
    assert_eq!(s.countdown.rounds, 3);
    assert_eq!(s.countdown.stamped_at, now);
    assert!(close(s.ball.x, 30.0));
    assert!(close(s.ball.y, 11.0));
    assert!(close(s.ball.speed, 1.0));
    assert!(s.ball.dx < 0.0); // P1 conceded, ball heads to P1
    assert_eq!(s.shake_frames, 5);
    assert!(s.particles.len() >= 12);
}

// ── score ────────────────────────────────────────────────────────────────────

#[test]
fn score_clears_active_effect() {
    let mut s = make_session();
    s.left.height = 7;
    s.right.height = 3;
    s.effect = Some(ActiveEffect { kind: PowerupKind::Big, ticks_left: 80, owner: Side::Left });
    score(&mut s, Side::Right, Duration::ZERO, &mut seeded_rng());

    assert!(s.effect.is_none());
    assert_eq!(s.left.height, 5);
    assert_eq!(s.right.height, 5);
}

#[test]
fn reaching_win_score_decides_the_match() {
    let mut s = make_session();
    s.started_at = Duration::from_secs(10);
    s.score.right = 6;
    score(&mut s, Side::Right, Duration::from_secs(90), &mut seeded_rng());

    assert_eq!(s.score.right, 7);
    assert_eq!(s.winner, Some(Side::Right));
    assert_eq!(s.total_time, Duration::from_secs(80));
    assert_eq!(s.countdown.rounds, 0); // no serve after the final point
    assert_eq!(s.particles.len(), 24); // goal burst + victory burst
}

#[test]
fn point_below_win_score_does_not_decide() {
    let mut s = make_session();
    s.score.left = 5;
    score(&mut s, Side::Left, Duration::ZERO, &mut seeded_rng());
    assert_eq!(s.score.left, 6);
    assert!(s.winner.is_none());
    assert!(s.ball.dx > 0.0); // P2 conceded, ball heads right
}

// ── serve & countdown ────────────────────────────────────────────────────────

#[test]
fn reset_ball_serves_from_centre() {
    let mut s = make_session();
    s.ball.speed = 2.2;
    s.ball.trail.push_back((5.0, 5.0));
    s.ball.accum = 0.7;
    s.rally.current = 9;
    let now = Duration::from_millis(1500);
    reset_ball(&mut s, None, now, &mut seeded_rng());

    assert!(close(s.ball.x, 30.0));
    assert!(close(s.ball.y, 11.0));
    assert!(close(s.ball.speed, 1.0));
    assert!(close(s.ball.dx.abs(), 1.0));
    assert!(s.ball.dy >= -0.5 && s.ball.dy <= 0.5);
    assert!(s.ball.trail.is_empty());
    assert!(close(s.ball.accum, 0.0));
    assert_eq!(s.rally.current, 0);
    assert_eq!(s.countdown.rounds, 3);
    assert_eq!(s.countdown.stamped_at, now);
}

#[test]
fn countdown_ticks_once_per_second() {
    let mut s = make_session();
    s.countdown = Countdown { rounds: 3, stamped_at: Duration::ZERO };

    advance_countdown(&mut s, Duration::from_millis(999));
    assert_eq!(s.countdown.rounds, 3);

    advance_countdown(&mut s, Duration::from_millis(1000));
    assert_eq!(s.countdown.rounds, 2);
    assert_eq!(s.countdown.stamped_at, Duration::from_millis(1000));

    advance_countdown(&mut s, Duration::from_millis(1500));
    assert_eq!(s.countdown.rounds, 2);
}

// ── helpers ──────────────────────────────────────────────────────────────────

#[test]
fn bounce_dy_band() {
    assert!(close(bounce_dy(0.0), 0.3));
    assert!(close(bounce_dy(-0.1), -0.3));
    assert!(close(bounce_dy(0.5), 0.5));
    assert!(close(bounce_dy(2.0), 0.9));
    assert!(close(bounce_dy(-1.0), -0.9));
}

#[test]
fn move_paddle_clamps_to_grid() {
    let mut p = Paddle { y: 1.0, height: 5, column: 1 };
    move_paddle(&mut p, -2.0, 22);
    assert_eq!(p.y, 0.0);

    p.y = 16.0;
    move_paddle(&mut p, 2.0, 22);
    assert_eq!(p.y, 17.0);
}

#[test]
fn paddle_covers_its_rows_only() {
    let p = Paddle { y: 9.0, height: 5, column: 1 };
    assert!(!paddle_covers(&p, 8));
    assert!(paddle_covers(&p, 9));
    assert!(paddle_covers(&p, 13));
    assert!(!paddle_covers(&p, 14));
}
