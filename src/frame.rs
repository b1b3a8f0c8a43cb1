/// Render model: turns a `Game` into lines of text.
///
/// Pure and read-only: it never touches the terminal and never mutates
/// state.  Blinking glyphs are derived from the clock reading passed in.

use std::time::Duration;

use crate::entities::{Game, Mode, PowerupKind, Screen, Session, Side};
use crate::game::{winner_label, DIFFICULTY_ITEMS, MENU_ITEMS};
use crate::physics::paddle_covers;

/// One screenful of text, top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
}

impl Frame {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

const TRAIL_GLYPHS: [char; 4] = ['·', '∙', '◦', '○'];
const BALL_GLYPH: char = '●';
const BOX_INNER: usize = 54;

/// Build the frame for whichever screen is showing.
pub fn build(game: &Game, now: Duration) -> Frame {
    match game.screen {
        Screen::Menu => menu_frame(game),
        Screen::Difficulty => difficulty_frame(game),
        Screen::Playing => play_frame(&game.session, now),
        Screen::GameOver => game_over_frame(&game.session),
    }
}

/// Toggles `per_sec` times a second.
fn blink(now: Duration, per_sec: u128) -> bool {
    (now.as_millis() * per_sec / 1000) % 2 == 0
}

pub fn powerup_glyph(kind: PowerupKind) -> char {
    match kind {
        PowerupKind::Big => '⊕',
        PowerupKind::Fast => '⊗',
        PowerupKind::Slow => '⊘',
        PowerupKind::Tiny => '⊖',
    }
}

/// Right-hand player's label in the HUD.
fn short_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Cpu => "CPU",
        Mode::Pvp => "P2",
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

// ── Playing ──────────────────────────────────────────────────────────────────

fn play_frame(session: &Session, now: Duration) -> Frame {
    let w = session.width as usize;
    let line_width = w + 2;
    let mut lines = Vec::with_capacity(session.height as usize + 8);

    lines.push(score_line(session, line_width));
    lines.push(pad(&powerup_line(session), line_width));
    lines.push(format!("╔{}╗", "═".repeat(w)));

    let field = field_cells(session, now);
    for row in field {
        let inner: String = row.into_iter().collect();
        let line = format!("║{}║", inner);
        lines.push(shake(&line, session.shake_offset));
    }

    lines.push(format!("╚{}╝", "═".repeat(w)));

    let mut controls = String::from("  W/S:P1");
    if session.mode == Mode::Pvp {
        controls.push_str("  I/K:P2");
    }
    controls.push_str("  P:Pause  Q:Quit  R:Restart");
    lines.push(controls);

    let status = if session.countdown.rounds > 0 {
        format!("          >>> Get ready... {} <<<", session.countdown.rounds)
    } else if session.rally.current >= 5 {
        format!("          RALLY: {} hits!", session.rally.current)
    } else {
        String::new()
    };
    lines.push(pad(&status, line_width));

    if session.paused {
        lines.push(String::new());
        lines.push("       >>> PAUSED - Press P to resume <<<".to_string());
    }

    Frame { lines }
}

fn score_line(session: &Session, line_width: usize) -> String {
    let combo = |n: u32| if n > 1 { "◈".repeat(n as usize) } else { String::new() };
    let p2 = short_name(session.mode);
    let bar_len = ((session.ball.speed * 3.0) as usize).min(8);

    let left = format!("  P1 [{}]  {}", session.score.left, combo(session.combo.left));
    let right = format!("{}  [{}] {}", combo(session.combo.right), session.score.right, p2);
    let mid = format!("Speed:{}", "●".repeat(bar_len));

    let used = left.chars().count() + right.chars().count() + mid.chars().count();
    let half = (line_width.saturating_sub(used) / 2).max(1);
    let gap = " ".repeat(half);
    let line = format!("{left}{gap}{mid}{gap}{right}");
    line.chars().take(line_width).collect()
}

fn powerup_line(session: &Session) -> String {
    if let Some(effect) = &session.effect {
        let owner = match effect.owner {
            Side::Left => 1,
            Side::Right => 2,
        };
        format!(
            "  ★ {} active ({}s) - P{}",
            effect.kind.name(),
            effect.ticks_left / 20 + 1,
            owner
        )
    } else if let Some(field) = &session.field_powerup {
        format!("  ◆ Powerup: {} available!", field.kind.name())
    } else {
        String::new()
    }
}

/// The playfield as a `height × width` grid of glyphs.
pub fn field_cells(session: &Session, now: Duration) -> Vec<Vec<char>> {
    let (w, h) = (session.width, session.height);
    let mut grid = vec![vec![' '; w as usize]; h as usize];
    let in_grid = |x: i32, y: i32| x >= 0 && x < w && y >= 0 && y < h;
    let counting_down = session.countdown.rounds > 0;

    // Lowest priority first; later writes win.
    let net = w / 2;
    for y in (0..h).step_by(2) {
        grid[y as usize][net as usize] = '│';
    }

    for (paddle, edge) in [(&session.left, '▐'), (&session.right, '▌')] {
        let top = paddle.y as i32;
        for y in 0..h {
            if paddle_covers(paddle, y) {
                let end = y == top || y == top + paddle.height - 1;
                grid[y as usize][paddle.column as usize] = if end { edge } else { '█' };
            }
        }
    }

    if let Some(field) = &session.field_powerup {
        if in_grid(field.x, field.y) {
            let glyph = if blink(now, 3) { powerup_glyph(field.kind) } else { '◆' };
            grid[field.y as usize][field.x as usize] = glyph;
        }
    }

    if !counting_down {
        for (i, &(tx, ty)) in session.ball.trail.iter().enumerate() {
            let x = tx.round() as i32;
            let y = (ty.round() as i32).clamp(1, h - 2);
            if in_grid(x, y) {
                grid[y as usize][x as usize] = TRAIL_GLYPHS[i.min(TRAIL_GLYPHS.len() - 1)];
            }
        }
    }

    let bx = session.ball.x.round() as i32;
    let by = (session.ball.y.round() as i32).clamp(1, h - 2);
    if in_grid(bx, by) && (!counting_down || blink(now, 4)) {
        grid[by as usize][bx as usize] = BALL_GLYPH;
    }

    for p in &session.particles {
        let (x, y) = (p.x.round() as i32, p.y.round() as i32);
        if in_grid(x, y) {
            grid[y as usize][x as usize] = p.glyph;
        }
    }

    grid
}

/// Shift a field row one cell left or right, keeping its length.
fn shake(line: &str, offset: i32) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if offset > 0 {
        chars.pop();
        chars.insert(0, ' ');
    } else if offset < 0 {
        chars.remove(0);
        chars.push(' ');
    }
    chars.into_iter().collect()
}

// ── Menus ────────────────────────────────────────────────────────────────────

fn boxed(body: &[String]) -> Vec<String> {
    let mut lines = vec![String::new(), format!("  ╔{}╗", "═".repeat(BOX_INNER))];
    for row in body {
        lines.push(format!("  ║{}║", pad(row, BOX_INNER)));
    }
    lines.push(format!("  ╚{}╝", "═".repeat(BOX_INNER)));
    lines
}

fn selectable(items: &[&str], selected: usize) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let cursor = if i == selected { "►" } else { " " };
            format!("        {}  {}", cursor, item)
        })
        .collect()
}

fn menu_frame(game: &Game) -> Frame {
    let mut body: Vec<String> = [
        "",
        "    ____    ___   _   _    ____   _",
        "   |  _ \\  / _ \\ | \\ | |  / ___| | |",
        "   | |_) || | | ||  \\| | | |  _  | |",
        "   |  __/ | |_| || |\\  | | |_| | |_|",
        "   |_|     \\___/ |_| \\_|  \\____| (_)",
        "",
        "             ═══ CONSOLE EDITION ═══",
        "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    body.extend(selectable(&MENU_ITEMS, game.menu_selection));
    body.extend(
        [
            "",
            "    Controls:",
            "      W/S or I/K  - Move paddle",
            "      P - Pause   Q - Quit   R - Restart",
            "      ↑/↓ or W/S  - Navigate menu",
            "      SPACE/ENTER - Select",
            "",
            "    Features:",
            "      ★ Powerups   ● Ball trails   ◈ Combos",
            "      ✦ Particles  ⊕ Screen shake",
            "",
        ]
        .iter()
        .map(|s| s.to_string()),
    );

    Frame { lines: boxed(&body) }
}

fn difficulty_frame(game: &Game) -> Frame {
    let mut body = vec![
        String::new(),
        "             SELECT CPU DIFFICULTY".to_string(),
        String::new(),
    ];
    body.extend(selectable(&DIFFICULTY_ITEMS, game.difficulty_selection));
    body.push(String::new());
    body.push("    W/S to select, SPACE/ENTER to confirm, Q back".to_string());
    body.push(String::new());
    Frame { lines: boxed(&body) }
}

fn game_over_frame(session: &Session) -> Frame {
    let secs = session.total_time.as_secs();
    let body = vec![
        String::new(),
        "                 ★ GAME OVER ★".to_string(),
        String::new(),
        format!("{:^54}", winner_label(session)),
        format!("{:^54}", "WINS!"),
        String::new(),
        format!(
            "    Final Score:  P1 [{}]  -  [{}] {}",
            session.score.left,
            session.score.right,
            short_name(session.mode)
        ),
        String::new(),
        "    ── Stats ──────────────────────────".to_string(),
        format!("    Time:          {}m {:02}s", secs / 60, secs % 60),
        format!("    Total Rallies: {}", session.rally.total),
        format!("    Longest Rally: {} hits", session.rally.longest),
        String::new(),
        "    [R] Play Again    [M] Menu    [Q] Quit".to_string(),
        String::new(),
    ];
    Frame { lines: boxed(&body) }
}
