mod display;

use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use rand::thread_rng;

use console_pong::clock::SystemClock;
use console_pong::entities::Game;
use console_pong::input::{KeySource, INTERRUPT};
use console_pong::scheduler;

use display::{TerminalDisplay, TerminalGuard};

// ── Input ─────────────────────────────────────────────────────────────────────

/// Key events forwarded by the reader thread, folded into the single
/// characters the game understands.
struct TerminalKeys {
    rx: mpsc::Receiver<Event>,
}

impl KeySource for TerminalKeys {
    fn poll_key(&mut self) -> Option<char> {
        // Skip anything that does not map to a key (resizes, releases,
        // function keys) without ending the batch early.
        while let Ok(ev) = self.rx.try_recv() {
            if let Some(key) = translate(ev) {
                return Some(key);
            }
        }
        None
    }
}

fn translate(ev: Event) -> Option<char> {
    let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
        return None;
    };
    if kind == KeyEventKind::Release {
        return None;
    }
    match code {
        KeyCode::Char('c') | KeyCode::Char('C') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(INTERRUPT)
        }
        KeyCode::Char(c) => Some(c),
        KeyCode::Up => Some('w'),
        KeyCode::Down => Some('s'),
        KeyCode::Enter => Some('\r'),
        KeyCode::Esc => Some('q'),
        _ => None,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// stdout is the playfield, so log lines go to a file instead:
/// `$CONSOLE_PONG_LOG`, or `console_pong.log` in the temp dir.
fn init_logging() {
    let path = std::env::var_os("CONSOLE_PONG_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("console_pong.log"));
    let Ok(file) = File::create(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();
    info!("console pong starting");

    let guard = TerminalGuard::enter().context("failed to prepare the terminal")?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut keys = TerminalKeys { rx };
    let mut display = TerminalDisplay::new(BufWriter::new(stdout()));
    let clock = SystemClock::new();
    let mut rng = thread_rng();

    let result = scheduler::run(Game::default(), &mut keys, &mut display, &clock, &mut rng);

    // Always restore the terminal before reporting anything
    drop(guard);

    result.context("terminal I/O failed during play")?;
    info!("console pong exiting");
    println!("\n  Thanks for playing PONG!\n");
    Ok(())
}
