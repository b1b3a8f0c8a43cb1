//! Console Pong: a two-player / vs-CPU Pong for the terminal.
//!
//! The library holds the whole simulation and knows nothing about the
//! terminal; the binary plugs a crossterm key reader and screen writer into
//! `scheduler::run`.
//!
//! - `entities`: pure data (session, paddles, ball, particles, powerups)
//! - `physics`, `cpu`, `particles`, `powerups`: per-tick subsystems
//! - `game`: screen state machine and per-screen input
//! - `frame`: render model
//! - `scheduler`, `input`, `clock`: the fixed-tick loop and its seams

pub mod clock;
pub mod config;
pub mod cpu;
pub mod entities;
pub mod frame;
pub mod game;
pub mod input;
pub mod particles;
pub mod physics;
pub mod powerups;
pub mod scheduler;
