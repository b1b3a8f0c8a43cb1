/// Keyboard input as a stream of single characters.
///
/// The terminal backend lives in the binary; the core only sees this trait.
/// Special keys are folded into characters before they get here: arrows
/// become `w`/`s`, Enter becomes `'\r'`, Ctrl-C becomes `INTERRUPT`.

use std::collections::VecDeque;

use crate::config::MAX_KEYS_PER_TICK;

/// ETX, what Ctrl-C produces in raw mode.  Quits from any screen.
pub const INTERRUPT: char = '\u{3}';

pub trait KeySource {
    /// Next queued key, if any.  Must not block.
    fn poll_key(&mut self) -> Option<char>;
}

/// Drain up to `MAX_KEYS_PER_TICK` pending keys, lower-cased.
pub fn read_keys(source: &mut impl KeySource) -> Vec<char> {
    let mut keys = Vec::new();
    while keys.len() < MAX_KEYS_PER_TICK {
        match source.poll_key() {
            // One key in, one key out, even where lower-casing expands.
            Some(key) => keys.extend(key.to_lowercase().next()),
            None => break,
        }
    }
    keys
}

/// Pre-recorded input: each batch is what becomes available on one tick.
/// A batch ends with one `None` from `poll_key`, after which the next batch
/// starts.  Used to drive the scheduler without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    ticks: VecDeque<VecDeque<char>>,
}

impl ScriptedKeys {
    pub fn new<I, S>(ticks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ScriptedKeys {
            ticks: ticks
                .into_iter()
                .map(|batch| batch.as_ref().chars().collect())
                .collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.ticks.is_empty()
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self) -> Option<char> {
        let batch = self.ticks.front_mut()?;
        let key = batch.pop_front();
        if key.is_none() {
            self.ticks.pop_front();
        }
        key
    }
}
