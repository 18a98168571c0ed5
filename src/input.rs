use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io;
use std::io::Read;

use crate::memory::Cell;

/// what IN and GETC push when there is nothing left to read
pub const END_OF_INPUT: Cell = -1;

/// reads one unit of input at a time, blocking until it arrives
pub trait Input {
    /// the next character as a cell, or END_OF_INPUT
    fn get_char(&mut self) -> Result<Cell, io::Error>;
}

/// line-buffered STDIN, one byte per read
pub struct StdinInput {
    stdin: io::Stdin,
}

impl StdinInput {
    pub fn new() -> Self {
        StdinInput { stdin: io::stdin() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for StdinInput {
    fn get_char(&mut self) -> Result<Cell, io::Error> {
        let mut byte = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut byte) {
                Ok(0) => return Ok(END_OF_INPUT),
                Ok(_) => return Ok(byte[0] as Cell),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Keypresses from a terminal in raw mode: no echo, no line buffering, no
/// signals. Raw mode is held for as long as this value lives.
pub struct RawTermInput {
    _private: (),
}

impl RawTermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        log::debug!("terminal in raw mode");
        Ok(RawTermInput { _private: () })
    }
}

impl Drop for RawTermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("could not restore terminal mode: {}", e);
        }
    }
}

impl Input for RawTermInput {
    fn get_char(&mut self) -> Result<Cell, io::Error> {
        loop {
            match read()? {
                Event::Key(evt) => match key_to_cell(&evt) {
                    Some(c) => return Ok(c),
                    None => log::debug!("ignoring unmapped key {:?}", evt.code),
                },
                // resizes, mouse etc. aren't input to the VM
                _ => {}
            }
        }
    }
}

/// map a key event to the byte a raw tty would have sent
fn key_to_cell(evt: &KeyEvent) -> Option<Cell> {
    match evt.code {
        KeyCode::Char(c) if evt.modifiers.contains(KeyModifiers::CONTROL) => {
            // ^A..^Z and friends
            Some((c.to_ascii_lowercase() as Cell) & 0x1f)
        }
        KeyCode::Char(c) => Some(c as Cell),
        KeyCode::Enter => Some(0x0a),
        KeyCode::Tab => Some(0x09),
        KeyCode::Backspace => Some(0x7f),
        KeyCode::Esc => Some(0x1b),
        _ => None,
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    bytes: VecDeque<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            bytes: keys.iter().copied().collect(),
        }
    }
}

impl Input for DummyInput {
    fn get_char(&mut self) -> Result<Cell, io::Error> {
        Ok(self.bytes.pop_front().map_or(END_OF_INPUT, Cell::from))
    }
}
