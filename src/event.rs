use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::error::Result;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Terminal resize event.
    Resize(u16, u16),
}

/// Blocking event source over crossterm.
///
/// The engine is cooperatively driven: each call blocks until the user
/// produces a key press (or the terminal resizes), the caller mutates state
/// synchronously, then redraws. There is no background work.
pub struct EventSource;

impl EventSource {
    pub fn new() -> Self {
        Self
    }

    /// Block until the next relevant event.
    ///
    /// Key releases/repeats and mouse events are swallowed here so the
    /// caller only ever sees presses and resizes.
    pub fn next(&self) -> Result<Event> {
        loop {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Event::Key(key));
                }
                CrosstermEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                _ => {}
            }
        }
    }
}
