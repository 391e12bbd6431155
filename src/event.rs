use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Input the main loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Wait up to `timeout` for a key press or a resize, dropping anything else.
pub fn next_input(timeout: Duration) -> color_eyre::Result<Option<Input>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                return Ok(Some(Input::Key(key)))
            }
            Some(Event::Resize(..)) => return Ok(Some(Input::Resize)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}
