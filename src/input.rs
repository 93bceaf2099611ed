use std::io::stdin;

use termion::{event::Key, input::TermRead};

use crate::prelude::*;

#[derive(Debug)]
pub enum InputMessage {
    Key(Key),
    Error(String),
}

/// Reads key events off the terminal on a dedicated OS thread.
///
/// The channel closes when stdin reaches end of input. This is a plain
/// thread rather than a runtime blocking task so shutdown never waits on a
/// terminal read that will not return.
pub fn spawn_input_thread() -> Receiver<InputMessage> {
    let (sender, receiver) = unbounded_channel();
    std::thread::spawn(move || {
        let stdin = stdin();

        for key in stdin.keys() {
            match key {
                Ok(key) => {
                    if sender.send(InputMessage::Key(key)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = sender.send(InputMessage::Error(err.to_string()));
                    break;
                }
            }
        }
    });
    receiver
}
