use std::{io, sync::mpsc, thread, time::Duration};
use termion::{
    event::{Event as TermEvent, Key},
    input::TermRead,
};

pub(crate) enum Event<I> {
    Input(I),
    Tick,
}

/// A small event handler that wraps termion input and frame ticks. Each event
/// type is produced in its own thread and delivered to a common `Receiver`.
pub(crate) struct Events {
    rx: mpsc::Receiver<Event<TermEvent>>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    pub(crate) exit_key: Key,
    pub(crate) confirm_key: Key,
    pub(crate) tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            exit_key: Key::Char('q'),
            confirm_key: Key::Char('\n'),
            tick_rate: Duration::from_secs(1) / 60,
        }
    }
}

impl Events {
    pub(crate) fn with_config(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            _input_handle: {
                let tx = tx.clone();
                thread::spawn(move || {
                    let stdin = io::stdin();
                    for event in stdin.events().flatten() {
                        if let Err(err) = tx.send(Event::Input(event)) {
                            tracing::debug!(%err, "input receiver gone");
                            return;
                        }
                    }
                })
            },
            _tick_handle: {
                thread::spawn(move || loop {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    thread::sleep(config.tick_rate);
                })
            },
        }
    }

    pub(crate) fn next(&self) -> Result<Event<TermEvent>, mpsc::RecvError> {
        self.rx.recv()
    }

    /// The next event if one is already waiting.
    pub(crate) fn try_next(&self) -> Option<Event<TermEvent>> {
        self.rx.try_recv().ok()
    }
}
