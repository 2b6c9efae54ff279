//! Host-side [`Transport`] that records instead of transmitting.
//!
//! Available in unit tests and with the `std` feature (integration tests,
//! the host tool).

use heapless::Vec;

use crate::error::{Error, Result};
use crate::registers::CommandWord;
use crate::transport::Transport;

/// Maximum number of events one recorder holds.
pub const EVENT_CAPACITY: usize = 64;

/// One observed transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `send_command`.
    Command(CommandWord),
    /// `pulse_load`.
    Load,
    /// `pulse_reset`.
    Reset,
    /// `set_clear`.
    Clear(bool),
}

/// Records every transport call in order.
///
/// Once [`EVENT_CAPACITY`] events are held, further calls fail with
/// [`Error::Communication`]; call [`RecordingTransport::clear_events`] between
/// phases of a long test.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Vec<Event, EVENT_CAPACITY>,
    fail_next: Option<Error>,
}

impl RecordingTransport {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Only the command words, in order.
    pub fn commands(&self) -> impl Iterator<Item = CommandWord> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Command(word) => Some(*word),
            _ => None,
        })
    }

    /// Forget recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Make the next transport call fail with `error` without recording it.
    pub fn fail_next(&mut self, error: Error) {
        self.fail_next = Some(error);
    }

    fn record(&mut self, event: Event) -> Result<()> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.events.push(event).map_err(|_| Error::Communication)
    }
}

impl Transport for RecordingTransport {
    fn send_command(&mut self, word: CommandWord) -> Result<()> {
        self.record(Event::Command(word))
    }

    fn pulse_load(&mut self) -> Result<()> {
        self.record(Event::Load)
    }

    fn pulse_reset(&mut self) -> Result<()> {
        self.record(Event::Reset)
    }

    fn set_clear(&mut self, active: bool) -> Result<()> {
        self.record(Event::Clear(active))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut t = RecordingTransport::new();
        t.pulse_reset().unwrap();
        t.send_command(CommandWord::new(0x12_3456)).unwrap();
        t.pulse_load().unwrap();
        t.set_clear(true).unwrap();
        assert_eq!(
            t.events(),
            &[
                Event::Reset,
                Event::Command(CommandWord::new(0x12_3456)),
                Event::Load,
                Event::Clear(true),
            ]
        );
        assert_eq!(t.commands().count(), 1);
    }

    #[test]
    fn injected_failure_is_not_recorded() {
        let mut t = RecordingTransport::new();
        t.fail_next(Error::Gpio);
        assert_eq!(t.pulse_load(), Err(Error::Gpio));
        assert!(t.events().is_empty());
        t.pulse_load().unwrap();
        assert_eq!(t.events(), &[Event::Load]);
    }

    #[test]
    fn full_recorder_reports_communication_error() {
        let mut t = RecordingTransport::new();
        for _ in 0..EVENT_CAPACITY {
            t.pulse_load().unwrap();
        }
        assert_eq!(t.pulse_load(), Err(Error::Communication));
        t.clear_events();
        assert!(t.pulse_load().is_ok());
    }
}
