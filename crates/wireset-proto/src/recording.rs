// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording protocol for headless testing of container adapters.
//!
//! [`RecordingProtocol`] logs every typed call as a [`WireEvent`] instead of
//! producing bytes, and can replay a log as an input. Use it to verify
//! framing and element-call counts independently of any byte layout, or to
//! inject a failure at a chosen read/write.

use std::collections::VecDeque;

use crate::{InputProtocol, OutputProtocol, ProtocolError, Result, SetHeader};

/// One typed protocol call.
#[derive(Debug, Clone, PartialEq)]
pub enum WireEvent {
    /// `set_begin` with its header.
    SetBegin(SetHeader),
    /// `set_end`.
    SetEnd,
    /// Boolean value.
    Bool(bool),
    /// 8-bit integer.
    I8(i8),
    /// 16-bit integer.
    I16(i16),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// Double.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Opaque bytes.
    Binary(Vec<u8>),
}

/// In-memory protocol that records writes and replays reads.
#[derive(Debug, Default)]
pub struct RecordingProtocol {
    /// Events written so far (or still queued for reading).
    pub events: VecDeque<WireEvent>,
    /// Number of calls that succeeded before the armed failure fires.
    fail_after: Option<usize>,
    /// Total calls served.
    pub calls: usize,
}

impl RecordingProtocol {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader that replays `events` in order.
    pub fn replay(events: impl IntoIterator<Item = WireEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make every call after the first `calls` fail with a transport error.
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Number of recorded element-level events (everything except framing).
    pub fn element_count(&self) -> usize {
        self.events
            .iter()
            .filter(|ev| !matches!(ev, WireEvent::SetBegin(_) | WireEvent::SetEnd))
            .count()
    }

    fn tick(&mut self) -> Result<()> {
        if self.fail_after.is_some_and(|limit| self.calls >= limit) {
            return Err(ProtocolError::Transport(std::io::Error::other(
                "injected failure",
            )));
        }
        self.calls += 1;
        Ok(())
    }

    fn record(&mut self, event: WireEvent) -> Result<()> {
        self.tick()?;
        self.events.push_back(event);
        Ok(())
    }

    fn pop_event(&mut self) -> Result<WireEvent> {
        self.tick()?;
        self.events.pop_front().ok_or(ProtocolError::UnexpectedEof)
    }
}

/// Replayed event did not match the requested read.
fn mismatch(event: &WireEvent) -> ProtocolError {
    ProtocolError::Transport(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("replay mismatch: got {event:?}"),
    ))
}

macro_rules! replay_read {
    ($self:ident, $variant:ident) => {
        match $self.pop_event()? {
            WireEvent::$variant(value) => Ok(value),
            other => Err(mismatch(&other)),
        }
    };
}

impl InputProtocol for RecordingProtocol {
    fn read_set_begin(&mut self) -> Result<SetHeader> {
        replay_read!(self, SetBegin)
    }

    fn read_set_end(&mut self) -> Result<()> {
        match self.pop_event()? {
            WireEvent::SetEnd => Ok(()),
            other => Err(mismatch(&other)),
        }
    }

    fn read_bool(&mut self) -> Result<bool> {
        replay_read!(self, Bool)
    }

    fn read_i8(&mut self) -> Result<i8> {
        replay_read!(self, I8)
    }

    fn read_i16(&mut self) -> Result<i16> {
        replay_read!(self, I16)
    }

    fn read_i32(&mut self) -> Result<i32> {
        replay_read!(self, I32)
    }

    fn read_i64(&mut self) -> Result<i64> {
        replay_read!(self, I64)
    }

    fn read_double(&mut self) -> Result<f64> {
        replay_read!(self, Double)
    }

    fn read_string(&mut self) -> Result<String> {
        replay_read!(self, String)
    }

    fn read_binary(&mut self) -> Result<Vec<u8>> {
        replay_read!(self, Binary)
    }
}

impl OutputProtocol for RecordingProtocol {
    fn write_set_begin(&mut self, header: SetHeader) -> Result<()> {
        self.record(WireEvent::SetBegin(header))
    }

    fn write_set_end(&mut self) -> Result<()> {
        self.record(WireEvent::SetEnd)
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.record(WireEvent::Bool(value))
    }

    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.record(WireEvent::I8(value))
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.record(WireEvent::I16(value))
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.record(WireEvent::I32(value))
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.record(WireEvent::I64(value))
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        self.record(WireEvent::Double(value))
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.record(WireEvent::String(value.to_string()))
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        self.record(WireEvent::Binary(value.to_vec()))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
