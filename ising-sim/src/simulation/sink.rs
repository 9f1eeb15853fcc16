use std::io::Write;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use thiserror::Error;

use crate::error::{IsingError, Result as IsingResult};
use crate::statistics::ObservableSample;

/// One reporting interval, borrowed from the driver for the duration of a
/// [`ReportSink::publish`] call.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub iteration: usize,
    pub sample: ObservableSample,
    pub rows: usize,
    pub cols: usize,
    /// Row-major lattice snapshot, values in {-1, +1}.
    pub snapshot: &'a [i8],
}

impl Report<'_> {
    /// Integer part of the energy, truncated toward zero.
    pub fn energy_truncated(&self) -> i64 {
        self.sample.energy_truncated()
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink receiver disconnected")]
    Disconnected,
}

/// Consumer of per-iteration reports (printer, plotter, live display).
///
/// Errors are the sink's own business: the driver logs them and keeps going.
pub trait ReportSink {
    fn publish(&mut self, report: &Report<'_>) -> Result<(), SinkError>;
}

/// Plain-text record stream, one line per iteration:
/// `iteration trunc(energy) energy magnetization specific_heat`, the three reals
/// left-aligned in 9 columns with two decimals.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn publish(&mut self, report: &Report<'_>) -> Result<(), SinkError> {
        let s = &report.sample;
        writeln!(
            self.out,
            "{} {} {:<9.2} {:<9.2} {:<9.2}",
            report.iteration,
            report.energy_truncated(),
            s.energy,
            s.magnetization,
            s.specific_heat
        )?;
        Ok(())
    }
}

/// Owned copy of a [`Report`], as delivered through a [`ChannelSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub iteration: usize,
    pub sample: ObservableSample,
    pub rows: usize,
    pub cols: usize,
    pub spins: Vec<i8>,
}

/// Bounded hand-off to another thread (e.g. a display).
///
/// Never blocks the simulation: when the buffer is full the frame is dropped and
/// counted. A dropped receiver is reported as [`SinkError::Disconnected`].
pub struct ChannelSink {
    tx: SyncSender<Frame>,
    dropped: usize,
}

impl ChannelSink {
    /// `capacity` must be at least 1: a zero-capacity channel is a rendezvous,
    /// and `try_send` on it fails unless the receiver is already blocked waiting.
    pub fn new(capacity: usize) -> IsingResult<(Self, Receiver<Frame>)> {
        if capacity == 0 {
            return Err(IsingError::InvalidParameter {
                name: "capacity",
                reason: "channel sink needs room for at least one frame".to_string(),
            });
        }
        let (tx, rx) = sync_channel(capacity);
        Ok((Self { tx, dropped: 0 }, rx))
    }

    /// Frames discarded because the consumer lagged.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl ReportSink for ChannelSink {
    fn publish(&mut self, report: &Report<'_>) -> Result<(), SinkError> {
        let frame = Frame {
            iteration: report.iteration,
            sample: report.sample,
            rows: report.rows,
            cols: report.cols,
            spins: report.snapshot.to_vec(),
        };
        match self.tx.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(snapshot: &[i8]) -> Report<'_> {
        Report {
            iteration: 17,
            sample: ObservableSample {
                energy: -3.456,
                magnetization: 0.9,
                specific_heat: 1.234,
            },
            rows: 3,
            cols: 3,
            snapshot,
        }
    }

    #[test]
    fn test_text_record_format() {
        let spins = [1i8; 9];
        let mut sink = TextSink::new(Vec::new());
        sink.publish(&report(&spins)).unwrap();
        let line = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(line, "17 -3 -3.46     0.90      1.23     \n");
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields, vec!["17", "-3", "-3.46", "0.90", "1.23"]);
    }

    #[test]
    fn test_text_record_truncates_toward_zero() {
        let spins = [1i8; 9];
        let mut sink = TextSink::new(Vec::new());
        for energy in [-3.5, -4.0, -0.5, 1.5] {
            let mut r = report(&spins);
            r.iteration = 0;
            r.sample.energy = energy;
            sink.publish(&r).unwrap();
        }
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let ints: Vec<&str> = text
            .lines()
            .map(|l| l.split_whitespace().nth(1).unwrap())
            .collect();
        assert_eq!(ints, vec!["-3", "-4", "0", "1"]);
        assert!(text.starts_with("0 -3 -3.50 "));
    }

    #[test]
    fn test_channel_drops_when_full() {
        let spins = [1i8; 9];
        let (mut sink, rx) = ChannelSink::new(1).unwrap();
        sink.publish(&report(&spins)).unwrap();
        sink.publish(&report(&spins)).unwrap();
        assert_eq!(sink.dropped(), 1);
        let frame = rx.recv().unwrap();
        assert_eq!(frame.iteration, 17);
        assert_eq!(frame.spins, spins.to_vec());
    }

    #[test]
    fn test_channel_rejects_zero_capacity() {
        assert!(matches!(
            ChannelSink::new(0),
            Err(IsingError::InvalidParameter {
                name: "capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_channel_disconnected() {
        let spins = [1i8; 9];
        let (mut sink, rx) = ChannelSink::new(4).unwrap();
        drop(rx);
        assert!(matches!(
            sink.publish(&report(&spins)),
            Err(SinkError::Disconnected)
        ));
    }
}
