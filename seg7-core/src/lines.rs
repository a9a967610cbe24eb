//! Line reservation
//!
//! A [`LineGroup`] is the set of lines driving one display. It is only ever
//! handed out fully reserved: if any request fails, the lines already taken
//! in the same call are freed before the error is returned.

use core::fmt::{self, Write};

use heapless::{String, Vec};
use seg7_hal::{LineDriver, LineId};

use crate::config::{LINES_PER_DISPLAY, MAX_LABEL_LEN};
use crate::font::{position_letter, SegmentPattern};

/// Label attached to a reserved line
pub type Label = String<MAX_LABEL_LEN>;

/// Errors reserving a display's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReservationError<E> {
    /// The line driver refused a request (line in use or nonexistent)
    Rejected {
        /// Line that could not be requested
        line: LineId,
        /// Error reported by the line driver
        source: E,
    },
    /// The same line appears twice in one display
    DuplicateLine(LineId),
    /// Prefix plus segment letter does not fit in a label
    LabelTooLong,
}

impl<E: fmt::Debug> fmt::Display for ReservationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationError::Rejected { line, source } => {
                write!(f, "line {} rejected by driver: {:?}", line, source)
            }
            ReservationError::DuplicateLine(line) => {
                write!(f, "line {} listed twice for one display", line)
            }
            ReservationError::LabelTooLong => {
                write!(f, "line label longer than {} bytes", MAX_LABEL_LEN)
            }
        }
    }
}

/// One line of a display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineDescriptor {
    /// Line id as known to the line driver
    pub id: LineId,
    /// Level driven right after reservation
    pub initial_high: bool,
    /// Consumer label, prefix plus segment letter
    pub label: Label,
}

impl LineDescriptor {
    /// Describe the output line at `position` of a display, starting low
    pub fn output_low(id: LineId, label_prefix: &str, position: usize) -> Option<Self> {
        let mut label = Label::new();
        let letter = position_letter(position)?;
        write!(label, "{}{}", label_prefix, letter).ok()?;
        Some(Self {
            id,
            initial_high: false,
            label,
        })
    }
}

/// The reserved lines of one display
///
/// Holds exactly `N` distinct lines, all requested from the driver.
/// Dropping a group does not free its lines; use [`LineGroup::release`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineGroup<const N: usize = LINES_PER_DISPLAY> {
    lines: Vec<LineDescriptor, N>,
}

impl<const N: usize> LineGroup<N> {
    const VALID_SIZE: () = assert!(N > 0 && N <= 26, "a display needs 1 to 26 lines");

    /// Reserve all lines of one display
    ///
    /// Every line is requested low and labelled `label_prefix` followed by
    /// its position letter. On error no line from `ids` is left reserved.
    pub fn reserve<D: LineDriver>(
        driver: &mut D,
        ids: &[LineId; N],
        label_prefix: &str,
    ) -> Result<Self, ReservationError<D::Error>> {
        let () = Self::VALID_SIZE;

        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(ReservationError::DuplicateLine(*id));
            }
        }

        let mut descriptors: Vec<LineDescriptor, N> = Vec::new();
        for (position, &id) in ids.iter().enumerate() {
            let line = LineDescriptor::output_low(id, label_prefix, position)
                .ok_or(ReservationError::LabelTooLong)?;
            // Capacity is N and there are N ids
            let _ = descriptors.push(line);
        }

        let mut pending = Pending {
            driver,
            reserved: Vec::new(),
        };
        for line in descriptors {
            if let Err(source) =
                pending
                    .driver
                    .request_line(line.id, line.initial_high, line.label.as_str())
            {
                warn!(
                    "request for line {} ({}) failed, freeing {} lines",
                    line.id,
                    line.label.as_str(),
                    pending.reserved.len()
                );
                return Err(ReservationError::Rejected {
                    line: line.id,
                    source,
                });
            }
            trace!("reserved line {} as {}", line.id, line.label.as_str());
            let _ = pending.reserved.push(line);
        }

        Ok(pending.commit())
    }

    /// Free every line of this group
    ///
    /// All lines are attempted even if some fail. Returns the number of
    /// lines the driver failed to free.
    pub fn release<D: LineDriver>(self, driver: &mut D) -> usize {
        let mut failed = 0;
        for line in &self.lines {
            if driver.free_line(line.id).is_err() {
                warn!("failed to free line {} ({})", line.id, line.label.as_str());
                failed += 1;
            }
        }
        failed
    }

    /// Drive line k high when bit k of `pattern` is set, low otherwise
    ///
    /// Every line is written even if an earlier write fails; the first
    /// error is returned.
    pub fn set_pattern<D: LineDriver>(
        &self,
        driver: &mut D,
        pattern: SegmentPattern,
    ) -> Result<(), D::Error> {
        let mut result = Ok(());
        for (position, line) in self.lines.iter().enumerate() {
            if let Err(e) = driver.set_line(line.id, pattern.is_lit(position)) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Descriptors in position order
    pub fn lines(&self) -> &[LineDescriptor] {
        &self.lines
    }

    /// Line ids in position order
    pub fn ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.iter().map(|line| line.id)
    }
}

/// Lines requested so far in one `reserve` call
///
/// Frees them when dropped unless committed into a [`LineGroup`].
struct Pending<'a, D: LineDriver, const N: usize> {
    driver: &'a mut D,
    reserved: Vec<LineDescriptor, N>,
}

impl<D: LineDriver, const N: usize> Pending<'_, D, N> {
    fn commit(mut self) -> LineGroup<N> {
        LineGroup {
            lines: core::mem::replace(&mut self.reserved, Vec::new()),
        }
    }
}

impl<D: LineDriver, const N: usize> Drop for Pending<'_, D, N> {
    fn drop(&mut self) {
        while let Some(line) = self.reserved.pop() {
            if self.driver.free_line(line.id).is_err() {
                warn!("failed to free line {} during unwind", line.id);
            }
        }
    }
}
