//! Simulated GPIO board
//!
//! Each line is an `embedded-hal` output pin whose level is shared with the
//! board, so the renderer can read back what the driver drove.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use seg7_core::font::SEGMENT_COUNT;
use seg7_core::{DisplayRegistry, SegmentPattern};
use seg7_drivers::{LineError, PinBank};
use seg7_hal::LineId;

/// Upper bound on lines a simulated board may expose
pub const MAX_LINES: usize = 256;

/// Pin bank type backing the simulator
pub type SimBank = PinBank<SimPin, MAX_LINES>;

/// Output pin recording its level
#[derive(Debug, Clone)]
pub struct SimPin {
    level: Rc<Cell<bool>>,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

/// Board with `lines` GPIO lines numbered from 0
pub struct SimBoard {
    levels: Vec<Rc<Cell<bool>>>,
}

impl SimBoard {
    pub fn new(lines: u32) -> Self {
        Self {
            levels: (0..lines).map(|_| Rc::new(Cell::new(false))).collect(),
        }
    }

    /// Number of lines on the board
    pub fn line_count(&self) -> usize {
        self.levels.len()
    }

    /// Build a line driver with one pin per board line
    pub fn pin_bank(&self) -> Result<SimBank, LineError> {
        let mut bank = PinBank::new();
        for (line, level) in (0..).zip(&self.levels) {
            bank.add_pin(
                line,
                SimPin {
                    level: Rc::clone(level),
                },
            )?;
        }
        Ok(bank)
    }

    /// Current level of a line
    pub fn level(&self, line: LineId) -> Option<bool> {
        let index = usize::try_from(line).ok()?;
        self.levels.get(index).map(|level| level.get())
    }

    /// Segments currently lit on each provisioned display
    pub fn snapshot<const N: usize>(&self, registry: &DisplayRegistry<N>) -> Vec<SegmentPattern> {
        registry
            .iter()
            .map(|group| {
                let bits = group
                    .ids()
                    .take(SEGMENT_COUNT)
                    .enumerate()
                    .filter(|&(_, id)| self.level(id) == Some(true))
                    .fold(0u8, |bits, (k, _)| bits | (1 << k));
                SegmentPattern::from_bits(bits)
            })
            .collect()
    }
}
