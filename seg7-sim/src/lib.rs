//! Host simulator for the seg7 display driver
//!
//! Binds the driver to a TOML board description, backs its lines with
//! simulated pins and exposes the device file as a line-oriented session.

pub mod board;
pub mod hardware;
pub mod render;

use anyhow::{anyhow, bail, Result};
use log::{info, warn};
use seg7_core::config::{CLASS_NAME, DEVICE_FILE_NAME};
use seg7_core::{AttachError, Seg7Driver, TeardownReport};
use seg7_hal::{FileOperations, PlatformDriver};

use board::{SimBank, SimBoard};
use hardware::HardwareDescription;

/// A driver bound to a simulated board with its device file open
pub struct Simulator {
    board: SimBoard,
    driver: Seg7Driver<SimBank>,
    offset: u64,
}

impl Simulator {
    /// Probe the driver against `description` and open the device file
    pub fn start(description: &HardwareDescription) -> Result<Self> {
        let board = SimBoard::new(description.lines);
        let bank = board
            .pin_bank()
            .map_err(|e| anyhow!("board setup failed: {:?}", e))?;

        let mut driver = Seg7Driver::with_config(bank, description.driver.clone());
        if !driver.matches(&description.compatible) {
            bail!(
                "{} does not bind to compatible \"{}\"",
                driver.name(),
                description.compatible
            );
        }

        driver.probe(description).map_err(|e| match e {
            AttachError::Provision(ref p) if p.is_configuration() => {
                anyhow!("probe failed: invalid board description: {}", p)
            }
            e => anyhow!("probe failed: {}", e),
        })?;
        driver
            .open()
            .map_err(|e| anyhow!("open failed: {}", e))?;
        info!(
            "{} bound to {} displays on a {}-line board",
            driver.name(),
            driver.display_count(),
            board.line_count()
        );
        info!("device file {} ready in class {}", DEVICE_FILE_NAME, CLASS_NAME);

        Ok(Self {
            board,
            driver,
            offset: 0,
        })
    }

    /// Number of provisioned displays
    pub fn display_count(&self) -> usize {
        self.driver.display_count()
    }

    /// Write `input` to the device file
    ///
    /// Returns the bytes consumed; rejected writes are logged and returned
    /// as errors without touching any display.
    pub fn write(&mut self, input: &[u8]) -> Result<usize> {
        FileOperations::write(&mut self.driver, input, &mut self.offset).map_err(|e| {
            warn!("write rejected: {}", e);
            anyhow!("{}", e)
        })
    }

    /// Bytes consumed since the device file was opened
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Render the displays as text
    pub fn render(&self) -> String {
        render::render(&self.board.snapshot(self.driver.registry()))
    }

    /// Close the device file and detach the driver
    pub fn shutdown(mut self) -> TeardownReport {
        if let Err(e) = self.driver.release() {
            warn!("release failed: {}", e);
        }
        self.driver.detach()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seg7_core::pattern_for;

    const BOARD: &str = r#"
        compatible = "7_segment"
        lines = 16

        [[display]]
        name = "tens"
        pins = [0, 1, 2, 3, 4, 5, 6]

        [[display]]
        name = "ones"
        pins = [8, 9, 10, 11, 12, 13, 14]
    "#;

    fn start(text: &str) -> Result<Simulator> {
        Simulator::start(&HardwareDescription::parse(text)?)
    }

    #[test]
    fn test_session() {
        let mut sim = start(BOARD).unwrap();
        assert_eq!(sim.display_count(), 2);
        assert_eq!(sim.render(), "\n\n");

        assert_eq!(sim.write(b"04\n").unwrap(), 2);
        assert_eq!(sim.write(b"12").unwrap(), 2);
        assert_eq!(sim.offset(), 4);
        assert_eq!(sim.render(), "     _\n|_|  _|\n  | |_");

        let snapshot = sim.board.snapshot(sim.driver.registry());
        assert_eq!(snapshot, [pattern_for(4).unwrap(), pattern_for(2).unwrap()]);

        let report = sim.shutdown();
        assert_eq!(report.displays, 2);
        assert_eq!(report.failed_lines, 0);
    }

    #[test]
    fn test_rejected_writes() {
        let mut sim = start(BOARD).unwrap();
        sim.write(b"07").unwrap();
        let before = sim.render();

        assert!(sim.write(b"27").is_err());
        assert!(sim.write(b"0a").is_err());
        assert!(sim.write(b"\n").is_err());
        assert_eq!(sim.render(), before);
        assert_eq!(sim.offset(), 2);
    }

    #[test]
    fn test_wrong_compatible() {
        let err = start("compatible = \"gpio-leds\"\n[[display]]\nname = \"x\"\npins = [0, 1, 2, 3, 4, 5, 6]\n")
            .err()
            .unwrap();
        assert!(err.to_string().contains("gpio-leds"));
    }

    #[test]
    fn test_probe_failure() {
        // Line 20 does not exist on a 16-line board
        let text = r#"
            compatible = "7_segment"
            lines = 16
            [[display]]
            name = "a"
            pins = [0, 1, 2, 3, 4, 5, 20]
        "#;
        let err = start(text).err().unwrap();
        assert!(err.to_string().starts_with("probe failed"));
    }

    #[test]
    fn test_no_displays() {
        let err = start("compatible = \"7_segment\"\n").err().unwrap();
        assert!(err.to_string().contains("invalid board description"));
    }
}
