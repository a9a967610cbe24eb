//! Driver lifecycle
//!
//! [`Seg7Driver`] owns the line driver and the display registry from attach
//! to detach. The host drives it through [`PlatformDriver`] (attach/detach)
//! and [`FileOperations`] (the device file), and must serialize those calls;
//! every entry point takes `&mut self`.

use core::fmt;

use seg7_hal::{DescriptionNode, FileOperations, LineDriver, PlatformDriver};
use seg7_protocol::COMMAND_LEN;

use crate::command::{self, WriteError};
use crate::config::{DriverConfig, COMPATIBLE, DRIVER_NAME, LINES_PER_DISPLAY};
use crate::provision::{provision, ProvisionError};
use crate::registry::{DisplayRegistry, TeardownReport};

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not attached yet, or the last attach failed
    Uninitialized,
    /// Displays provisioned, writes accepted
    Provisioned,
    /// Detached; every line released
    TornDown,
}

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Provisioning succeeded
    Attached,
    /// Provisioning failed
    AttachFailed,
    /// Host detached the device
    Detached,
}

impl State {
    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Uninitialized, Attached) => Provisioned,
            (Uninitialized, AttachFailed) => Uninitialized,
            (Uninitialized, Detached) => TornDown,
            (Provisioned, Detached) => TornDown,
            // TornDown is terminal
            _ => self,
        }
    }

    /// Check if provisioning may run in this state
    pub fn can_attach(&self) -> bool {
        matches!(self, State::Uninitialized)
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::TornDown)
    }
}

/// Errors returned from attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachError<E> {
    /// Attach called outside the Uninitialized state
    InvalidState(State),
    /// Provisioning failed; nothing is held
    Provision(ProvisionError<E>),
}

impl<E> From<ProvisionError<E>> for AttachError<E> {
    fn from(e: ProvisionError<E>) -> Self {
        AttachError::Provision(e)
    }
}

impl<E: fmt::Debug> fmt::Display for AttachError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::InvalidState(state) => write!(f, "cannot attach in state {:?}", state),
            AttachError::Provision(e) => write!(f, "provisioning failed: {}", e),
        }
    }
}

/// Seven-segment display driver instance
///
/// Dropping a provisioned driver detaches it.
pub struct Seg7Driver<D: LineDriver, const N: usize = LINES_PER_DISPLAY> {
    lines: D,
    config: DriverConfig,
    state: State,
    registry: DisplayRegistry<N>,
}

impl<D: LineDriver, const N: usize> Seg7Driver<D, N> {
    /// Create a driver with the default configuration
    pub fn new(lines: D) -> Self {
        Self::with_config(lines, DriverConfig::default())
    }

    /// Create a driver with a custom configuration
    pub fn with_config(lines: D, config: DriverConfig) -> Self {
        Self {
            lines,
            config,
            state: State::Uninitialized,
            registry: DisplayRegistry::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Active configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Number of provisioned displays
    pub fn display_count(&self) -> usize {
        self.registry.count()
    }

    /// Provisioned displays
    pub fn registry(&self) -> &DisplayRegistry<N> {
        &self.registry
    }

    /// Underlying line driver
    pub fn line_driver(&self) -> &D {
        &self.lines
    }

    /// Largest write the device file accepts: one byte per display plus two
    ///
    /// Only the first [`COMMAND_LEN`] bytes are ever interpreted.
    pub fn write_capacity(&self) -> usize {
        self.registry.count() + COMMAND_LEN
    }

    /// Discover and reserve every display described under `node`
    ///
    /// Returns the number of displays provisioned. On failure the driver
    /// stays Uninitialized and holds no lines, so attach may be retried.
    pub fn attach<T: DescriptionNode>(
        &mut self,
        node: &T,
    ) -> Result<usize, AttachError<D::Error>> {
        if !self.state.can_attach() {
            warn!("attach refused in state {:?}", self.state);
            return Err(AttachError::InvalidState(self.state));
        }

        match provision(node, &mut self.lines, &self.config) {
            Ok(registry) => {
                self.registry = registry;
                self.state = self.state.transition(Event::Attached);
                info!("attached with {} displays", self.registry.count());
                Ok(self.registry.count())
            }
            Err(e) => {
                self.state = self.state.transition(Event::AttachFailed);
                error!("attach failed");
                Err(e.into())
            }
        }
    }

    /// Release every display and enter the terminal state
    ///
    /// Never fails; line release errors are logged and counted.
    pub fn detach(&mut self) -> TeardownReport {
        let report = match self.state {
            State::Provisioned => {
                let report = self.registry.clear_all(&mut self.lines);
                if report.failed_lines > 0 {
                    warn!(
                        "teardown: {} displays released, {} lines failed",
                        report.displays,
                        report.failed_lines
                    );
                } else {
                    info!("teardown: {} displays released", report.displays);
                }
                report
            }
            State::Uninitialized => {
                warn!("detach before a successful attach");
                TeardownReport::default()
            }
            State::TornDown => {
                warn!("detach called twice");
                TeardownReport::default()
            }
        };
        self.state = self.state.transition(Event::Detached);
        report
    }

    /// Handle one device file write
    ///
    /// Before attach and after detach no display exists, so every
    /// otherwise valid write fails with `UnknownDisplay`.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, WriteError<D::Error>> {
        command::execute(&self.registry, &mut self.lines, buf)
            .inspect_err(|_| warn!("invalid input"))
    }
}

impl<D: LineDriver, const N: usize> Drop for Seg7Driver<D, N> {
    fn drop(&mut self) {
        if self.state == State::Provisioned {
            self.detach();
        }
    }
}

impl<D: LineDriver, const N: usize> PlatformDriver for Seg7Driver<D, N> {
    type Error = AttachError<D::Error>;

    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn compatible(&self) -> &'static [&'static str] {
        &[COMPATIBLE]
    }

    fn probe<T: DescriptionNode>(&mut self, node: &T) -> Result<(), Self::Error> {
        self.attach(node).map(|_| ())
    }

    fn shutdown(&mut self) {
        self.detach();
    }
}

impl<D: LineDriver, const N: usize> FileOperations for Seg7Driver<D, N> {
    type Error = WriteError<D::Error>;

    fn open(&mut self) -> Result<(), Self::Error> {
        info!("open seg7 display driver");
        Ok(())
    }

    fn write(&mut self, buf: &[u8], offset: &mut u64) -> Result<usize, Self::Error> {
        let buf = &buf[..buf.len().min(self.write_capacity())];
        let consumed = Seg7Driver::write(self, buf)?;
        *offset += consumed as u64;
        Ok(consumed)
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        info!("close seg7 display driver");
        Ok(())
    }
}
