//! Provisioning from a hardware description
//!
//! Walks the children of the description node in order. Each child names
//! the lines of one display in its pins property; the lines are reserved
//! and the display is appended to a fresh registry.
//!
//! Provisioning is all-or-nothing. On any error every display appended so
//! far is released before the error is returned, so a failed attach holds
//! no lines.

use core::fmt;

use seg7_hal::{ChildDescriptor, DescriptionNode, LineDriver, LineId, PropertyError};

use crate::config::DriverConfig;
use crate::lines::{LineGroup, ReservationError};
use crate::registry::DisplayRegistry;

/// Errors that abort provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProvisionError<E> {
    /// The description node has no children
    NoChildDescriptors,
    /// A child's pins property is missing or malformed
    PropertyRead {
        /// Position of the offending child
        child: usize,
        /// Why the property could not be read
        source: PropertyError,
    },
    /// A child's lines could not be reserved
    Reservation {
        /// Position of the offending child
        child: usize,
        /// Why the reservation failed
        source: ReservationError<E>,
    },
    /// The registry could not grow to hold another display
    OutOfMemory {
        /// Position of the child that did not fit
        child: usize,
    },
}

impl<E> ProvisionError<E> {
    /// Whether the hardware description itself is at fault
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProvisionError::NoChildDescriptors | ProvisionError::PropertyRead { .. }
        )
    }

    /// Position of the child that caused the failure, if any
    pub fn child(&self) -> Option<usize> {
        match self {
            ProvisionError::NoChildDescriptors => None,
            ProvisionError::PropertyRead { child, .. }
            | ProvisionError::Reservation { child, .. }
            | ProvisionError::OutOfMemory { child } => Some(*child),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for ProvisionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::NoChildDescriptors => f.write_str("description node has no children"),
            ProvisionError::PropertyRead { child, source } => {
                write!(f, "child {}: cannot read pins: {}", child, source)
            }
            ProvisionError::Reservation { child, source } => {
                write!(f, "child {}: {}", child, source)
            }
            ProvisionError::OutOfMemory { child } => {
                write!(f, "child {}: registry cannot grow", child)
            }
        }
    }
}

/// Registry under construction
///
/// Releases everything appended so far when dropped without `commit`.
struct Rollback<'a, D: LineDriver, const N: usize> {
    driver: &'a mut D,
    registry: DisplayRegistry<N>,
}

impl<D: LineDriver, const N: usize> Rollback<'_, D, N> {
    fn commit(mut self) -> DisplayRegistry<N> {
        core::mem::replace(&mut self.registry, DisplayRegistry::new())
    }
}

impl<D: LineDriver, const N: usize> Drop for Rollback<'_, D, N> {
    fn drop(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        warn!("rolling back {} provisioned displays", self.registry.count());
        let report = self.registry.clear_all(&mut *self.driver);
        if report.failed_lines > 0 {
            error!("rollback left {} lines unfreed", report.failed_lines);
        }
    }
}

/// Provision one display per child of `node`
///
/// Children are processed in description order; the returned registry
/// holds them at the same indices.
pub fn provision<T, D, const N: usize>(
    node: &T,
    driver: &mut D,
    config: &DriverConfig,
) -> Result<DisplayRegistry<N>, ProvisionError<D::Error>>
where
    T: DescriptionNode,
    D: LineDriver,
{
    let mut children = node.children().peekable();
    if children.peek().is_none() {
        error!("description node has no children");
        return Err(ProvisionError::NoChildDescriptors);
    }

    let mut pending = Rollback {
        driver,
        registry: DisplayRegistry::with_limit(config.max_displays),
    };

    for (child, descriptor) in children.enumerate() {
        debug!("got child node {}", descriptor.name());

        let mut raw = [0u8; N];
        descriptor
            .read_u8_array(config.pins_property.as_str(), &mut raw)
            .map_err(|source| {
                error!(
                    "child {} ({}): cannot read {}",
                    child,
                    descriptor.name(),
                    config.pins_property.as_str()
                );
                ProvisionError::PropertyRead { child, source }
            })?;
        let ids: [LineId; N] = raw.map(LineId::from);

        let group = LineGroup::reserve(&mut *pending.driver, &ids, config.label_prefix.as_str())
            .map_err(|source| {
                error!("child {} ({}): line request failed", child, descriptor.name());
                ProvisionError::Reservation { child, source }
            })?;

        match pending.registry.append(group) {
            Ok(index) => info!("display {} ready on node {}", index, descriptor.name()),
            Err(rejected) => {
                error!("child {} ({}): registry cannot grow", child, descriptor.name());
                let failed = rejected.into_inner().release(&mut *pending.driver);
                if failed > 0 {
                    error!("{} lines of child {} failed to free", failed, child);
                }
                return Err(ProvisionError::OutOfMemory { child });
            }
        }
    }

    let registry = pending.commit();
    info!("provisioned {} displays", registry.count());
    Ok(registry)
}
