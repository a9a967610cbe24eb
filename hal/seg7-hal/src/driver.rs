//! Platform driver lifecycle
//!
//! The host matches a description node against [`PlatformDriver::compatible`]
//! and calls [`PlatformDriver::probe`] once when the device attaches and
//! [`PlatformDriver::shutdown`] once when it detaches.

use crate::tree::DescriptionNode;

/// A driver bound to description nodes by compatible string
pub trait PlatformDriver {
    /// Error returned from a failed probe
    type Error;

    /// Driver name as registered with the host
    fn name(&self) -> &'static str;

    /// Compatible strings this driver binds to
    fn compatible(&self) -> &'static [&'static str];

    /// Check whether this driver binds to `compatible`
    fn matches(&self, compatible: &str) -> bool {
        self.compatible().contains(&compatible)
    }

    /// Attach to a matching node
    ///
    /// A failed probe must leave no resources held.
    fn probe<N: DescriptionNode>(&mut self, node: &N) -> Result<(), Self::Error>;

    /// Detach and release every resource acquired by `probe`
    ///
    /// Cannot fail; implementations log and continue.
    fn shutdown(&mut self);
}
