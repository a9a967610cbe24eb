//! Display registry
//!
//! Ordered, densely indexed collection of provisioned displays. The index
//! of an entry is its creation order and is the display number clients
//! write to the device file.

use alloc::vec::Vec;
use core::fmt;

use seg7_hal::LineDriver;

use crate::config::LINES_PER_DISPLAY;
use crate::lines::LineGroup;

/// Lookup past the last display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndexOutOfRange {
    /// Requested index
    pub index: usize,
    /// Number of displays registered
    pub count: usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display {} out of range ({} registered)", self.index, self.count)
    }
}

/// Storage could not grow to hold another display
///
/// The rejected group is handed back so the caller can release it.
#[derive(Debug)]
pub struct AppendError<const N: usize> {
    group: LineGroup<N>,
}

impl<const N: usize> AppendError<N> {
    /// Take back the group that was not appended
    pub fn into_inner(self) -> LineGroup<N> {
        self.group
    }
}

/// Outcome of a full teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TeardownReport {
    /// Displays released
    pub displays: usize,
    /// Lines the driver failed to free
    pub failed_lines: usize,
}

/// Provisioned displays, indexed by creation order
#[derive(Debug, Default)]
pub struct DisplayRegistry<const N: usize = LINES_PER_DISPLAY> {
    displays: Vec<LineGroup<N>>,
    limit: Option<usize>,
}

impl<const N: usize> DisplayRegistry<N> {
    /// Create an empty, unbounded registry
    pub const fn new() -> Self {
        Self {
            displays: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty registry that refuses to grow past `limit` displays
    pub const fn with_limit(limit: Option<usize>) -> Self {
        Self {
            displays: Vec::new(),
            limit,
        }
    }

    /// Add a display at the next index
    ///
    /// If storage cannot grow, the registry is left unchanged and the group
    /// is returned inside the error.
    pub fn append(&mut self, group: LineGroup<N>) -> Result<usize, AppendError<N>> {
        if self.limit.is_some_and(|limit| self.displays.len() >= limit) {
            return Err(AppendError { group });
        }
        if self.displays.try_reserve(1).is_err() {
            return Err(AppendError { group });
        }
        self.displays.push(group);
        Ok(self.displays.len() - 1)
    }

    /// Lines of the display at `index`
    pub fn get(&self, index: usize) -> Result<&LineGroup<N>, IndexOutOfRange> {
        self.displays.get(index).ok_or(IndexOutOfRange {
            index,
            count: self.displays.len(),
        })
    }

    /// Number of registered displays
    pub fn count(&self) -> usize {
        self.displays.len()
    }

    /// Check if no display is registered
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Iterate over displays in index order
    pub fn iter(&self) -> impl Iterator<Item = &LineGroup<N>> + '_ {
        self.displays.iter()
    }

    /// Release every display, last provisioned first, and empty the registry
    ///
    /// Always runs to completion; line failures are logged and counted.
    pub fn clear_all<D: LineDriver>(&mut self, driver: &mut D) -> TeardownReport {
        let mut report = TeardownReport::default();
        while let Some(group) = self.displays.pop() {
            let index = self.displays.len();
            let failed = group.release(driver);
            if failed > 0 {
                warn!("display {}: {} lines failed to free", index, failed);
            } else {
                debug!("display {} released", index);
            }
            report.displays += 1;
            report.failed_lines += failed;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLines;
    use seg7_hal::LineId;

    fn group(lines: &mut MockLines, base: LineId) -> LineGroup {
        let ids: [LineId; 7] = core::array::from_fn(|i| base + i as LineId);
        LineGroup::reserve(lines, &ids, "pin").unwrap()
    }

    #[test]
    fn test_append_and_get() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.append(group(&mut lines, 0)).unwrap(), 0);
        assert_eq!(registry.append(group(&mut lines, 7)).unwrap(), 1);
        assert_eq!(registry.append(group(&mut lines, 14)).unwrap(), 2);
        assert_eq!(registry.count(), 3);

        assert_eq!(registry.get(1).unwrap().lines()[0].id, 7);
        assert_eq!(registry.get(2).unwrap().lines()[6].id, 20);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::new();
        registry.append(group(&mut lines, 0)).unwrap();

        assert_eq!(
            registry.get(1).unwrap_err(),
            IndexOutOfRange { index: 1, count: 1 }
        );
        assert!(registry.get(usize::MAX).is_err());
    }

    #[test]
    fn test_growth_keeps_existing_entries() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::new();
        for d in 0..9 {
            registry.append(group(&mut lines, d * 7)).unwrap();
        }
        for d in 0..9 {
            assert_eq!(registry.get(d as usize).unwrap().lines()[0].id, d * 7);
        }
    }

    #[test]
    fn test_append_past_limit_is_transactional() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::with_limit(Some(1));
        registry.append(group(&mut lines, 0)).unwrap();

        let rejected = registry.append(group(&mut lines, 7)).unwrap_err();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get(0).unwrap().lines()[0].id, 0);

        let rejected = rejected.into_inner();
        assert_eq!(rejected.lines()[0].id, 7);
        assert_eq!(rejected.release(&mut lines), 0);
    }

    #[test]
    fn test_clear_all_descending_order() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::new();
        for d in 0..3 {
            registry.append(group(&mut lines, d * 7)).unwrap();
        }
        lines.calls.clear();

        let report = registry.clear_all(&mut lines);
        assert_eq!(report, TeardownReport { displays: 3, failed_lines: 0 });
        assert!(registry.is_empty());
        assert!(lines.owned.is_empty());

        // Display 2 first, then 1, then 0; each line exactly once
        let frees = lines.frees();
        assert_eq!(frees.len(), 21);
        assert_eq!(&frees[..7], &[14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(&frees[7..14], &[7, 8, 9, 10, 11, 12, 13]);
        assert_eq!(&frees[14..], &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_clear_all_completes_despite_failures() {
        let mut lines = MockLines::new();
        let mut registry = DisplayRegistry::new();
        for d in 0..2 {
            registry.append(group(&mut lines, d * 7)).unwrap();
        }
        lines.fail_free = Some(9);

        let report = registry.clear_all(&mut lines);
        assert_eq!(report.displays, 2);
        assert_eq!(report.failed_lines, 1);
        assert!(registry.is_empty());
        assert_eq!(lines.frees().len(), 14);
    }

    #[test]
    fn test_clear_all_empty() {
        let mut lines = MockLines::new();
        let mut registry: DisplayRegistry = DisplayRegistry::new();
        assert_eq!(registry.clear_all(&mut lines), TeardownReport::default());
        assert!(lines.calls.is_empty());
    }
}
