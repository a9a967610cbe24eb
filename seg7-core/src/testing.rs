//! Mock collaborators shared by the unit tests

use std::collections::BTreeMap;

use seg7_hal::{ChildDescriptor, DescriptionNode, LineDriver, LineId, PropertyError};

/// Every call the mock line driver received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Request(LineId),
    Free(LineId),
    Set(LineId, bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLineError {
    NoSuchLine(LineId),
    Busy(LineId),
    NotRequested(LineId),
    Injected(LineId),
}

/// Line driver with `LINE_COUNT` lines and injectable failures
#[derive(Debug, Default)]
pub struct MockLines {
    /// Requested lines and their labels
    pub owned: BTreeMap<LineId, String>,
    /// Last level written to each line
    pub levels: BTreeMap<LineId, bool>,
    pub calls: Vec<Call>,
    pub fail_request: Option<LineId>,
    pub fail_free: Option<LineId>,
    pub fail_set: Option<LineId>,
}

pub const LINE_COUNT: LineId = 128;

impl MockLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_owned(&self, line: LineId) -> bool {
        self.owned.contains_key(&line)
    }

    pub fn level(&self, line: LineId) -> Option<bool> {
        self.levels.get(&line).copied()
    }

    pub fn frees(&self) -> Vec<LineId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Free(line) => Some(*line),
                _ => None,
            })
            .collect()
    }

    pub fn sets(&self) -> Vec<(LineId, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Set(line, high) => Some((*line, *high)),
                _ => None,
            })
            .collect()
    }
}

impl LineDriver for MockLines {
    type Error = MockLineError;

    fn request_line(
        &mut self,
        line: LineId,
        initial_high: bool,
        label: &str,
    ) -> Result<(), Self::Error> {
        self.calls.push(Call::Request(line));
        if self.fail_request == Some(line) {
            return Err(MockLineError::Injected(line));
        }
        if line >= LINE_COUNT {
            return Err(MockLineError::NoSuchLine(line));
        }
        if self.owned.contains_key(&line) {
            return Err(MockLineError::Busy(line));
        }
        self.owned.insert(line, String::from(label));
        self.levels.insert(line, initial_high);
        Ok(())
    }

    fn free_line(&mut self, line: LineId) -> Result<(), Self::Error> {
        self.calls.push(Call::Free(line));
        if self.owned.remove(&line).is_none() {
            return Err(MockLineError::NotRequested(line));
        }
        // The line is given back even when the driver reports an error
        if self.fail_free == Some(line) {
            return Err(MockLineError::Injected(line));
        }
        Ok(())
    }

    fn set_line(&mut self, line: LineId, high: bool) -> Result<(), Self::Error> {
        self.calls.push(Call::Set(line, high));
        if self.fail_set == Some(line) {
            return Err(MockLineError::Injected(line));
        }
        if !self.owned.contains_key(&line) {
            return Err(MockLineError::NotRequested(line));
        }
        self.levels.insert(line, high);
        Ok(())
    }
}

/// Child node with optional byte-array properties
#[derive(Debug, Clone)]
pub struct MockChild {
    pub name: String,
    pub properties: BTreeMap<String, Vec<u32>>,
}

impl MockChild {
    pub fn with_pins(name: &str, pins: &[u32]) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(String::from("pins"), pins.to_vec());
        Self {
            name: String::from(name),
            properties,
        }
    }

    pub fn without_pins(name: &str) -> Self {
        Self {
            name: String::from(name),
            properties: BTreeMap::new(),
        }
    }
}

impl ChildDescriptor for MockChild {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_u8_array(&self, property: &str, out: &mut [u8]) -> Result<(), PropertyError> {
        let values = self.properties.get(property).ok_or(PropertyError::Missing)?;
        if values.len() != out.len() {
            return Err(PropertyError::WrongLength {
                expected: out.len(),
                found: values.len(),
            });
        }
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = u8::try_from(*value).map_err(|_| PropertyError::Unreadable)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockNode {
    pub children: Vec<MockChild>,
}

impl MockNode {
    pub fn new(children: Vec<MockChild>) -> Self {
        Self { children }
    }

    /// `count` displays on consecutive blocks of seven lines
    pub fn sequential(count: u32) -> Self {
        let children = (0..count)
            .map(|d| {
                let pins: Vec<u32> = (d * 7..d * 7 + 7).collect();
                MockChild::with_pins(&std::format!("seg{}", d), &pins)
            })
            .collect();
        Self { children }
    }
}

impl DescriptionNode for MockNode {
    type Child = MockChild;

    fn children(&self) -> impl Iterator<Item = &Self::Child> + '_ {
        self.children.iter()
    }
}
