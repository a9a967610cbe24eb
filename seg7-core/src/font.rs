//! Seven-segment digit encoding
//!
//! Segment layout, with bit k of a pattern driving line k of a display:
//! ```text
//!    ─a─
//!   f   b
//!    ─g─
//!   e   c
//!    ─d─
//! ```
//! Line 0 is segment a, line 6 is segment g. A display with more than
//! seven lines never lights the extra ones.

use core::fmt;

/// Number of segments a pattern can light
pub const SEGMENT_COUNT: usize = 7;

/// Which segments are lit, one bit per line position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    /// All segments off
    pub const BLANK: Self = Self(0);

    /// Create a pattern from raw bits (bit 7 is masked off)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    /// Raw 7-bit value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the line at `position` should be driven high
    pub const fn is_lit(self, position: usize) -> bool {
        position < SEGMENT_COUNT && (self.0 >> position) & 1 == 1
    }

    /// Number of lit segments
    pub const fn lit_count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Digit patterns, indexed by digit
pub const DIGIT_PATTERNS: [SegmentPattern; 10] = [
    SegmentPattern(0b0011_1111), // 0
    SegmentPattern(0b0000_0110), // 1
    SegmentPattern(0b0101_1011), // 2
    SegmentPattern(0b0100_1111), // 3
    SegmentPattern(0b0110_0110), // 4
    SegmentPattern(0b0110_1101), // 5
    SegmentPattern(0b0111_1101), // 6
    SegmentPattern(0b0000_0111), // 7
    SegmentPattern(0b0111_1111), // 8
    SegmentPattern(0b0110_1111), // 9
];

/// The digit has no seven-segment pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidDigit(pub u8);

impl fmt::Display for InvalidDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a decimal digit", self.0)
    }
}

/// Pattern for a decimal digit
pub fn pattern_for(digit: u8) -> Result<SegmentPattern, InvalidDigit> {
    DIGIT_PATTERNS
        .get(usize::from(digit))
        .copied()
        .ok_or(InvalidDigit(digit))
}

/// Letter naming a line position: 0 → 'A', 1 → 'B', ...
///
/// Returns None past 'Z'.
pub fn position_letter(position: usize) -> Option<char> {
    let offset = u8::try_from(position).ok().filter(|p| *p < 26)?;
    Some(char::from(b'A' + offset))
}
