//! Text rendering of seven-segment displays
//!
//! Each display is three rows of three characters:
//!
//! ```text
//!  _       _   _
//! | |   |  _|  _|
//! |_|   | |_   _|
//! ```

use seg7_core::SegmentPattern;

// Segment positions a..g
const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;
const E: usize = 4;
const F: usize = 5;
const G: usize = 6;

fn mark(pattern: SegmentPattern, position: usize, lit: char) -> char {
    if pattern.is_lit(position) {
        lit
    } else {
        ' '
    }
}

/// Render one row of displays, left to right
pub fn render(patterns: &[SegmentPattern]) -> String {
    let mut rows = [String::new(), String::new(), String::new()];

    for (i, &p) in patterns.iter().enumerate() {
        if i > 0 {
            for row in &mut rows {
                row.push(' ');
            }
        }
        rows[0].extend([' ', mark(p, A, '_'), ' ']);
        rows[1].extend([mark(p, F, '|'), mark(p, G, '_'), mark(p, B, '|')]);
        rows[2].extend([mark(p, E, '|'), mark(p, D, '_'), mark(p, C, '|')]);
    }

    rows.iter()
        .map(|row| row.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
