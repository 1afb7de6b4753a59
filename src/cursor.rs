//! Traversal order over carrier samples
//!
//! Row, column and channel are three independent modulo counters advanced in
//! lockstep. They are not a mixed-radix index: on a 2x2 carrier the cursor
//! visits (0,0,0), (1,1,1), (0,0,2), (1,1,0), ... and never touches (0,1,_).

use crate::pixels::CHANNELS;

/// A sample coordinate: (row, column, channel)
pub type Coord = (usize, usize, usize);

/// Position of the encoder/decoder inside a carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalCursor {
    row: usize,
    col: usize,
    chan: usize,
    height: usize,
    width: usize,
}

impl TraversalCursor {
    /// Cursor at (0, 0, 0) for a `height` x `width` carrier.
    ///
    /// Both dimensions must be non-zero; callers reject degenerate carriers
    /// before building a cursor.
    pub fn new(height: usize, width: usize) -> Self {
        debug_assert!(height > 0 && width > 0, "cursor over empty carrier");
        Self {
            row: 0,
            col: 0,
            chan: 0,
            height,
            width,
        }
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        (self.row, self.col, self.chan)
    }

    /// Step every counter by one, each wrapping on its own modulus
    #[inline]
    pub fn advance(&mut self) {
        self.row = (self.row + 1) % self.height;
        self.col = (self.col + 1) % self.width;
        self.chan = (self.chan + 1) % CHANNELS;
    }
}

impl Iterator for TraversalCursor {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let pos = self.coord();
        self.advance();
        Some(pos)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

/// Number of units a carrier holds before the cursor revisits a sample.
///
/// The visiting sequence repeats with period `lcm(height, width, 3)`, which
/// can be much smaller than `height * width * 3` when the dimensions share
/// factors. Returns 0 for a degenerate carrier.
pub fn capacity(height: usize, width: usize) -> usize {
    if height == 0 || width == 0 {
        return 0;
    }
    lcm(lcm(height, width), CHANNELS)
}
