//! Pixel canvas: a grid of palette-slot indices
//!
//! 0 is transparent, 1-9 refer to the fixed-role palette slots in [`slot`].
//! Stages never mutate a canvas they were handed; they clone and edit the copy.

use serde::{Deserialize, Serialize};

/// Named palette slots. The grid stores the raw index for compactness.
pub mod slot {
    pub const TRANSPARENT: u8 = 0;
    pub const OUTLINE: u8 = 1;
    pub const BODY: u8 = 2;
    pub const BODY_SECONDARY: u8 = 3;
    pub const HIGHLIGHT: u8 = 4;
    pub const EYE_WHITE: u8 = 5;
    pub const PUPIL: u8 = 6;
    pub const MOUTH: u8 = 7;
    pub const ACCENT_A: u8 = 8;
    pub const ACCENT_B: u8 = 9;

    /// Number of palette slots, including the transparent marker
    pub const COUNT: usize = 10;

    pub fn is_eye(value: u8) -> bool {
        value == EYE_WHITE || value == PUPIL
    }
}

/// Round a continuous coordinate or length onto the grid
#[inline]
pub(crate) fn round_to_cell(value: f64) -> i32 {
    value.round() as i32
}

/// Grid position, `row` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

/// Row-major grid of palette slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelCanvas {
    /// Fully transparent canvas
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![slot::TRANSPARENT; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some()
    }

    /// Slot at a position, `None` outside the canvas
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        self.index(row, col).map(|i| self.pixels[i])
    }

    /// Slot at a position, transparent outside the canvas
    #[inline]
    pub fn get_or_clear(&self, row: i32, col: i32) -> u8 {
        self.get(row, col).unwrap_or(slot::TRANSPARENT)
    }

    /// Write a slot. Positions outside the canvas are ignored.
    #[inline]
    pub fn set(&mut self, row: i32, col: i32, value: u8) {
        if let Some(i) = self.index(row, col) {
            self.pixels[i] = value;
        }
    }

    pub fn at(&self, point: Point) -> Option<u8> {
        self.get(point.row, point.col)
    }

    pub fn set_at(&mut self, point: Point, value: u8) {
        self.set(point.row, point.col, value);
    }

    /// One row as a slice, `None` past the last row
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.pixels.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(self.width.max(1)).take(self.height)
    }

    /// Every position paired with its slot, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Point, u8)> + '_ {
        self.pixels.iter().enumerate().map(move |(i, &v)| {
            let row = (i / self.width) as i32;
            let col = (i % self.width) as i32;
            (Point::new(row, col), v)
        })
    }

    /// Number of non-transparent pixels
    pub fn filled_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != slot::TRANSPARENT).count()
    }

    pub fn contains_slot(&self, value: u8) -> bool {
        self.pixels.contains(&value)
    }

    /// Positions whose slot differs from `other` (canvases must share a size)
    pub fn diff(&self, other: &PixelCanvas) -> Vec<Point> {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.cells()
            .zip(other.pixels.iter())
            .filter(|((_, a), b)| a != *b)
            .map(|((p, _), _)| p)
            .collect()
    }

    /// Sprite-line text: `.` for transparent, digits for slots
    pub fn to_sprite_lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|&v| {
                        if v == slot::TRANSPARENT {
                            '.'
                        } else {
                            char::from(b'0' + v.min(9))
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Parse sprite-line text. `.`, space and anything non-numeric are
    /// transparent; short lines are padded to the widest one.
    pub fn from_sprite_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let width = lines
            .iter()
            .map(|l| l.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut canvas = Self::new(width, lines.len());
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                let value = ch.to_digit(10).map_or(slot::TRANSPARENT, |d| d as u8);
                canvas.set(row as i32, col as i32, value);
            }
        }
        canvas
    }
}

/// Point-sets collected while placing features, read by the animator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationHints {
    /// Pupil of each eye; only these close on a blink
    pub eye_positions: Vec<Point>,
    /// Appendage and limb pixels that may shift for gestures
    pub gesture_pixels: Vec<Point>,
    /// Every non-transparent, non-eye pixel after placement
    pub shimmer_pixels: Vec<Point>,
}
