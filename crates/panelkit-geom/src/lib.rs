//! Placement types for overlay panels (no toolkit dependency).
//!
//! Canvas coordinates have their origin at the top-left corner, `x` grows to
//! the right and `y` grows downwards. Anchors are normalized against the
//! canvas size; a panel's `position` is the offset of its centre from the
//! centre of its anchor rectangle, in canvas pixels.
#![forbid(unsafe_code)]

pub mod codec;

use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use thiserror::Error;

pub use codec::{
    FIELD_SEP, GROUP_SEP, Restored, RestoreSource, apply_or_default, deserialize, serialize,
    try_serialize,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const HALF: Vec2 = Vec2 { x: 0.5, y: 0.5 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }

    #[inline]
    pub fn lerp(self, rhs: Vec2, t: f32) -> Vec2 {
        self + (rhs - self) * t
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Placement of a panel: a normalized anchor rectangle plus a pixel offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub position: Vec2,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            anchor_min: Vec2::HALF,
            anchor_max: Vec2::HALF,
            position: Vec2::ZERO,
        }
    }
}

impl Geometry {
    #[inline]
    pub const fn new(anchor_min: Vec2, anchor_max: Vec2, position: Vec2) -> Self {
        Self {
            anchor_min,
            anchor_max,
            position,
        }
    }

    /// Normalized centre of the anchor rectangle.
    #[inline]
    pub fn anchor_center(&self) -> Vec2 {
        self.anchor_min.lerp(self.anchor_max, 0.5)
    }

    /// Normalized extent of the anchor rectangle.
    #[inline]
    pub fn anchor_span(&self) -> Vec2 {
        self.anchor_max - self.anchor_min
    }

    pub fn is_finite(&self) -> bool {
        self.anchor_min.is_finite() && self.anchor_max.is_finite() && self.position.is_finite()
    }

    /// Checks the structural invariants: finite fields, anchors inside the
    /// unit square and `anchor_min <= anchor_max` on both axes.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.is_finite() {
            return Err(GeometryError::Invalid("non-finite field"));
        }
        let unit = |v: Vec2| (0.0..=1.0).contains(&v.x) && (0.0..=1.0).contains(&v.y);
        if !unit(self.anchor_min) || !unit(self.anchor_max) {
            return Err(GeometryError::Invalid("anchor outside [0, 1]"));
        }
        if self.anchor_min.x > self.anchor_max.x || self.anchor_min.y > self.anchor_max.y {
            return Err(GeometryError::Invalid("anchor_min exceeds anchor_max"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseFailure {
    #[error("expected 2 '|'-separated groups, found {0}")]
    GroupCount(usize),
    #[error("group {group} has {found} fields, expected {expected}")]
    FieldCount {
        group: usize,
        found: usize,
        expected: usize,
    },
    #[error("field {0:?} is not a number")]
    NotNumeric(String),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    #[error("malformed geometry record {input:?}: {reason}")]
    Parse { input: String, reason: ParseFailure },
    #[error("cannot encode geometry: {0}")]
    Serialize(&'static str),
    #[error("invalid geometry: {0}")]
    Invalid(&'static str),
    #[error("degenerate canvas {w}x{h}")]
    DegenerateCanvas { w: f32, h: f32 },
}
