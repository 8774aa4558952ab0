//! Miscellaneous utility structs.

use cgmath::num_traits::Float;
use std::fmt;

/// A closed interval on the real number line, used for curve parameter ranges.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Float> Interval<T> {
    pub fn length(&self) -> T {
        self.max - self.min
    }

    /// The value a fraction `t` of the way through the interval.
    pub fn lerp(&self, t: T) -> T {
        self.min + t * self.length()
    }

    /// The fraction of the way through the interval `value` lies.
    pub fn inv_lerp(&self, value: T) -> T {
        (value - self.min) / self.length()
    }
}

impl<T: fmt::Debug> fmt::Debug for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.min, self.max)
    }
}
