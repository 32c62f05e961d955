// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::error::KernelError;
use crate::math::Prng;

/// Closed `f32` interval used for uniform draws.
///
/// Invariants (checked by [`Bounds::validate`]):
/// - both ends are finite;
/// - `min <= max`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Inclusive lower end.
    pub min: f32,
    /// Inclusive upper end.
    pub max: f32,
}

impl Bounds {
    /// Creates a bounds pair without validating it.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns `true` when both ends are finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Validates the pair, naming `field` in the error.
    pub fn validate(&self, field: &'static str) -> Result<(), KernelError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(KernelError::InvalidBounds { field, min: self.min, max: self.max })
        }
    }

    /// Draws one uniform value from the interval.
    pub fn sample(&self, prng: &mut Prng) -> f32 {
        prng.next_in(self.min, self.max)
    }

    /// Returns `true` if `value` lies inside the closed interval.
    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_non_finite_ranges() {
        assert!(Bounds::new(1.0, 0.0).validate("position").is_err());
        assert!(Bounds::new(f32::NAN, 1.0).validate("position").is_err());
        assert!(Bounds::new(0.0, f32::INFINITY).validate("position").is_err());
        assert!(Bounds::new(2.0, 2.0).validate("position").is_ok());
    }

    #[test]
    fn error_names_the_field() {
        let err = Bounds::new(3.0, -3.0).validate("velocity");
        assert_eq!(
            err,
            Err(KernelError::InvalidBounds { field: "velocity", min: 3.0, max: -3.0 })
        );
    }

    #[test]
    fn samples_land_inside() {
        let bounds = Bounds::new(-1.0, 1.0);
        let mut prng = Prng::from_seed(11);
        for _ in 0..1_000 {
            assert!(bounds.contains(bounds.sample(&mut prng)));
        }
    }
}
