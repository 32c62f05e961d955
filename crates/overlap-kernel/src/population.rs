// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Struct-of-arrays circle population and its construction parameters.

use crate::bounds::Bounds;
use crate::column::Column;
use crate::error::KernelError;
use crate::math::Prng;

/// Parameters that fully determine a seeded population.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scenario {
    /// Number of entities; fixed for the kernel's lifetime.
    pub population: usize,
    /// Range for both `x` and `y`.
    pub position: Bounds,
    /// Range for both `vx` and `vy`.
    pub velocity: Bounds,
    /// Range for `radius`; the lower end must be strictly positive.
    pub radius: Bounds,
    /// PRNG seed.
    pub seed: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            population: 1000,
            position: Bounds::new(0.0, 1000.0),
            velocity: Bounds::new(-1.0, 1.0),
            radius: Bounds::new(5.0, 100.0),
            seed: 0x5EED,
        }
    }
}

impl Scenario {
    /// Checks every precondition of construction.
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.population == 0 {
            return Err(KernelError::EmptyPopulation);
        }
        self.position.validate("position")?;
        self.velocity.validate("velocity")?;
        self.radius.validate("radius")?;
        if self.radius.min <= 0.0 {
            return Err(KernelError::NonPositiveRadius { min: self.radius.min });
        }
        Ok(())
    }
}

/// One entity, array-of-structs view.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Circle {
    /// Position x.
    pub x: f32,
    /// Position y.
    pub y: f32,
    /// Velocity x, applied once per `advance`.
    pub vx: f32,
    /// Velocity y, applied once per `advance`.
    pub vy: f32,
    /// Radius, strictly positive.
    pub radius: f32,
}

impl Circle {
    /// Stationary circle at `(x, y)`.
    pub const fn at(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, vx: 0.0, vy: 0.0, radius }
    }

    /// Returns a copy moving with velocity `(vx, vy)`.
    pub const fn moving(self, vx: f32, vy: f32) -> Self {
        Self { vx, vy, ..self }
    }
}

/// Five parallel, aligned columns of `f32`.
#[derive(Debug, Clone)]
pub struct Population {
    pub(crate) x: Column,
    pub(crate) y: Column,
    pub(crate) vx: Column,
    pub(crate) vy: Column,
    pub(crate) radius: Column,
}

impl Population {
    fn zeroed(len: usize) -> Result<Self, KernelError> {
        Ok(Self {
            x: Column::zeroed(len)?,
            y: Column::zeroed(len)?,
            vx: Column::zeroed(len)?,
            vy: Column::zeroed(len)?,
            radius: Column::zeroed(len)?,
        })
    }

    /// Draws every entity from the scenario's bounds.
    ///
    /// Draw order per entity is `x, y, vx, vy, radius`, so the seed alone
    /// fixes the population.
    pub fn seeded(scenario: &Scenario) -> Result<Self, KernelError> {
        scenario.validate()?;
        let mut pop = Self::zeroed(scenario.population)?;
        let mut prng = Prng::from_seed(scenario.seed);
        for i in 0..scenario.population {
            let circle = Circle {
                x: scenario.position.sample(&mut prng),
                y: scenario.position.sample(&mut prng),
                vx: scenario.velocity.sample(&mut prng),
                vy: scenario.velocity.sample(&mut prng),
                radius: scenario.radius.sample(&mut prng),
            };
            pop.write(i, circle);
        }
        Ok(pop)
    }

    /// Builds a population from explicit circles.
    pub fn from_circles(circles: &[Circle]) -> Result<Self, KernelError> {
        if circles.is_empty() {
            return Err(KernelError::EmptyPopulation);
        }
        // Written as a negated `>` so NaN radii are rejected too.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let bad = circles.iter().find(|c| !(c.radius > 0.0));
        if let Some(bad) = bad {
            return Err(KernelError::NonPositiveRadius { min: bad.radius });
        }
        let mut pop = Self::zeroed(circles.len())?;
        for (i, circle) in circles.iter().enumerate() {
            pop.write(i, *circle);
        }
        Ok(pop)
    }

    fn write(&mut self, i: usize, c: Circle) {
        self.x.as_mut_slice()[i] = c.x;
        self.y.as_mut_slice()[i] = c.y;
        self.vx.as_mut_slice()[i] = c.vx;
        self.vy.as_mut_slice()[i] = c.vy;
        self.radius.as_mut_slice()[i] = c.radius;
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false` for a constructed population; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reads entity `i` back as a [`Circle`].
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn circle(&self, i: usize) -> Circle {
        Circle {
            x: self.x.as_slice()[i],
            y: self.y.as_slice()[i],
            vx: self.vx.as_slice()[i],
            vy: self.vy.as_slice()[i],
            radius: self.radius.as_slice()[i],
        }
    }

    /// Position x column.
    pub fn xs(&self) -> &[f32] {
        self.x.as_slice()
    }

    /// Position y column.
    pub fn ys(&self) -> &[f32] {
        self.y.as_slice()
    }

    /// Velocity x column.
    pub fn vxs(&self) -> &[f32] {
        self.vx.as_slice()
    }

    /// Velocity y column.
    pub fn vys(&self) -> &[f32] {
        self.vy.as_slice()
    }

    /// Radius column.
    pub fn radii(&self) -> &[f32] {
        self.radius.as_slice()
    }

    /// Shifts every position by `(dx, dy)`; padding lanes are untouched.
    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.x.offset(dx);
        self.y.offset(dy);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_matches_reference_harness() {
        let s = Scenario::default();
        assert_eq!(s.population, 1000);
        assert_eq!(s.position, Bounds::new(0.0, 1000.0));
        assert_eq!(s.velocity, Bounds::new(-1.0, 1.0));
        assert_eq!(s.radius, Bounds::new(5.0, 100.0));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn seeded_values_respect_bounds() {
        let scenario = Scenario { population: 257, ..Scenario::default() };
        let pop = Population::seeded(&scenario).unwrap();
        assert_eq!(pop.len(), 257);
        for i in 0..pop.len() {
            let c = pop.circle(i);
            assert!(scenario.position.contains(c.x) && scenario.position.contains(c.y));
            assert!(scenario.velocity.contains(c.vx) && scenario.velocity.contains(c.vy));
            assert!(scenario.radius.contains(c.radius));
        }
    }

    #[test]
    fn seeded_values_respect_widest_finite_bounds() {
        let scenario = Scenario {
            population: 64,
            position: Bounds::new(-3.0e38, 3.0e38),
            velocity: Bounds::new(f32::MIN, f32::MAX),
            ..Scenario::default()
        };
        let pop = Population::seeded(&scenario).unwrap();
        for i in 0..pop.len() {
            let c = pop.circle(i);
            assert!(c.x.is_finite() && c.y.is_finite(), "entity {i}: {c:?}");
            assert!(scenario.position.contains(c.x) && scenario.position.contains(c.y));
            assert!(scenario.velocity.contains(c.vx) && scenario.velocity.contains(c.vy));
        }
    }

    #[test]
    fn preconditions_are_reported() {
        let empty = Scenario { population: 0, ..Scenario::default() };
        assert_eq!(Population::seeded(&empty).err(), Some(KernelError::EmptyPopulation));

        let flat = Scenario { radius: Bounds::new(0.0, 4.0), ..Scenario::default() };
        assert_eq!(
            Population::seeded(&flat).err(),
            Some(KernelError::NonPositiveRadius { min: 0.0 })
        );

        let nan = [Circle::at(0.0, 0.0, f32::NAN)];
        assert!(matches!(
            Population::from_circles(&nan),
            Err(KernelError::NonPositiveRadius { .. })
        ));
    }

    #[test]
    fn circles_round_trip_through_columns() {
        let circles = [Circle::at(1.0, 2.0, 3.0).moving(0.5, -0.5), Circle::at(-4.0, 8.0, 1.0)];
        let pop = Population::from_circles(&circles).unwrap();
        assert_eq!(pop.circle(0), circles[0]);
        assert_eq!(pop.circle(1), circles[1]);
        assert_eq!(pop.radii(), &[3.0, 1.0]);
    }
}
