//! # Noise Module
//!
//! Deterministic scalar fields used by terrain and cave generation.
//!
//! [`NoiseField`] is value noise: a table of random values, one per integer
//! lattice point, generated once when the world is created. Samples between
//! lattice points are smoothed with their neighbours and blended with cosine
//! interpolation. [`PerlinNoise`] wraps the `noise` crate's gradient noise
//! behind the same [`NoiseSource`] interface.
//!
//! Both produce values in `[0, 1)`.

use std::f64::consts::PI;

use noise::{NoiseFn, Perlin};

/// Terrain height samples divide world coordinates by this before sampling.
pub const TERRAIN_SCALE: f64 = 32.0;
/// Cave density samples divide world coordinates by this before sampling.
pub const CAVE_SCALE: f64 = 8.0;

/// Anything that can drive terrain generation.
pub trait NoiseSource {
    /// Relative surface height of the column at `(x, z)`, in `[0, 1)`.
    fn terrain_height(&self, x: f64, z: f64) -> f64;

    /// Cave density at a block position, in `[0, 1)`. Cells above a threshold are carved.
    fn cave_density(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Cosine interpolation between `a` and `b`.
///
/// `t = 0` gives `a`, `t = 1` gives `b`; the curve has zero slope at both ends
/// so neighbouring lattice cells join smoothly.
#[inline]
pub fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

/// Value noise over a fixed random lattice.
///
/// Lattice lookups wrap around the table edges, so any integer point (negative
/// or past the world) resolves to some table entry.
pub struct NoiseField {
    size_x: i32,
    size_y: i32,
    size_z: i32,
    table_2d: Vec<f64>,
    table_3d: Vec<f64>,
}

impl NoiseField {
    /// Fills fresh lattice tables from `rng`.
    ///
    /// The 2D table is `size × size`, the 3D table `size × height × size`.
    /// Both dimensions are clamped to at least one.
    pub fn new(size: usize, height: usize, rng: &mut fastrand::Rng) -> Self {
        let size = size.max(1);
        let height = height.max(1);

        let table_2d = (0..size * size).map(|_| rng.f64()).collect();
        let table_3d = (0..size * height * size).map(|_| rng.f64()).collect();

        NoiseField {
            size_x: size as i32,
            size_y: height as i32,
            size_z: size as i32,
            table_2d,
            table_3d,
        }
    }

    /// The raw lattice value at `(x, y)`.
    pub fn scalar_2d(&self, x: i32, y: i32) -> f64 {
        let x = x.rem_euclid(self.size_x) as usize;
        let y = y.rem_euclid(self.size_z) as usize;
        self.table_2d[x + self.size_x as usize * y]
    }

    /// The raw lattice value at `(x, y, z)`.
    pub fn scalar_3d(&self, x: i32, y: i32, z: i32) -> f64 {
        let x = x.rem_euclid(self.size_x) as usize;
        let y = y.rem_euclid(self.size_y) as usize;
        let z = z.rem_euclid(self.size_z) as usize;
        self.table_3d[x + self.size_x as usize * (z + self.size_z as usize * y)]
    }

    /// Lattice value blended with its 8 neighbours: corners 1/16 each,
    /// sides 1/8 each, centre 1/4.
    pub fn smoothed_2d(&self, x: i32, y: i32) -> f64 {
        let corners = self.scalar_2d(x - 1, y - 1)
            + self.scalar_2d(x + 1, y - 1)
            + self.scalar_2d(x - 1, y + 1)
            + self.scalar_2d(x + 1, y + 1);
        let sides = self.scalar_2d(x - 1, y)
            + self.scalar_2d(x + 1, y)
            + self.scalar_2d(x, y - 1)
            + self.scalar_2d(x, y + 1);
        let center = self.scalar_2d(x, y);

        corners / 16.0 + sides / 8.0 + center / 4.0
    }

    /// Lattice value blended with its 8 corner and 6 face neighbours: corners
    /// 1/32 each, sides 1/12 each, centre 1/4.
    pub fn smoothed_3d(&self, x: i32, y: i32, z: i32) -> f64 {
        let mut corners = 0.0;
        for dx in [-1, 1] {
            for dy in [-1, 1] {
                for dz in [-1, 1] {
                    corners += self.scalar_3d(x + dx, y + dy, z + dz);
                }
            }
        }
        let sides = self.scalar_3d(x - 1, y, z)
            + self.scalar_3d(x + 1, y, z)
            + self.scalar_3d(x, y - 1, z)
            + self.scalar_3d(x, y + 1, z)
            + self.scalar_3d(x, y, z - 1)
            + self.scalar_3d(x, y, z + 1);
        let center = self.scalar_3d(x, y, z);

        corners / 32.0 + sides / 12.0 + center / 4.0
    }

    /// Continuous 2D sample: cosine blend of the 4 surrounding smoothed lattice values.
    pub fn interpolated_2d(&self, x: f64, y: f64) -> f64 {
        let (integer_x, fractional_x) = split(x);
        let (integer_y, fractional_y) = split(y);

        let v1 = self.smoothed_2d(integer_x, integer_y);
        let v2 = self.smoothed_2d(integer_x + 1, integer_y);
        let v3 = self.smoothed_2d(integer_x, integer_y + 1);
        let v4 = self.smoothed_2d(integer_x + 1, integer_y + 1);

        let i1 = interpolate(v1, v2, fractional_x);
        let i2 = interpolate(v3, v4, fractional_x);
        interpolate(i1, i2, fractional_y)
    }

    /// Continuous 3D sample: cosine blend of the 8 surrounding smoothed lattice values.
    pub fn interpolated_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let (integer_x, fractional_x) = split(x);
        let (integer_y, fractional_y) = split(y);
        let (integer_z, fractional_z) = split(z);

        let plane = |z: i32| {
            let v1 = self.smoothed_3d(integer_x, integer_y, z);
            let v2 = self.smoothed_3d(integer_x + 1, integer_y, z);
            let v3 = self.smoothed_3d(integer_x, integer_y + 1, z);
            let v4 = self.smoothed_3d(integer_x + 1, integer_y + 1, z);
            let i1 = interpolate(v1, v2, fractional_x);
            let i2 = interpolate(v3, v4, fractional_x);
            interpolate(i1, i2, fractional_y)
        };

        interpolate(plane(integer_z), plane(integer_z + 1), fractional_z)
    }
}

impl NoiseSource for NoiseField {
    fn terrain_height(&self, x: f64, z: f64) -> f64 {
        self.interpolated_2d(x / TERRAIN_SCALE, z / TERRAIN_SCALE)
    }

    fn cave_density(&self, x: f64, y: f64, z: f64) -> f64 {
        self.interpolated_3d(x / CAVE_SCALE, y / CAVE_SCALE, z / CAVE_SCALE)
    }
}

/// Splits a coordinate into its lattice cell and the offset inside it.
#[inline]
fn split(v: f64) -> (i32, f64) {
    let integer = v.floor();
    (integer as i32, v - integer)
}

/// Gradient noise remapped into `[0, 1)`.
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Creates the noise with a seeded permutation table.
    pub fn new(seed: u32) -> Self {
        PerlinNoise {
            perlin: Perlin::new(seed),
        }
    }

    fn normalize(sample: f64) -> f64 {
        ((sample + 1.0) * 0.5).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl NoiseSource for PerlinNoise {
    fn terrain_height(&self, x: f64, z: f64) -> f64 {
        Self::normalize(self.perlin.get([x / TERRAIN_SCALE, z / TERRAIN_SCALE]))
    }

    fn cave_density(&self, x: f64, y: f64, z: f64) -> f64 {
        Self::normalize(
            self.perlin
                .get([x / CAVE_SCALE, y / CAVE_SCALE, z / CAVE_SCALE]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> NoiseField {
        NoiseField::new(16, 8, &mut fastrand::Rng::with_seed(42))
    }

    #[test]
    fn same_seed_same_field() {
        let a = field();
        let b = field();
        for x in 0..16 {
            assert_eq!(a.scalar_2d(x, 3), b.scalar_2d(x, 3));
            assert_eq!(a.scalar_3d(x, 5, 2), b.scalar_3d(x, 5, 2));
        }
    }

    #[test]
    fn lattice_lookups_wrap() {
        let noise = field();
        assert_eq!(noise.scalar_2d(-1, 0), noise.scalar_2d(15, 0));
        assert_eq!(noise.scalar_3d(3, 8, 17), noise.scalar_3d(3, 0, 1));
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let noise = field();
        for i in 0..200 {
            let t = i as f64 * 0.173;
            for value in [
                noise.smoothed_2d(i, -i),
                noise.smoothed_3d(i, i / 2, -i),
                noise.interpolated_2d(t, t * 0.5),
                noise.interpolated_3d(t, t * 0.25, t * 0.75),
                noise.terrain_height(t * 10.0, t),
                noise.cave_density(t, t, t),
            ] {
                assert!((0.0..1.0).contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn interpolation_hits_lattice_values() {
        let noise = field();
        assert!((noise.interpolated_2d(3.0, 4.0) - noise.smoothed_2d(3, 4)).abs() < 1e-12);
        assert!((noise.interpolated_3d(2.0, 1.0, 5.0) - noise.smoothed_3d(2, 1, 5)).abs() < 1e-12);
        assert_eq!(interpolate(0.2, 0.8, 0.0), 0.2);
        assert!((interpolate(0.2, 0.8, 1.0) - 0.8).abs() < 1e-12);
        assert!((interpolate(0.2, 0.8, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interpolated_2d_is_continuous() {
        let noise = field();
        let step = 0.001;
        for cell in 0..6 {
            let corners = [
                noise.smoothed_2d(cell, 2),
                noise.smoothed_2d(cell + 1, 2),
                noise.smoothed_2d(cell, 3),
                noise.smoothed_2d(cell + 1, 3),
            ];
            let low = corners.iter().cloned().fold(f64::INFINITY, f64::min);
            let high = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let max_delta = high - low;

            let mut previous = noise.interpolated_2d(cell as f64, 2.3);
            let mut t = cell as f64 + step;
            while t <= (cell + 1) as f64 {
                let value = noise.interpolated_2d(t, 2.3);
                assert!(value >= low - 1e-12 && value <= high + 1e-12);
                // cosine blend slope is at most pi/2 per unit step
                assert!((value - previous).abs() <= max_delta * step * PI / 2.0 + 1e-9);
                previous = value;
                t += step;
            }
        }
    }

    #[test]
    fn interpolated_3d_has_no_jumps_across_cells() {
        let noise = field();
        for boundary in 1..5 {
            let b = boundary as f64;
            let before = noise.interpolated_3d(b - 1e-9, 1.5, 2.5);
            let after = noise.interpolated_3d(b, 1.5, 2.5);
            assert!((before - after).abs() < 1e-6);
        }
    }

    #[test]
    fn perlin_source_is_normalized() {
        let perlin = PerlinNoise::new(3);
        for i in 0..100 {
            let t = i as f64 * 1.37;
            assert!((0.0..1.0).contains(&perlin.terrain_height(t, -t)));
            assert!((0.0..1.0).contains(&perlin.cave_density(t, t * 0.5, t * 2.0)));
        }
    }
}
