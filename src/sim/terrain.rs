//! Heightmap terrain
//!
//! The terrain is a fixed profile for the duration of a round: one height
//! sample per integer x, linearly interpolated in between. All queries are
//! read-only and never fail.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Playfield dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Landing test shared by every projectile kind.
///
/// A point is out of bounds when it leaves the sides of the playfield, drops
/// below the baseline, or sits at/under the terrain surface.
#[inline]
pub fn is_out_of_bounds(p: Vec2, width: f32, terrain_height: f32) -> bool {
    p.x < 0.0 || p.x > width || p.y < 0.0 || p.y <= terrain_height
}

/// Destructible-in-principle heightmap (read-only inside the engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    heights: Vec<f32>,
    playfield: Playfield,
}

impl Terrain {
    /// Wrap existing height samples (index = integer x)
    pub fn new(heights: Vec<f32>, playfield: Playfield) -> Self {
        Self { heights, playfield }
    }

    /// Perfectly flat terrain at `level`
    pub fn flat(playfield: Playfield, level: f32) -> Self {
        let samples = playfield.width.max(0.0).ceil() as usize + 1;
        Self::new(vec![level; samples], playfield)
    }

    /// Rolling hills, deterministic for a given seed
    pub fn generate(playfield: Playfield, rng: &mut Pcg32) -> Self {
        use std::f32::consts::TAU;

        let samples = playfield.width.max(0.0).ceil() as usize + 1;
        let h = playfield.height;
        let min_h = h * 0.15;
        let max_h = h * 0.7;

        // (wavelength in samples, amplitude as a share of height, phase)
        let octaves: Vec<(f32, f32, f32)> = [(1.0, 0.16), (0.45, 0.07), (0.18, 0.03)]
            .iter()
            .map(|&(wave_share, amp)| {
                let wavelength = (playfield.width * wave_share).max(1.0);
                (wavelength, amp * h, rng.random_range(0.0..TAU))
            })
            .collect();

        let mut heights: Vec<f32> = (0..samples)
            .map(|x| {
                let x = x as f32;
                let mut y = h * 0.38;
                for &(wavelength, amp, phase) in &octaves {
                    y += amp * (x / wavelength * TAU + phase).sin();
                }
                y + rng.random_range(-1.5..1.5)
            })
            .collect();

        // Box blur to knock the jitter down
        for _ in 0..3 {
            let prev = heights.clone();
            for i in 1..samples.saturating_sub(1) {
                heights[i] = (prev[i - 1] + prev[i] + prev[i + 1]) / 3.0;
            }
        }

        for y in &mut heights {
            *y = y.clamp(min_h, max_h);
        }

        log::debug!(
            "Generated terrain: {} samples, {:.0}x{:.0}",
            samples,
            playfield.width,
            playfield.height
        );
        Self::new(heights, playfield)
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Interpolated surface height; clamps to the edge samples, 0 if empty
    pub fn height_at(&self, x: f32) -> f32 {
        let Some(last) = self.heights.len().checked_sub(1) else {
            return 0.0;
        };
        if x.is_nan() {
            return self.heights[0];
        }
        let x = x.clamp(0.0, last as f32);
        let lo = x.floor() as usize;
        let hi = x.ceil() as usize;
        if lo == hi {
            return self.heights[lo];
        }
        let t = x - lo as f32;
        self.heights[lo] + (self.heights[hi] - self.heights[lo]) * t
    }

    /// Bounds check against this terrain's own surface
    pub fn is_out_of_bounds(&self, p: Vec2) -> bool {
        is_out_of_bounds(p, self.playfield.width, self.height_at(p.x))
    }

    /// Evenly spaced spawn columns with seeded jitter
    pub fn spawn_columns(&self, count: usize, rng: &mut Pcg32) -> Vec<f32> {
        let width = self.playfield.width;
        if count <= 1 {
            return vec![width * 0.5; count];
        }
        let margin = width * 0.08;
        let spacing = (width - 2.0 * margin) / (count - 1) as f32;
        let jitter = spacing * 0.15;
        (0..count)
            .map(|i| {
                let base = margin + spacing * i as f32;
                let offset = if jitter > 0.0 {
                    rng.random_range(-jitter..jitter)
                } else {
                    0.0
                };
                (base + offset).clamp(0.0, width)
            })
            .collect()
    }
}
