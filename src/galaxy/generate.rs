use super::{GalaxyError, GalaxyParameters, JitterMode, RngSampler, UnitSampler};
use bevy::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Particles sampled per rayon task in [`generate_par`].
pub const CHUNK_SIZE: usize = 4096;

/// Flat particle buffers, ready for upload.
///
/// Both buffers hold one `[f32; 3]` triple per particle, in generation order.
/// Colors are linear RGB.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedGalaxy {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl GeneratedGalaxy {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position_triples(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_triples(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Angle of the arm particle `index` is dealt to. Arms are assigned round robin.
///
/// `branches == 0` has no arm to deal to and yields NaN.
pub fn branch_angle(index: usize, branches: i32) -> f32 {
    let branches = branches as f32;
    (index as f32 % branches) / branches * TAU
}

/// Per-generation constants, shared read-only by every particle.
struct SpiralShape {
    radius: f32,
    spin: f32,
    branches: i32,
    randomness: f32,
    randomness_power: f32,
    jitter_mode: JitterMode,
    inside: LinearRgba,
    outside: LinearRgba,
}

impl SpiralShape {
    fn new(params: &GalaxyParameters) -> Self {
        Self {
            radius: params.radius,
            spin: params.spin,
            branches: params.branches,
            randomness: params.randomness,
            randomness_power: params.randomness_power,
            jitter_mode: params.jitter_mode,
            inside: params.inside_color.into(),
            outside: params.outside_color.into(),
        }
    }

    fn jitter<S: UnitSampler>(&self, particle_radius: f32, sampler: &mut S) -> f32 {
        let magnitude = sampler.unit().powf(self.randomness_power);
        let sign = if sampler.unit() < 0.5 { 1.0 } else { -1.0 };
        match self.jitter_mode {
            JitterMode::PowerOnly => magnitude * sign,
            JitterMode::ScaledByRandomness => {
                magnitude * sign * self.randomness * particle_radius
            }
        }
    }

    /// Blend factor between the inside and outside colors.
    fn gradient(&self, particle_radius: f32) -> f32 {
        if self.radius == 0.0 {
            return 0.0;
        }
        (particle_radius / self.radius).clamp(0.0, 1.0)
    }

    fn mix(&self, t: f32) -> [f32; 3] {
        let s = 1.0 - t;
        [
            self.inside.red * s + self.outside.red * t,
            self.inside.green * s + self.outside.green * t,
            self.inside.blue * s + self.outside.blue * t,
        ]
    }

    fn sample<S: UnitSampler>(
        &self,
        index: usize,
        sampler: &mut S,
        position: &mut [f32],
        color: &mut [f32],
    ) {
        let particle_radius = sampler.unit() * self.radius;
        let angle = branch_angle(index, self.branches) + particle_radius * self.spin;

        let jitter_x = self.jitter(particle_radius, sampler);
        let jitter_y = self.jitter(particle_radius, sampler);
        let jitter_z = self.jitter(particle_radius, sampler);

        position.copy_from_slice(&[
            angle.cos() * particle_radius + jitter_x,
            jitter_y,
            angle.sin() * particle_radius + jitter_z,
        ]);
        color.copy_from_slice(&self.mix(self.gradient(particle_radius)));
    }

    /// Fills a run of particles starting at global index `first`.
    fn fill<S: UnitSampler>(
        &self,
        first: usize,
        positions: &mut [f32],
        colors: &mut [f32],
        sampler: &mut S,
    ) {
        for (offset, (position, color)) in positions
            .chunks_exact_mut(3)
            .zip(colors.chunks_exact_mut(3))
            .enumerate()
        {
            self.sample(first + offset, sampler, position, color);
        }
    }
}

/// Samples a complete galaxy from `sampler`, one particle after another.
pub fn generate<S: UnitSampler>(
    params: &GalaxyParameters,
    sampler: &mut S,
) -> Result<GeneratedGalaxy, GalaxyError> {
    params.validate()?;
    Ok(generate_unchecked(params, sampler))
}

/// Samples a complete galaxy on the rayon pool.
///
/// Each chunk of [`CHUNK_SIZE`] particles draws from its own generator seeded
/// from `seed` and the chunk index, so equal seeds give equal buffers.
pub fn generate_par(params: &GalaxyParameters, seed: u64) -> Result<GeneratedGalaxy, GalaxyError> {
    params.validate()?;
    Ok(generate_par_unchecked(params, seed))
}

pub(super) fn generate_unchecked<S: UnitSampler>(
    params: &GalaxyParameters,
    sampler: &mut S,
) -> GeneratedGalaxy {
    let count = params.particle_count();
    let shape = SpiralShape::new(params);

    let mut positions = vec![0.0; count * 3];
    let mut colors = vec![0.0; count * 3];
    shape.fill(0, &mut positions, &mut colors, sampler);

    GeneratedGalaxy { positions, colors }
}

pub(super) fn generate_par_unchecked(params: &GalaxyParameters, seed: u64) -> GeneratedGalaxy {
    let count = params.particle_count();
    let shape = SpiralShape::new(params);

    let mut positions = vec![0.0; count * 3];
    let mut colors = vec![0.0; count * 3];
    positions
        .par_chunks_mut(CHUNK_SIZE * 3)
        .zip(colors.par_chunks_mut(CHUNK_SIZE * 3))
        .enumerate()
        .for_each(|(chunk, (positions, colors))| {
            let mut sampler = RngSampler(SmallRng::seed_from_u64(chunk_seed(seed, chunk)));
            shape.fill(chunk * CHUNK_SIZE, positions, colors, &mut sampler);
        });

    GeneratedGalaxy { positions, colors }
}

fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed ^ (chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
