use bevy::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::time::{Duration, Instant};

mod error;
mod galaxy_generator;
mod galaxy_params;
mod generate;
mod unit_sampler;

pub use error::GalaxyError;
pub use galaxy_generator::GalaxyGenerator;
pub use galaxy_params::{GalaxyParameters, JitterMode};
pub use generate::{branch_angle, generate, generate_par, GeneratedGalaxy, CHUNK_SIZE};
pub use unit_sampler::{RngSampler, SequenceSampler, UnitSampler};

/// Asks for a fresh galaxy from the current [`GalaxyParameters`].
#[derive(Event, Default, Clone, Copy)]
pub struct RegenerateGalaxy;

/// The live galaxy plus the rng that seeds each regeneration.
#[derive(Resource)]
pub struct GalaxyState {
    pub generator: GalaxyGenerator,
    pub last_duration: Duration,
    rng: SmallRng,
}

impl GalaxyState {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            generator: GalaxyGenerator::new(),
            last_duration: Duration::ZERO,
            rng,
        }
    }

    /// Seeds from `GALAXY_SEED` when set, so a session can be replayed.
    fn from_env() -> Self {
        match std::env::var("GALAXY_SEED").ok().and_then(|s| s.parse().ok()) {
            Some(seed) => {
                info!("Seeding galaxy generation with GALAXY_SEED={seed}");
                Self::seeded(seed)
            }
            None => Self::with_rng(SmallRng::from_rng(&mut rand::rng())),
        }
    }
}

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParameters::default())
            .insert_resource(GalaxyState::from_env())
            .add_event::<RegenerateGalaxy>()
            .add_systems(Startup, request_initial_galaxy)
            .add_systems(Update, regenerate_galaxy);
    }
}

fn request_initial_galaxy(mut requests: EventWriter<RegenerateGalaxy>) {
    requests.write(RegenerateGalaxy);
}

/// Replaces the galaxy once per frame, however many requests piled up.
fn regenerate_galaxy(
    mut requests: EventReader<RegenerateGalaxy>,
    params: Res<GalaxyParameters>,
    mut state: ResMut<GalaxyState>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let state = &mut *state;
    let seed: u64 = state.rng.random();
    let started = Instant::now();

    let outcome = state
        .generator
        .regenerate_par(&params, seed)
        .map(|galaxy| galaxy.particle_count());

    match outcome {
        Ok(particles) => {
            state.last_duration = started.elapsed();
            info!(
                "Generated galaxy #{} ({} particles, {} arms) in {:.1?}",
                state.generator.generation(),
                particles,
                params.branches,
                state.last_duration
            );
        }
        Err(err) => {
            warn!("Keeping galaxy #{}: {err}", state.generator.generation());
        }
    }
}
