use super::generate::{generate_par_unchecked, generate_unchecked};
use super::{GalaxyError, GalaxyParameters, GeneratedGalaxy, UnitSampler};

type DisposeHook = Box<dyn FnMut(&GeneratedGalaxy) + Send + Sync>;

/// Owns the one live [`GeneratedGalaxy`] and replaces it wholesale.
///
/// The previous galaxy is retired before the next one is allocated, so at most
/// one generation's worth of buffers exists at a time. Parameters are checked
/// first: a rejected request leaves the current galaxy untouched.
#[derive(Default)]
pub struct GalaxyGenerator {
    current: Option<GeneratedGalaxy>,
    generation: u32,
    disposed: u32,
    on_dispose: Option<DisposeHook>,
}

impl GalaxyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` with each galaxy just before it is dropped.
    pub fn with_dispose_hook(
        mut self,
        hook: impl FnMut(&GeneratedGalaxy) + Send + Sync + 'static,
    ) -> Self {
        self.on_dispose = Some(Box::new(hook));
        self
    }

    pub fn current(&self) -> Option<&GeneratedGalaxy> {
        self.current.as_ref()
    }

    /// Number of galaxies produced so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn disposed_count(&self) -> u32 {
        self.disposed
    }

    pub fn regenerate<S: UnitSampler>(
        &mut self,
        params: &GalaxyParameters,
        sampler: &mut S,
    ) -> Result<&GeneratedGalaxy, GalaxyError> {
        params.validate()?;
        self.dispose();
        let galaxy = generate_unchecked(params, sampler);
        Ok(self.install(galaxy))
    }

    /// Same as [`Self::regenerate`], sampled on the rayon pool from `seed`.
    pub fn regenerate_par(
        &mut self,
        params: &GalaxyParameters,
        seed: u64,
    ) -> Result<&GeneratedGalaxy, GalaxyError> {
        params.validate()?;
        self.dispose();
        let galaxy = generate_par_unchecked(params, seed);
        Ok(self.install(galaxy))
    }

    fn dispose(&mut self) {
        let Some(galaxy) = self.current.take() else {
            return;
        };
        if let Some(hook) = self.on_dispose.as_mut() {
            hook(&galaxy);
        }
        self.disposed += 1;
    }

    fn install(&mut self, galaxy: GeneratedGalaxy) -> &GeneratedGalaxy {
        self.generation += 1;
        self.current.insert(galaxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{RngSampler, SequenceSampler};
    use bevy::prelude::default;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn params(count: i32) -> GalaxyParameters {
        GalaxyParameters {
            count,
            ..default()
        }
    }

    #[test]
    fn each_regeneration_retires_the_previous_galaxy() {
        let fired = Arc::new(AtomicUsize::new(0));
        let hook_fired = fired.clone();
        let mut generator = GalaxyGenerator::new().with_dispose_hook(move |_| {
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });
        let mut sampler = RngSampler(SmallRng::seed_from_u64(1));

        let counts = [100, 2_000, 0, 750, 10_000];
        for count in counts {
            let galaxy = generator.regenerate(&params(count), &mut sampler).unwrap();
            assert_eq!(galaxy.particle_count(), count as usize);
        }

        assert_eq!(fired.load(Ordering::SeqCst), counts.len() - 1);
        assert_eq!(generator.disposed_count() as usize, counts.len() - 1);
        assert_eq!(generator.generation() as usize, counts.len());
    }

    #[test]
    fn hook_sees_the_galaxy_being_replaced() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let hook_seen = seen.clone();
        let mut generator = GalaxyGenerator::new().with_dispose_hook(move |galaxy| {
            if let Ok(mut seen) = hook_seen.lock() {
                seen.push(galaxy.particle_count());
            }
        });

        generator.regenerate_par(&params(300), 1).unwrap();
        generator.regenerate_par(&params(400), 2).unwrap();
        generator.regenerate_par(&params(500), 3).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![300, 400]);
        assert_eq!(generator.current().map(|g| g.particle_count()), Some(500));
    }

    #[test]
    fn rejected_parameters_keep_the_current_galaxy() {
        let mut generator = GalaxyGenerator::new();
        let mut sampler = SequenceSampler::constant(0.25);

        generator.regenerate(&params(200), &mut sampler).unwrap();
        let before = generator.current().cloned();

        let result = generator.regenerate(&params(-5), &mut sampler);
        assert!(matches!(
            result,
            Err(GalaxyError::InvalidParameter { name: "count", .. })
        ));
        assert!(generator.regenerate_par(&params(-5), 0).is_err());

        assert_eq!(generator.current().cloned(), before);
        assert_eq!(generator.disposed_count(), 0);
        assert_eq!(generator.generation(), 1);
    }

    #[test]
    fn fresh_generator_holds_nothing() {
        let generator = GalaxyGenerator::new();
        assert!(generator.current().is_none());
        assert_eq!(generator.generation(), 0);
    }
}
