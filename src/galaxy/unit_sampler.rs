use rand::Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait UnitSampler {
    fn unit(&mut self) -> f32;
}

/// Adapts any `rand` generator.
pub struct RngSampler<R>(pub R);

impl<R: Rng> UnitSampler for RngSampler<R> {
    #[inline]
    fn unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Values are returned as given, so a script may contain `1.0` to pin a
/// particle to the rim even though a real generator never produces it.
#[derive(Clone, Debug)]
pub struct SequenceSampler {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSampler {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl UnitSampler for SequenceSampler {
    fn unit(&mut self) -> f32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn sequence_wraps_around() {
        let mut sampler = SequenceSampler::new([0.1, 0.2]);
        let drawn: Vec<f32> = (0..5).map(|_| sampler.unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut sampler = SequenceSampler::new(Vec::new());
        assert_eq!(sampler.unit(), 0.0);
    }

    #[test]
    fn rng_sampler_stays_in_unit_interval() {
        let mut sampler = RngSampler(SmallRng::seed_from_u64(7));
        for _ in 0..10_000 {
            let u = sampler.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
