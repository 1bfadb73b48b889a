use super::GalaxyError;
use bevy::prelude::*;

/// How the per-axis jitter is scaled once its power-shaped magnitude is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterMode {
    /// `U^power * sign`. The `randomness` control has no effect.
    #[default]
    PowerOnly,
    /// `U^power * sign * randomness * radius_i`, so the haze widens towards the rim.
    ScaledByRandomness,
}

impl JitterMode {
    pub const ALL: [Self; 2] = [Self::PowerOnly, Self::ScaledByRandomness];

    pub fn label(self) -> &'static str {
        match self {
            Self::PowerOnly => "Power only",
            Self::ScaledByRandomness => "Scaled by randomness",
        }
    }
}

/// Shape parameters of the galaxy.
///
/// Editing a field never regenerates anything by itself; whoever owns the edit
/// sends [`super::RegenerateGalaxy`] once the value has settled.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: i32,
    pub size: f32,
    pub radius: f32,
    pub branches: i32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
    pub jitter_mode: JitterMode,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
            jitter_mode: JitterMode::PowerOnly,
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
        jitter_mode: JitterMode::PowerOnly,
    };
    pub const MAX: Self = Self {
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
        jitter_mode: JitterMode::ScaledByRandomness,
    };

    /// Copy with every numeric field pulled inside `MIN..=MAX`.
    pub fn clamped(&self) -> Self {
        let (min, max) = (&Self::MIN, &Self::MAX);
        Self {
            count: self.count.clamp(min.count, max.count),
            size: self.size.clamp(min.size, max.size),
            radius: self.radius.clamp(min.radius, max.radius),
            branches: self.branches.clamp(min.branches, max.branches),
            spin: self.spin.clamp(min.spin, max.spin),
            randomness: self.randomness.clamp(min.randomness, max.randomness),
            randomness_power: self
                .randomness_power
                .clamp(min.randomness_power, max.randomness_power),
            ..self.clone()
        }
    }

    /// Rejects the values the generator cannot turn into buffers at all.
    ///
    /// Everything else, including `branches <= 0` and `radius <= 0`, is passed
    /// through and produces a degenerate galaxy.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.count < 0 {
            return Err(GalaxyError::invalid(
                "count",
                format!("must not be negative, got {}", self.count),
            ));
        }
        if self.randomness_power < 0.0 {
            return Err(GalaxyError::invalid(
                "randomness_power",
                format!("must not be negative, got {}", self.randomness_power),
            ));
        }
        Ok(())
    }

    /// True when both sets would sample the same galaxy. Point size only
    /// affects drawing, so it is ignored.
    pub fn same_shape(&self, other: &Self) -> bool {
        Self {
            size: other.size,
            ..self.clone()
        } == *other
    }

    pub fn particle_count(&self) -> usize {
        self.count.max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_bounds() {
        let params = GalaxyParameters::default();
        assert_eq!(params.clamped(), params);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let params = GalaxyParameters {
            count: 5,
            size: 1.0,
            radius: -3.0,
            branches: 0,
            spin: 12.0,
            randomness: -1.0,
            randomness_power: 0.5,
            ..default()
        }
        .clamped();

        assert_eq!(params.count, 100);
        assert_eq!(params.size, 0.1);
        assert_eq!(params.radius, 0.01);
        assert_eq!(params.branches, 2);
        assert_eq!(params.spin, 5.0);
        assert_eq!(params.randomness, 0.0);
        assert_eq!(params.randomness_power, 1.0);
    }

    #[test]
    fn store_passes_out_of_range_values_through() {
        let mut params = GalaxyParameters::default();
        params.branches = 0;
        params.radius = -1.0;
        assert_eq!(params.branches, 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn point_size_does_not_change_the_shape() {
        let params = GalaxyParameters::default();
        let resized = GalaxyParameters {
            size: 0.05,
            ..default()
        };
        assert!(params.same_shape(&resized));

        let recolored = GalaxyParameters {
            outside_color: Srgba::WHITE,
            ..default()
        };
        assert!(!params.same_shape(&recolored));
        let respun = GalaxyParameters {
            spin: -2.0,
            ..resized.clone()
        };
        assert!(!resized.same_shape(&respun));
    }

    #[test]
    fn negative_count_is_rejected() {
        let params = GalaxyParameters {
            count: -1,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(GalaxyError::InvalidParameter { name: "count", .. })
        ));
        assert_eq!(params.particle_count(), 0);
    }

    #[test]
    fn negative_power_is_rejected() {
        let params = GalaxyParameters {
            randomness_power: -2.0,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(GalaxyError::InvalidParameter {
                name: "randomness_power",
                ..
            })
        ));
    }
}
