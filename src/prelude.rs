pub use crate::galaxy::{
    GalaxyError, GalaxyParameters, GalaxyState, GeneratedGalaxy, JitterMode, RegenerateGalaxy,
};
