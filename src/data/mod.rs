//! Data layer — populates registries and loads tunables at startup.
//!
//! This plugin runs in OnEnter(SimState::Loading), fills the CropRegistry
//! from the hard-coded crop table, reads the file named by [`ConfigFile`]
//! (`assets/sim_config.ron` by default) into the SimConfig resource, reseeds SimRng when the config pins a seed, then
//! transitions the simulation into SimState::Running.

mod config;
mod crops;

pub use config::{load_config, parse_config, ConfigError, ConfigFile, CONFIG_PATH};
pub use crops::populate_crops;

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigFile>()
            .add_systems(OnEnter(SimState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then starts the clock.
fn load_all_data(
    mut crop_registry: ResMut<CropRegistry>,
    config_file: Res<ConfigFile>,
    mut config: ResMut<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    info!("[Data] populating registries…");

    populate_crops(&mut crop_registry);
    info!("[Data]   Crops loaded: {}", crop_registry.crops.len());

    if let Some(path) = &config_file.0 {
        match load_config(path) {
            Ok(loaded) => {
                info!("[Data]   Config loaded from {}", path.display());
                *config = loaded;
            }
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("[Data]   No {}, keeping current config", path.display());
            }
            Err(err) => {
                warn!("[Data]   Ignoring {}: {}", path.display(), err);
            }
        }
    }

    if let Some(seed) = config.rng_seed {
        *rng = SimRng::seeded(seed);
        info!("[Data]   RNG seeded with {}", seed);
    }

    info!("[Data] all registries populated. Transitioning to Running.");
    next_state.set(SimState::Running);
}
