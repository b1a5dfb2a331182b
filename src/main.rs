use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use cropwatch::economy::gold::format_money;
use cropwatch::shared::*;
use cropwatch::snapshot::LatestSnapshot;
use cropwatch::{agents, animals, clock, data, economy, farming, input, snapshot};

/// Seconds between summary lines in the log.
const SUMMARY_INTERVAL_SECS: f32 = 5.0;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(StatesPlugin)
        .add_plugins(LogPlugin {
            filter: "info,cropwatch=debug".into(),
            ..default()
        })
        // Sim state
        .init_state::<SimState>()
        // Shared resources
        .init_resource::<FarmState>()
        .init_resource::<Economy>()
        .init_resource::<Structures>()
        .init_resource::<CropRegistry>()
        .init_resource::<SimConfig>()
        .init_resource::<SimRng>()
        .init_resource::<Selection>()
        .init_resource::<PlayerPosition>()
        // Command events
        .add_event::<PlantSeedEvent>()
        .add_event::<HarvestCropEvent>()
        .add_event::<PlaceSoilEvent>()
        .add_event::<PlaceBuildingEvent>()
        .add_event::<PlacePenEvent>()
        .add_event::<PlaceFenceEvent>()
        .add_event::<PlaceAnimalEvent>()
        .add_event::<SpawnNpcEvent>()
        .add_event::<SpawnPetEvent>()
        .add_event::<SellInventoryEvent>()
        .add_event::<SelectCropEvent>()
        .add_event::<SelectBuildItemEvent>()
        .add_event::<SelectAnimalEvent>()
        .add_event::<UseBuildItemEvent>()
        .add_event::<MovePlayerEvent>()
        .add_event::<TogglePauseEvent>()
        // Clock events
        .add_event::<GrowthTickEvent>()
        .add_event::<AgentTickEvent>()
        .add_event::<FineTickEvent>()
        .add_event::<SpawnRollEvent>()
        // Outcome events
        .add_event::<CropHarvestedEvent>()
        .add_event::<CropReadyEvent>()
        .add_event::<CropStolenEvent>()
        .add_event::<ThiefSpawnedEvent>()
        .add_event::<ThiefRemovedEvent>()
        .add_event::<AgentPurchasedEvent>()
        .add_event::<MoneyChangeEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(animals::AnimalPlugin)
        .add_plugins(agents::AgentsPlugin)
        .add_plugins(snapshot::SnapshotPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Demo farm
        .add_systems(OnExit(SimState::Loading), seed_demo_farm)
        .add_systems(Update, log_summary.run_if(in_state(SimState::Running)))
        .run();
}

/// A small starting layout so the headless run has something to watch:
/// a strip of seeded soil and a guard dog nearby.
fn seed_demo_farm(
    mut soil: EventWriter<PlaceSoilEvent>,
    mut plant: EventWriter<PlantSeedEvent>,
    mut pets: EventWriter<SpawnPetEvent>,
) {
    soil.send(PlaceSoilEvent {
        from: GridPos::new(3, 3),
        to: GridPos::new(6, 3),
    });
    for x in 3..=6 {
        plant.send(PlantSeedEvent {
            pos: GridPos::new(x, 3),
        });
    }
    pets.send(SpawnPetEvent {
        kind: PetKind::Dog,
        pos: GridPos::new(8, 5),
    });
}

fn log_summary(time: Res<Time>, mut timer: Local<Option<Timer>>, latest: Res<LatestSnapshot>) {
    let timer = timer.get_or_insert_with(|| Timer::from_seconds(SUMMARY_INTERVAL_SECS, TimerMode::Repeating));
    if !timer.tick(time.delta()).just_finished() {
        return;
    }

    let snapshot = &latest.snapshot;
    let ready = snapshot
        .crops
        .iter()
        .filter(|crop| crop.stage == CropStage::Ready)
        .count();
    info!(
        "[Summary] {} | crops {} ({} ready) | thieves {} | harvested {} stolen {} | caught {} escaped {}",
        format_money(u64::from(snapshot.money)),
        snapshot.crops.len(),
        ready,
        snapshot.thieves.len(),
        latest.stats.total_harvested(),
        latest.stats.total_stolen(),
        latest.stats.thieves_caught,
        latest.stats.thieves_escaped,
    );
}
