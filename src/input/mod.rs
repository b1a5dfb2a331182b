//! Input boundary — where the external UI's picks and player moves become
//! simulation state. Runs in every state so menus work while paused.

use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_selection, apply_player_moves, dispatch_build_item)
                .chain()
                .before(SimSet::Build),
        );
    }
}

/// Later selections in the same frame win.
fn apply_selection(
    mut crop_events: EventReader<SelectCropEvent>,
    mut build_events: EventReader<SelectBuildItemEvent>,
    mut animal_events: EventReader<SelectAnimalEvent>,
    mut selection: ResMut<Selection>,
) {
    if let Some(ev) = crop_events.read().last() {
        selection.crop = ev.crop;
    }
    if let Some(ev) = build_events.read().last() {
        selection.build_item = ev.item;
    }
    if let Some(ev) = animal_events.read().last() {
        selection.animal = ev.animal;
    }
}

fn apply_player_moves(
    mut move_events: EventReader<MovePlayerEvent>,
    mut player: ResMut<PlayerPosition>,
) {
    if let Some(ev) = move_events.read().last() {
        let pos = clamp_to_farm(ev.pos);
        if pos != player.0 {
            player.0 = pos;
        }
    }
}

/// Turn a grid click or drag into the command for the selected build item.
///
/// Soil takes the whole drag; fences take the side the drag points at;
/// everything else acts on the cell where the gesture started.
fn dispatch_build_item(
    mut use_events: EventReader<UseBuildItemEvent>,
    selection: Res<Selection>,
    mut soil: EventWriter<PlaceSoilEvent>,
    mut buildings: EventWriter<PlaceBuildingEvent>,
    mut pens: EventWriter<PlacePenEvent>,
    mut fences: EventWriter<PlaceFenceEvent>,
    mut animals: EventWriter<PlaceAnimalEvent>,
    mut pets: EventWriter<SpawnPetEvent>,
    mut npcs: EventWriter<SpawnNpcEvent>,
) {
    for ev in use_events.read() {
        let Some(item) = selection.build_item else {
            debug!("[Input] No build item selected, click at {:?} ignored", ev.from);
            continue;
        };
        match item {
            BuildItem::Soil => {
                soil.send(PlaceSoilEvent { from: ev.from, to: ev.to });
            }
            BuildItem::Barn => {
                buildings.send(PlaceBuildingEvent {
                    kind: BuildingKind::Barn,
                    top_left: ev.from,
                });
            }
            BuildItem::Pen => {
                pens.send(PlacePenEvent { top_left: ev.from });
            }
            BuildItem::Fence => match drag_side(ev.from, ev.to) {
                Some(side) => {
                    fences.send(PlaceFenceEvent { pos: ev.from, side });
                }
                None => debug!("[Input] Fence needs a drag direction from {:?}", ev.from),
            },
            BuildItem::Dog => {
                pets.send(SpawnPetEvent {
                    kind: PetKind::Dog,
                    pos: ev.from,
                });
            }
            BuildItem::Planter => {
                npcs.send(SpawnNpcEvent {
                    kind: NpcKind::Planter,
                    pos: ev.from,
                });
            }
            BuildItem::Animal => {
                animals.send(PlaceAnimalEvent {
                    kind: selection.animal,
                    pos: ev.from,
                });
            }
        }
    }
}

/// The side of `from` a drag toward `to` crosses. The longer axis wins,
/// horizontal on a tie. `None` for a plain click.
pub fn drag_side(from: GridPos, to: GridPos) -> Option<Side> {
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    if dx == 0 && dy == 0 {
        return None;
    }
    Some(if dx.abs() >= dy.abs() {
        if dx > 0 { Side::East } else { Side::West }
    } else if dy > 0 {
        Side::South
    } else {
        Side::North
    })
}

/// Nearest on-farm cell.
pub fn clamp_to_farm(pos: GridPos) -> GridPos {
    GridPos::new(pos.x.clamp(0, GRID_SIZE - 1), pos.y.clamp(0, GRID_SIZE - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_farm() {
        assert_eq!(clamp_to_farm(GridPos::new(-3, 5)), GridPos::new(0, 5));
        assert_eq!(clamp_to_farm(GridPos::new(4, 40)), GridPos::new(4, GRID_SIZE - 1));
        assert_eq!(clamp_to_farm(GridPos::new(7, 7)), GridPos::new(7, 7));
    }

    #[test]
    fn test_drag_side() {
        let origin = GridPos::new(5, 5);
        assert_eq!(drag_side(origin, origin), None);
        assert_eq!(drag_side(origin, GridPos::new(6, 5)), Some(Side::East));
        assert_eq!(drag_side(origin, GridPos::new(2, 6)), Some(Side::West));
        assert_eq!(drag_side(origin, GridPos::new(5, 4)), Some(Side::North));
        assert_eq!(drag_side(origin, GridPos::new(6, 8)), Some(Side::South));
        assert_eq!(drag_side(origin, GridPos::new(6, 6)), Some(Side::East));
    }
}
