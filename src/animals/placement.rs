use bevy::prelude::*;
use crate::shared::*;
use super::enclosure::find_enclosure;

/// Place an animal inside a closed region big enough for its kind.
pub fn place_animal(
    structures: &mut Structures,
    economy: &mut Economy,
    kind: AnimalKind,
    pos: GridPos,
) -> Result<PlacedAnimal, Rejection> {
    if !pos.in_bounds() {
        return Err(Rejection::OutOfBounds(pos));
    }
    if structures.is_built(pos) || structures.animals.iter().any(|animal| animal.pos == pos) {
        return Err(Rejection::Occupied(pos));
    }

    let enclosure = find_enclosure(structures, pos).ok_or(Rejection::NotEnclosed(pos))?;
    let required = kind.required_space();
    if enclosure.area() < required {
        return Err(Rejection::EnclosureTooSmall {
            area: enclosure.area(),
            required,
        });
    }

    economy.try_debit(kind.price())?;
    let animal = PlacedAnimal {
        kind,
        pos,
        enclosure: enclosure.anchor().unwrap_or(pos),
    };
    structures.animals.push(animal);
    Ok(animal)
}

pub fn handle_place_animal(
    mut events: EventReader<PlaceAnimalEvent>,
    mut structures: ResMut<Structures>,
    mut economy: ResMut<Economy>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match place_animal(&mut structures, &mut economy, ev.kind, ev.pos) {
            Ok(animal) => {
                info!(
                    "[Animals] {:?} placed at {:?} (enclosure {:?})",
                    animal.kind, animal.pos, animal.enclosure
                );
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(ev.kind.price()),
                    reason: format!("{:?}", ev.kind),
                });
            }
            Err(reason) => debug!("[Animals] {:?} at {:?} rejected: {}", ev.kind, ev.pos, reason),
        }
    }
}
