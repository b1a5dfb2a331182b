//! Agents domain — thieves, guard pets and auto-planters.
//!
//! Every agent lives in one [`AgentRegistry`] as a variant of [`Agent`].
//! Thieves and planters act on the agent tick, guard pets on the fine tick,
//! and new thieves arrive on spawn rolls.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::shared::*;

pub mod movement;
pub mod pets;
pub mod planters;
pub mod spawning;
pub mod thieves;

pub type AgentId = u64;

// ─────────────────────────────────────────────────────────────────────────────
// Agent variants
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThiefMode {
    /// Just arrived; picks a target on its first tick.
    Spawning,
    Approaching { target: GridPos },
    /// Standing on `target`, `remaining` ticks until the crop is gone.
    Stealing { target: GridPos, remaining: u32 },
    /// Nothing worth taking; walking to `exit` off the farm.
    Escaping { exit: GridPos },
    /// Running from a guard pet.
    Fleeing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thief {
    pub pos: GridPos,
    pub mode: ThiefMode,
}

impl Thief {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            mode: ThiefMode::Spawning,
        }
    }

    pub fn target(&self) -> Option<GridPos> {
        match self.mode {
            ThiefMode::Approaching { target } | ThiefMode::Stealing { target, .. } => Some(target),
            ThiefMode::Escaping { exit } => Some(exit),
            ThiefMode::Spawning | ThiefMode::Fleeing => None,
        }
    }

    pub fn steal_countdown(&self) -> Option<u32> {
        match self.mode {
            ThiefMode::Stealing { remaining, .. } => Some(remaining),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardPet {
    pub kind: PetKind,
    pub pos: Vec2,
    /// Spawn point; patrols are picked around it.
    pub home: Vec2,
    pub patrol: Option<Vec2>,
}

impl GuardPet {
    pub fn new(kind: PetKind, pos: GridPos) -> Self {
        Self {
            kind,
            pos: pos.as_vec2(),
            home: pos.as_vec2(),
            patrol: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlanter {
    pub pos: GridPos,
    pub target: Option<GridPos>,
    /// Ticks left before planting the cell underfoot.
    pub countdown: Option<u32>,
}

impl AutoPlanter {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            target: None,
            countdown: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Agent {
    Thief(Thief),
    Guard(GuardPet),
    Planter(AutoPlanter),
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// All live agents keyed by id. Ids are handed out in increasing order and
/// never reused, so iteration follows spawn order.
#[derive(Resource, Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, Agent>,
    next_id: AgentId,
}

impl AgentRegistry {
    pub fn spawn(&mut self, agent: Agent) -> AgentId {
        let id = self.next_id;
        self.next_id += 1;
        self.agents.insert(id, agent);
        id
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn thieves(&self) -> impl Iterator<Item = (AgentId, &Thief)> + '_ {
        self.agents.iter().filter_map(|(id, agent)| match agent {
            Agent::Thief(thief) => Some((*id, thief)),
            _ => None,
        })
    }

    pub fn thieves_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut Thief)> + '_ {
        self.agents.iter_mut().filter_map(|(id, agent)| match agent {
            Agent::Thief(thief) => Some((*id, thief)),
            _ => None,
        })
    }

    pub fn guards(&self) -> impl Iterator<Item = (AgentId, &GuardPet)> + '_ {
        self.agents.iter().filter_map(|(id, agent)| match agent {
            Agent::Guard(guard) => Some((*id, guard)),
            _ => None,
        })
    }

    pub fn guards_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut GuardPet)> + '_ {
        self.agents.iter_mut().filter_map(|(id, agent)| match agent {
            Agent::Guard(guard) => Some((*id, guard)),
            _ => None,
        })
    }

    pub fn planters(&self) -> impl Iterator<Item = (AgentId, &AutoPlanter)> + '_ {
        self.agents.iter().filter_map(|(id, agent)| match agent {
            Agent::Planter(planter) => Some((*id, planter)),
            _ => None,
        })
    }

    pub fn planters_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut AutoPlanter)> + '_ {
        self.agents.iter_mut().filter_map(|(id, agent)| match agent {
            Agent::Planter(planter) => Some((*id, planter)),
            _ => None,
        })
    }

    pub fn thief_count(&self) -> usize {
        self.thieves().count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct AgentsPlugin;

impl Plugin for AgentsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentRegistry>();

        app.add_systems(
            Update,
            (spawning::handle_spawn_npc, spawning::handle_spawn_pet)
                .chain()
                .in_set(SimSet::Commands),
        )
        .add_systems(Update, spawning::roll_thief_spawn.in_set(SimSet::Spawn))
        .add_systems(
            Update,
            (thieves::on_agent_tick, planters::on_agent_tick)
                .chain()
                .in_set(SimSet::Agents),
        )
        .add_systems(Update, pets::on_fine_tick.in_set(SimSet::Fine));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = AgentRegistry::default();
        let a = registry.spawn(Agent::Thief(Thief::new(GridPos::new(0, 0))));
        let b = registry.spawn(Agent::Planter(AutoPlanter::new(GridPos::new(1, 1))));
        registry.remove(a);
        let c = registry.spawn(Agent::Thief(Thief::new(GridPos::new(2, 0))));

        assert!(a < b && b < c);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.thief_count(), 1);
        assert_eq!(registry.planters().count(), 1);
    }
}
