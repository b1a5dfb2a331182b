//! Shared components, resources, events, and states for cropwatch.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// SIM STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum SimState {
    #[default]
    Loading,
    Running,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// GRID
// ═══════════════════════════════════════════════════════════════════════

/// Integer cell coordinate. Row 0 is the top edge of the farm.
///
/// Ordered by `(x, y)` so map iteration (and therefore nearest-target
/// tie-breaks) is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn neighbor(self, side: Side) -> Self {
        let (dx, dy) = side.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance between cell coordinates.
    pub fn distance(self, other: GridPos) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// The cell containing a continuous position (nearest cell centre).
    pub fn from_vec2(v: Vec2) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32)
    }

    /// Cells of the `w × h` rectangle anchored at `self` (top-left).
    pub fn footprint(self, w: i32, h: i32) -> impl Iterator<Item = GridPos> {
        let origin = self;
        (0..h).flat_map(move |dy| (0..w).map(move |dx| GridPos::new(origin.x + dx, origin.y + dy)))
    }
}

/// One side of a cell. North is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::East => (1, 0),
            Side::South => (0, 1),
            Side::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }
}

/// A fence segment on one edge of a cell.
///
/// The same physical edge can be named from either cell that shares it;
/// [`FenceEdge::canonical`] folds South/East onto the neighbour's North/West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FenceEdge {
    pub pos: GridPos,
    pub side: Side,
}

impl FenceEdge {
    pub const fn new(pos: GridPos, side: Side) -> Self {
        Self { pos, side }
    }

    /// The edge as seen from the cell on the other side.
    pub fn mirrored(self) -> Self {
        Self::new(self.pos.neighbor(self.side), self.side.opposite())
    }

    pub fn canonical(self) -> Self {
        match self.side {
            Side::North | Side::West => self,
            Side::South | Side::East => self.mirrored(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CROPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropKind {
    Wheat,
    Carrot,
    Spinach,
}

impl CropKind {
    pub const ALL: [CropKind; 3] = [CropKind::Wheat, CropKind::Carrot, CropKind::Spinach];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropStage {
    Seed,
    Growing,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub kind: CropKind,
    pub stage: CropStage,
    /// Whole growth ticks spent in the current stage.
    pub timer: u32,
}

impl Crop {
    pub fn seed(kind: CropKind) -> Self {
        Self {
            kind,
            stage: CropStage::Seed,
            timer: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stage == CropStage::Ready
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropDef {
    pub kind: CropKind,
    pub name: String,
    /// Ticks a seed waits before it sprouts.
    pub sprout_ticks: u32,
    /// Ticks a sprout waits before it is ready.
    pub mature_ticks: u32,
    pub sell_price: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: HashMap<CropKind, CropDef>,
}

impl CropRegistry {
    pub fn get(&self, kind: CropKind) -> Option<&CropDef> {
        self.crops.get(&kind)
    }

    pub fn sell_price(&self, kind: CropKind) -> u32 {
        self.get(kind).map(|def| def.sell_price).unwrap_or(0)
    }
}

/// Soil and crops. Soil only ever grows; crops come and go.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmState {
    pub soil: BTreeSet<GridPos>,
    pub crops: BTreeMap<GridPos, Crop>,
}

impl FarmState {
    pub fn has_soil(&self, pos: GridPos) -> bool {
        self.soil.contains(&pos)
    }

    /// Soil with nothing growing on it.
    pub fn is_empty_soil(&self, pos: GridPos) -> bool {
        self.soil.contains(&pos) && !self.crops.contains_key(&pos)
    }

    pub fn is_ready(&self, pos: GridPos) -> bool {
        self.crops.get(&pos).is_some_and(Crop::is_ready)
    }

    pub fn ready_crops(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.crops
            .iter()
            .filter(|(_, crop)| crop.is_ready())
            .map(|(pos, _)| *pos)
    }

    pub fn has_ready_crop(&self) -> bool {
        self.ready_crops().next().is_some()
    }

    /// Put a fresh seed on empty soil.
    pub fn plant(&mut self, pos: GridPos, kind: CropKind) -> Result<(), Rejection> {
        if !self.soil.contains(&pos) {
            return Err(Rejection::NoSoil(pos));
        }
        if self.crops.contains_key(&pos) {
            return Err(Rejection::Occupied(pos));
        }
        self.crops.insert(pos, Crop::seed(kind));
        Ok(())
    }

    /// Remove a ready crop and credit one unit of it to the inventory.
    pub fn harvest(&mut self, pos: GridPos, economy: &mut Economy) -> Result<CropKind, Rejection> {
        let crop = self.take_ready(pos)?;
        economy.add_crop(crop.kind, 1);
        Ok(crop.kind)
    }

    /// Remove a ready crop without crediting anyone (theft).
    pub fn take_ready(&mut self, pos: GridPos) -> Result<Crop, Rejection> {
        match self.crops.get(&pos) {
            None => Err(Rejection::NoCrop(pos)),
            Some(crop) if !crop.is_ready() => Err(Rejection::NotReady(pos)),
            Some(_) => self.crops.remove(&pos).ok_or(Rejection::NoCrop(pos)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ECONOMY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    pub money: u32,
    pub inventory: BTreeMap<CropKind, u32>,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            inventory: BTreeMap::new(),
        }
    }
}

impl Economy {
    pub fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Spend `cost` or change nothing.
    pub fn try_debit(&mut self, cost: u32) -> Result<(), Rejection> {
        if !self.can_afford(cost) {
            return Err(Rejection::InsufficientFunds {
                need: cost,
                have: self.money,
            });
        }
        self.money -= cost;
        Ok(())
    }

    pub fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn add_crop(&mut self, kind: CropKind, quantity: u32) {
        let entry = self.inventory.entry(kind).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    pub fn count(&self, kind: CropKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STRUCTURES — buildings, pens, fences, penned animals
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Barn,
}

/// A fixed-size walled pen anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pen {
    pub top_left: GridPos,
}

impl Pen {
    pub fn cells(&self) -> impl Iterator<Item = GridPos> {
        self.top_left.footprint(FOOTPRINT, FOOTPRINT)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (self.top_left.x..self.top_left.x + FOOTPRINT).contains(&pos.x)
            && (self.top_left.y..self.top_left.y + FOOTPRINT).contains(&pos.y)
    }

    /// The outer wall of the pen, as canonical fence edges.
    pub fn walls(&self) -> Vec<FenceEdge> {
        let pen = *self;
        pen.cells()
            .flat_map(|cell| Side::ALL.map(|side| (cell, side)))
            .filter(|(cell, side)| !pen.contains(cell.neighbor(*side)))
            .map(|(cell, side)| FenceEdge::new(cell, side).canonical())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    Chicken,
    Cow,
    Sheep,
}

impl AnimalKind {
    pub fn price(self) -> u32 {
        match self {
            AnimalKind::Chicken => 20,
            AnimalKind::Cow => 50,
            AnimalKind::Sheep => 35,
        }
    }

    /// Minimum enclosed area (cells) the animal needs.
    pub fn required_space(self) -> usize {
        match self {
            AnimalKind::Chicken => 4,
            AnimalKind::Cow => 9,
            AnimalKind::Sheep => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedAnimal {
    pub kind: AnimalKind,
    pub pos: GridPos,
    /// Smallest cell of the enclosure it was placed in.
    pub enclosure: GridPos,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Structures {
    pub buildings: HashMap<GridPos, BuildingKind>,
    pub pens: Vec<Pen>,
    /// Canonical edges only.
    pub fences: HashSet<FenceEdge>,
    pub animals: Vec<PlacedAnimal>,
}

impl Structures {
    pub fn is_built(&self, pos: GridPos) -> bool {
        self.buildings.contains_key(&pos)
    }

    pub fn pen_at(&self, pos: GridPos) -> Option<&Pen> {
        self.pens.iter().find(|pen| pen.contains(pos))
    }

    pub fn has_fence(&self, edge: FenceEdge) -> bool {
        self.fences.contains(&edge.canonical())
    }

    /// Every wall the enclosure validator must respect: fence segments plus
    /// pen perimeters. Rebuilt on each call.
    pub fn wall_edges(&self) -> HashSet<FenceEdge> {
        let mut walls = self.fences.clone();
        for pen in &self.pens {
            walls.extend(pen.walls());
        }
        walls
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER & SELECTION
// ═══════════════════════════════════════════════════════════════════════

/// Written by the input layer, read by the core.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPosition(pub GridPos);

impl Default for PlayerPosition {
    fn default() -> Self {
        Self(GridPos::new(GRID_SIZE / 2, GRID_SIZE / 2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildItem {
    Soil,
    Barn,
    Pen,
    Fence,
    Dog,
    Planter,
    /// The selected animal kind, dropped into an enclosure.
    Animal,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub crop: CropKind,
    pub build_item: Option<BuildItem>,
    pub animal: AnimalKind,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            crop: CropKind::Wheat,
            build_item: None,
            animal: AnimalKind::Chicken,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AGENT KINDS
// ═══════════════════════════════════════════════════════════════════════

/// Agents created through `SpawnNpcEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    Thief,
    Planter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetKind {
    Dog,
}

impl PetKind {
    pub fn price(self) -> u32 {
        match self {
            PetKind::Dog => 50,
        }
    }

    /// Thieves farther than this are ignored.
    pub fn range(self) -> f32 {
        match self {
            PetKind::Dog => 7.0,
        }
    }

    /// Cells per fine tick while chasing.
    pub fn chase_speed(self) -> f32 {
        match self {
            PetKind::Dog => 0.1,
        }
    }

    /// Cells per fine tick while patrolling.
    pub fn patrol_speed(self) -> f32 {
        match self {
            PetKind::Dog => 0.05,
        }
    }

    /// How far from its spawn point the pet wanders. `None` = stays put.
    pub fn patrol_radius(self) -> Option<f32> {
        match self {
            PetKind::Dog => Some(5.0),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIG — tunables loaded from assets/sim_config.ron
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds between crop growth ticks.
    pub growth_interval_secs: f32,
    /// Seconds between thief / planter ticks.
    pub agent_interval_secs: f32,
    /// Seconds between guard-pet motion ticks.
    pub fine_interval_secs: f32,
    /// Seconds between thief spawn rolls.
    pub spawn_interval_secs: f32,
    pub thief_spawn_chance: f64,
    pub max_thieves: usize,
    pub steal_delay_ticks: u32,
    pub plant_delay_ticks: u32,
    /// A thief within this distance of a guard pet drops everything and runs.
    pub alert_radius: f32,
    /// A guard pet this close to a thief catches it.
    pub catch_radius: f32,
    pub soil_price: u32,
    pub barn_price: u32,
    pub pen_price: u32,
    pub fence_price: u32,
    pub planter_price: u32,
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            growth_interval_secs: 1.0,
            agent_interval_secs: 1.0,
            fine_interval_secs: 1.0 / 60.0,
            spawn_interval_secs: 1.0,
            thief_spawn_chance: 0.1,
            max_thieves: 3,
            steal_delay_ticks: 5,
            plant_delay_ticks: 3,
            alert_radius: 3.0,
            catch_radius: 0.5,
            soil_price: 5,
            barn_price: 100,
            pen_price: 75,
            fence_price: 2,
            planter_price: 50,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    pub fn building_price(&self, kind: BuildingKind) -> u32 {
        match kind {
            BuildingKind::Barn => self.barn_price,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RANDOMNESS
// ═══════════════════════════════════════════════════════════════════════

/// The single source of randomness for spawns, coin tosses and patrols.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REJECTIONS — every precondition a command can fail
// ═══════════════════════════════════════════════════════════════════════

/// Why a command left the state untouched. Commands arriving through events
/// swallow these after logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("need {need} money, have {have}")]
    InsufficientFunds { need: u32, have: u32 },
    #[error("{0:?} is outside the farm")]
    OutOfBounds(GridPos),
    #[error("{0:?} is already occupied")]
    Occupied(GridPos),
    #[error("no soil at {0:?}")]
    NoSoil(GridPos),
    #[error("no crop at {0:?}")]
    NoCrop(GridPos),
    #[error("crop at {0:?} is not ready")]
    NotReady(GridPos),
    #[error("edge {0:?} is already fenced")]
    AlreadyFenced(FenceEdge),
    #[error("{0:?} is not inside a closed enclosure")]
    NotEnclosed(GridPos),
    #[error("enclosure of {area} cells is smaller than the {required} required")]
    EnclosureTooSmall { area: usize, required: usize },
    #[error("already {0} thieves on the farm")]
    ThiefCap(usize),
    #[error("player at {0:?} is not next to the merchant")]
    NotNearMerchant(GridPos),
}

// ═══════════════════════════════════════════════════════════════════════
// COMMAND EVENTS — issued by the input/UI layer
// ═══════════════════════════════════════════════════════════════════════

/// Plant the selected crop kind.
#[derive(Event, Debug, Clone)]
pub struct PlantSeedEvent {
    pub pos: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct HarvestCropEvent {
    pub pos: GridPos,
}

/// Drag-select soil: any two opposite corners of a rectangle.
#[derive(Event, Debug, Clone)]
pub struct PlaceSoilEvent {
    pub from: GridPos,
    pub to: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct PlaceBuildingEvent {
    pub kind: BuildingKind,
    pub top_left: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct PlacePenEvent {
    pub top_left: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct PlaceFenceEvent {
    pub pos: GridPos,
    pub side: Side,
}

#[derive(Event, Debug, Clone)]
pub struct PlaceAnimalEvent {
    pub kind: AnimalKind,
    pub pos: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct SellInventoryEvent;

#[derive(Event, Debug, Clone)]
pub struct SelectCropEvent {
    pub crop: CropKind,
}

#[derive(Event, Debug, Clone)]
pub struct SelectBuildItemEvent {
    pub item: Option<BuildItem>,
}

#[derive(Event, Debug, Clone)]
pub struct SelectAnimalEvent {
    pub animal: AnimalKind,
}

/// Hire a helper or drop in a thief (thieves are free and capped).
#[derive(Event, Debug, Clone)]
pub struct SpawnNpcEvent {
    pub kind: NpcKind,
    pub pos: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct SpawnPetEvent {
    pub kind: PetKind,
    pub pos: GridPos,
}

/// A click (`from == to`) or drag on the grid with the selected build item.
#[derive(Event, Debug, Clone)]
pub struct UseBuildItemEvent {
    pub from: GridPos,
    pub to: GridPos,
}

/// The input layer moved the player.
#[derive(Event, Debug, Clone)]
pub struct MovePlayerEvent {
    pub pos: GridPos,
}

/// Flip between Running and Paused.
#[derive(Event, Debug, Clone)]
pub struct TogglePauseEvent;

// ═══════════════════════════════════════════════════════════════════════
// OUTCOME EVENTS — cross-domain communication and HUD feedback
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Harvester {
    Player,
    Planter(u64),
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub kind: CropKind,
    pub pos: GridPos,
    pub by: Harvester,
}

#[derive(Event, Debug, Clone)]
pub struct CropReadyEvent {
    pub kind: CropKind,
    pub pos: GridPos,
}

#[derive(Event, Debug, Clone)]
pub struct CropStolenEvent {
    pub kind: CropKind,
    pub pos: GridPos,
    pub thief: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThiefExit {
    /// Walked off the farm.
    Escaped,
    /// Run down by a guard pet.
    Caught,
}

#[derive(Event, Debug, Clone)]
pub struct ThiefRemovedEvent {
    pub thief: u64,
    pub pos: GridPos,
    pub reason: ThiefExit,
}

#[derive(Event, Debug, Clone)]
pub struct ThiefSpawnedEvent {
    pub thief: u64,
    pub pos: GridPos,
}

/// A guard pet or auto-planter was bought.
#[derive(Event, Debug, Clone)]
pub struct AgentPurchasedEvent {
    pub agent: u64,
    pub item: BuildItem,
    pub pos: GridPos,
}

/// Positive = income, negative = spending.
#[derive(Event, Debug, Clone)]
pub struct MoneyChangeEvent {
    pub amount: i64,
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK — tick events and system ordering
// ═══════════════════════════════════════════════════════════════════════

/// Frame-level ordering. Within one frame: ground-shaping commands (soil,
/// structures, fences), then commands that depend on them, then the clock,
/// then growth before any agent looks at crop readiness.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Build,
    Commands,
    Clock,
    Growth,
    Spawn,
    Agents,
    Fine,
}

/// One crop growth step (~1 Hz).
#[derive(Event, Debug, Clone)]
pub struct GrowthTickEvent;

/// One thief / planter decision step (~1 Hz).
#[derive(Event, Debug, Clone)]
pub struct AgentTickEvent;

/// One guard-pet motion step (~60 Hz).
#[derive(Event, Debug, Clone)]
pub struct FineTickEvent;

/// One chance for a thief to show up.
#[derive(Event, Debug, Clone)]
pub struct SpawnRollEvent;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const GRID_SIZE: i32 = 20;
/// Side length of barns and pens.
pub const FOOTPRINT: i32 = 3;
pub const STARTING_MONEY: u32 = 100;
/// The merchant stall. Selling only works from this cell or one of its eight
/// neighbours.
pub const MERCHANT_POS: GridPos = GridPos::new(1, 1);
