//! One Lamplighter's run through the Cathedral.
//!
//! The session owns the world and the player and is the only thing the front
//! end talks to. Input arrives in two phases: movement ticks while exploring,
//! and a single typed command while the world is paused.

use chrono::Utc;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::errors::{CommandError, StoreError};
use super::gauge::OilGauge;
use super::inventory::Inventory;
use super::parser::parse_command;
use super::resolver;
use super::seed;
use super::storage::SaveData;
use super::types::{
    Attunement, Difficulty, DifficultySettings, Direction, Item, ItemId, Mode, Position,
    INVENTORY_CAPACITY, MAX_OIL, SAVE_SCHEMA_VERSION,
};
use super::world::{Blocked, Room, World};
use crate::logutil::escape_log;

/// Oil left in the lantern after waking from a blackout.
pub const DEFAULT_RECOVERY_OIL: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub difficulty: Difficulty,
    pub costs: DifficultySettings,
    pub recovery_oil: f64,
}

impl SessionOptions {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            costs: difficulty.settings(),
            recovery_oil: DEFAULT_RECOVERY_OIL,
        }
    }

    /// Recovery oil is kept strictly positive so a blackout always leaves a flame.
    pub fn with_recovery_oil(mut self, oil: f64) -> Self {
        self.recovery_oil = if oil.is_finite() && oil > 0.0 {
            oil.min(MAX_OIL)
        } else {
            DEFAULT_RECOVERY_OIL
        };
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub room: String,
    pub pos: Position,
}

impl Location {
    pub fn new(room: &str, pos: Position) -> Self {
        Self {
            room: room.to_string(),
            pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub location: Location,
    pub oil: OilGauge,
    /// Held geode currently set in the lantern.
    pub attunement: Option<ItemId>,
    pub inventory: Inventory,
}

/// Result of one movement tick.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved,
    /// Crossed into another room; carries the arrival text.
    EnteredRoom(String),
    Blocked(Blocked),
    /// Lantern ran dry; the player woke at the checkpoint.
    Blackout(String),
    /// A command is being typed and the world is frozen.
    Paused,
}

impl MoveOutcome {
    pub fn message(&self) -> Option<String> {
        match self {
            MoveOutcome::Moved | MoveOutcome::Paused => None,
            MoveOutcome::EnteredRoom(text) | MoveOutcome::Blackout(text) => Some(text.clone()),
            MoveOutcome::Blocked(reason) => Some(reason.message()),
        }
    }
}

/// Things a command asks of the front end rather than the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Save(Option<u8>),
    Load(Option<u8>),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub message: String,
    pub request: Option<Request>,
}

impl Outcome {
    pub fn say(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            request: None,
        }
    }

    pub fn request(message: impl Into<String>, request: Request) -> Self {
        Self {
            message: message.into(),
            request: Some(request),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub world: World,
    pub player: Player,
    /// Where a blackout returns the player. Updated by FILL.
    pub checkpoint: Location,
    /// Lore ids read so far, in reading order.
    pub journal: Vec<String>,
    pub options: SessionOptions,
    pub moves: u32,
    pub blackouts: u32,
    mode: Mode,
    seed: u64,
}

impl Session {
    /// Fresh game in the canonical Cathedral.
    pub fn new(options: SessionOptions) -> Self {
        let start = Location::new(seed::START_ROOM_ID, seed::START_POSITION);
        Self::build(
            seed::canonical_world(),
            start,
            seed::starting_inventory(),
            options,
        )
    }

    /// Fresh game in a custom world. The start room must exist.
    pub fn with_world(
        world: World,
        start: Location,
        items: Vec<Item>,
        options: SessionOptions,
    ) -> Result<Self, StoreError> {
        if world.room(&start.room).is_none() {
            return Err(StoreError::UnknownRoom(start.room));
        }
        Ok(Self::build(world, start, items, options))
    }

    fn build(world: World, start: Location, items: Vec<Item>, options: SessionOptions) -> Self {
        let mut inventory = Inventory::new();
        for item in items {
            if let Err(item) = inventory.add(item) {
                warn!("starting inventory full, leaving {} behind", item.name);
            }
        }
        Self {
            world,
            player: Player {
                location: start.clone(),
                oil: OilGauge::full(),
                attunement: None,
                inventory,
            },
            checkpoint: start,
            journal: Vec::new(),
            options,
            moves: 0,
            blackouts: 0,
            mode: Mode::Exploring,
            seed: rand::random(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn room_here(&self) -> Option<&Room> {
        self.world.room(&self.player.location.room)
    }

    /// Attunement of the geode set in the lantern, if it is still held.
    pub fn active_attunement(&self) -> Option<Attunement> {
        self.player
            .attunement
            .and_then(|id| self.player.inventory.get(id))
            .and_then(Item::attunement)
    }

    pub fn active_geode(&self) -> Option<&Item> {
        self.player
            .attunement
            .and_then(|id| self.player.inventory.get(id))
            .filter(|item| item.attunement().is_some())
    }

    /// Advance one exploration tick in `dir`.
    pub fn step(&mut self, dir: Direction) -> MoveOutcome {
        if self.mode == Mode::AwaitingCommand {
            return MoveOutcome::Paused;
        }
        let dest = match self.destination(dir) {
            Ok(dest) => dest,
            Err(reason) => {
                debug!(
                    "move {} from {} blocked: {:?}",
                    dir.name(),
                    self.player.location.pos,
                    reason
                );
                return MoveOutcome::Blocked(reason);
            }
        };

        self.moves = self.moves.saturating_add(1);
        if self.player.oil.drain(self.options.costs.move_cost) {
            return MoveOutcome::Blackout(self.blackout());
        }

        let changed_room = dest.room != self.player.location.room;
        self.player.location = dest;
        if changed_room {
            info!(
                "entered {} at {}",
                self.player.location.room, self.player.location.pos
            );
            MoveOutcome::EnteredRoom(self.arrival_text())
        } else {
            MoveOutcome::Moved
        }
    }

    fn destination(&self, dir: Direction) -> Result<Location, Blocked> {
        let here = &self.player.location;
        let room = self.world.room(&here.room).ok_or(Blocked::Solid)?;
        let dry = self.player.oil.is_empty();
        match here.pos.step(dir).filter(|p| room.map.contains(*p)) {
            Some(pos) => {
                room.check_entry(pos, dry)?;
                Ok(Location::new(&here.room, pos))
            }
            None => {
                let exit = room.exits.get(&dir).ok_or(Blocked::Solid)?;
                let target = self.world.room(&exit.room).ok_or(Blocked::Solid)?;
                target.check_entry(exit.arrival, dry)?;
                Ok(Location::new(&exit.room, exit.arrival))
            }
        }
    }

    fn blackout(&mut self) -> String {
        self.blackouts = self.blackouts.saturating_add(1);
        warn!(
            "lantern ran dry in {} at {}; returning to {} at {} (blackout #{})",
            self.player.location.room,
            self.player.location.pos,
            self.checkpoint.room,
            self.checkpoint.pos,
            self.blackouts
        );
        self.player.location = self.checkpoint.clone();
        self.player.oil = OilGauge::new(self.options.recovery_oil);
        let place = self
            .room_here()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| "the dark".to_string());
        format!(
            "Your lantern gutters and dies. The darkness closes in...\n\
You wake in {} with a faint flame still clinging to the wick.",
            place
        )
    }

    /// Room name, description, and one ambient line.
    pub fn arrival_text(&self) -> String {
        let Some(room) = self.room_here() else {
            return String::new();
        };
        let mut text = format!("{}\n{}", room.name, room.description);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(u64::from(self.moves)));
        if let Some(line) = room.ambient.choose(&mut rng) {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    /// Freeze the world while a command is typed.
    pub fn begin_command(&mut self) {
        self.mode = Mode::AwaitingCommand;
    }

    pub fn cancel_command(&mut self) {
        self.mode = Mode::Exploring;
    }

    /// Parse and execute one command line, then resume exploring.
    ///
    /// A blank line cancels and yields `Ok(None)`. Errors leave the world as it was.
    pub fn submit_command(&mut self, line: &str) -> Result<Option<Outcome>, CommandError> {
        self.mode = Mode::Exploring;
        let parsed = parse_command(line);
        debug!("command {:?} -> {:?}", escape_log(line), parsed);
        let Some(command) = parsed? else {
            return Ok(None);
        };
        let result = resolver::execute(self, &command);
        if let Err(e) = &result {
            debug!("command {:?} failed: {}", command.verb, e);
        }
        result.map(Some)
    }

    /// Everything needed to resume this run later.
    pub fn snapshot(&self) -> SaveData {
        SaveData {
            version: SAVE_SCHEMA_VERSION,
            saved_at: Utc::now(),
            difficulty: self.options.difficulty,
            location: self.player.location.clone(),
            oil: self.player.oil,
            inventory: self.player.inventory.clone(),
            attunement: self.player.attunement,
            checkpoint: self.checkpoint.clone(),
            rooms: self.world.entity_tables(),
            journal: self.journal.clone(),
            moves: self.moves,
            blackouts: self.blackouts,
        }
    }

    /// Resume a saved run in the canonical Cathedral. The save's difficulty wins
    /// over the one in `options`.
    pub fn from_save(data: SaveData, options: SessionOptions) -> Result<Self, StoreError> {
        Self::restore_into(seed::canonical_world(), data, options)
    }

    pub fn restore_into(
        mut world: World,
        data: SaveData,
        options: SessionOptions,
    ) -> Result<Self, StoreError> {
        if data.version != SAVE_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                expected: SAVE_SCHEMA_VERSION,
                found: data.version,
            });
        }
        world.restore_entity_tables(data.rooms)?;
        for loc in [&data.location, &data.checkpoint] {
            if world.room(&loc.room).is_none() {
                return Err(StoreError::UnknownRoom(loc.room.clone()));
            }
        }
        let inventory = restore_inventory(&world, data.inventory)?;
        let attunement = data
            .attunement
            .filter(|id| inventory.get(*id).and_then(Item::attunement).is_some());
        let options = SessionOptions {
            difficulty: data.difficulty,
            costs: data.difficulty.settings(),
            ..options
        };
        Ok(Self {
            world,
            player: Player {
                location: data.location,
                oil: OilGauge::new(data.oil.level()),
                attunement,
                inventory,
            },
            checkpoint: data.checkpoint,
            journal: data.journal,
            options,
            moves: data.moves,
            blackouts: data.blackouts,
            mode: Mode::Exploring,
            seed: rand::random(),
        })
    }
}

/// Refill the satchel one item at a time so a hand-edited save can neither
/// overfill it nor carry an item that still lies in a room.
fn restore_inventory(world: &World, saved: Inventory) -> Result<Inventory, StoreError> {
    let held = saved.len();
    let mut inventory = Inventory::new();
    for item in saved.into_items() {
        let on_floor = world
            .rooms()
            .flat_map(|r| r.entities.iter())
            .any(|e| e.item().map(|i| i.id) == Some(item.id));
        if on_floor || inventory.contains(item.id) {
            return Err(StoreError::DuplicateItem(item.id.0));
        }
        inventory.add(item).map_err(|_| StoreError::InventoryOverflow {
            held,
            max: INVENTORY_CAPACITY,
        })?;
    }
    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cathedral::types::{Attunement, EntityKind, LockState, SpiritState};

    fn corridor() -> World {
        World::new(vec![Room::new(
            "hall",
            "Hall",
            "A narrow hall.",
            &["▓▓▓▓▓▓", "▓    ▓", "▓≈≈▓ ▓", "▓▓▓▓▓▓"],
        )
        .with_entity(
            Position::new(1, 4),
            EntityKind::Spirit {
                name: "Weeping Sorrow".into(),
                attunement: Attunement::Prayer,
                state: SpiritState::Hostile,
            },
        )
        .with_entity(
            Position::new(1, 1),
            EntityKind::Font {
                name: "Font".into(),
            },
        )])
    }

    fn session(difficulty: Difficulty) -> Session {
        Session::with_world(
            corridor(),
            Location::new("hall", Position::new(1, 2)),
            Vec::new(),
            SessionOptions::new(difficulty),
        )
        .expect("start room exists")
    }

    #[test]
    fn move_drains_move_cost() {
        let mut s = session(Difficulty::Hard);
        assert_eq!(s.step(Direction::East), MoveOutcome::Moved);
        assert_eq!(s.player.location.pos, Position::new(1, 3));
        assert_eq!(s.player.oil.level(), 99.5);
        assert_eq!(s.moves, 1);
    }

    #[test]
    fn blocked_move_is_free() {
        let mut s = session(Difficulty::Hard);
        assert_eq!(s.step(Direction::North), MoveOutcome::Blocked(Blocked::Solid));
        assert_eq!(s.player.oil.level(), 100.0);
        assert_eq!(s.moves, 0);
    }

    #[test]
    fn hostile_spirit_blocks_its_cell() {
        let mut s = session(Difficulty::Hard);
        s.step(Direction::East);
        assert_eq!(
            s.step(Direction::East),
            MoveOutcome::Blocked(Blocked::Spirit("Weeping Sorrow".into()))
        );
    }

    #[test]
    fn paused_world_ignores_movement() {
        let mut s = session(Difficulty::Hard);
        s.begin_command();
        assert_eq!(s.mode(), Mode::AwaitingCommand);
        assert_eq!(s.step(Direction::East), MoveOutcome::Paused);
        assert_eq!(s.player.location.pos, Position::new(1, 2));
        assert_eq!(s.player.oil.level(), 100.0);
        s.cancel_command();
        assert_eq!(s.mode(), Mode::Exploring);
    }

    #[test]
    fn blank_submission_cancels() {
        let mut s = session(Difficulty::Hard);
        s.begin_command();
        assert_eq!(s.submit_command("  "), Ok(None));
        assert_eq!(s.mode(), Mode::Exploring);
    }

    #[test]
    fn failed_command_still_resumes_exploring() {
        let mut s = session(Difficulty::Hard);
        s.begin_command();
        assert!(s.submit_command("juggle").is_err());
        assert_eq!(s.mode(), Mode::Exploring);
    }

    #[test]
    fn blackout_returns_to_checkpoint_with_recovery_oil() {
        let mut s = session(Difficulty::Hard);
        s.player.oil = OilGauge::new(0.3);
        let outcome = s.step(Direction::East);
        assert!(matches!(outcome, MoveOutcome::Blackout(_)), "{:?}", outcome);
        assert_eq!(s.player.location, Location::new("hall", Position::new(1, 2)));
        assert_eq!(s.player.oil.level(), DEFAULT_RECOVERY_OIL);
        assert_eq!(s.blackouts, 1);
    }

    #[test]
    fn dry_lantern_refuses_deep_water() {
        let mut s = session(Difficulty::Explorer);
        s.player.oil = OilGauge::new(0.0);
        assert_eq!(
            s.step(Direction::South),
            MoveOutcome::Blocked(Blocked::DeepWater)
        );
        s.player.oil = OilGauge::new(5.0);
        assert_eq!(s.step(Direction::South), MoveOutcome::Moved);
    }

    #[test]
    fn recovery_oil_is_kept_positive() {
        let opts = SessionOptions::default().with_recovery_oil(0.0);
        assert_eq!(opts.recovery_oil, DEFAULT_RECOVERY_OIL);
        let opts = SessionOptions::default().with_recovery_oil(250.0);
        assert_eq!(opts.recovery_oil, MAX_OIL);
    }

    #[test]
    fn restore_drops_attunement_to_unheld_geode() {
        let mut s = Session::new(SessionOptions::default());
        s.player.attunement = Some(seed::PRAYER_GEODE);
        let data = s.snapshot();
        let restored = Session::from_save(data, SessionOptions::default()).expect("restores");
        assert_eq!(restored.player.attunement, None);
    }

    #[test]
    fn restore_refuses_an_overfilled_satchel() {
        let mut data = Session::new(SessionOptions::default()).snapshot();
        let keys: Vec<Item> = (10..15).map(|n| Item::key(n, "Spare Key")).collect();
        data.inventory = serde_json::from_value(serde_json::json!({ "items": keys }))
            .expect("inventory json");
        let err = Session::from_save(data, SessionOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InventoryOverflow { held: 5, max: 4 }
        ));
    }

    #[test]
    fn restore_refuses_item_both_held_and_on_the_floor() {
        let mut data = Session::new(SessionOptions::default()).snapshot();
        data.inventory
            .add(Item::geode(seed::PRAYER_GEODE.0, "Prayer Geode", Attunement::Prayer))
            .expect("room in satchel");
        let err = Session::from_save(data, SessionOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateItem(2)));
    }

    #[test]
    fn restore_refuses_the_same_item_held_twice() {
        let mut data = Session::new(SessionOptions::default()).snapshot();
        data.inventory.add(Item::key(9, "Bone Key")).unwrap();
        data.inventory.add(Item::key(9, "Bone Key")).unwrap();
        let err = Session::from_save(data, SessionOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateItem(9)));
    }

    #[test]
    fn restore_only_attunes_to_geodes() {
        let mut data = Session::new(SessionOptions::default()).snapshot();
        data.inventory.add(Item::key(9, "Bone Key")).unwrap();
        data.attunement = Some(ItemId(9));
        let restored = Session::from_save(data, SessionOptions::default()).expect("restores");
        assert_eq!(restored.player.attunement, None);
        assert!(restored.active_geode().is_none());
    }

    #[test]
    fn active_geode_ignores_non_geodes() {
        let mut s = Session::new(SessionOptions::default());
        s.player.attunement = Some(seed::WORN_SCROLL);
        assert!(s.active_geode().is_none());
        assert_eq!(s.active_attunement(), None);
    }

    #[test]
    fn restore_rejects_other_schema_versions() {
        let mut data = Session::new(SessionOptions::default()).snapshot();
        data.version = SAVE_SCHEMA_VERSION + 1;
        let err = Session::from_save(data, SessionOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::SchemaMismatch { .. }));
    }

    #[test]
    fn restore_keeps_entity_state() {
        let mut s = Session::new(SessionOptions::new(Difficulty::Easy));
        if let Some(room) = s.world.room_mut(seed::START_ROOM_ID) {
            for e in room.entities.iter_mut() {
                if let EntityKind::Barrier { state, .. } = &mut e.kind {
                    *state = LockState::Unlocked;
                }
            }
        }
        s.moves = 42;
        let restored =
            Session::from_save(s.snapshot(), SessionOptions::default()).expect("restores");
        assert_eq!(restored.options.difficulty, Difficulty::Easy);
        assert_eq!(restored.moves, 42);
        assert_eq!(
            restored.world.entity_tables(),
            s.world.entity_tables()
        );
    }
}
