//! Rooms and their entity tables.
//!
//! A room's terrain is fixed at seed time. Its entity table is the only part
//! that changes during play (items taken or dropped, seals opened, spirits
//! soothed) and is what the save blob records per room.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::StoreError;
use super::tilemap::{Passability, TileMap};
use super::types::{Direction, Entity, EntityKind, Item, ItemId, Position};

/// Where leaving a room by its edge takes the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub room: String,
    pub arrival: Position,
}

/// Why a cell refused the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    /// Wall, rubble, or off the map with no exit.
    Solid,
    /// Locked door or barrier.
    Sealed,
    /// Deep water with a dry lantern.
    DeepWater,
    Spirit(String),
}

impl Blocked {
    pub fn message(&self) -> String {
        match self {
            Blocked::Solid => "You can't go that way.".to_string(),
            Blocked::Sealed => "The way is sealed.".to_string(),
            Blocked::DeepWater => {
                "Without light, the deep water would swallow you.".to_string()
            }
            Blocked::Spirit(name) => format!("The {} bars your way.", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    pub map: TileMap,
    pub entities: Vec<Entity>,
    pub exits: BTreeMap<Direction, Exit>,
    pub ambient: Vec<String>,
}

impl Room {
    pub fn new<S: AsRef<str>>(id: &str, name: &str, description: &str, map: &[S]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            map: TileMap::parse(map),
            entities: Vec::new(),
            exits: BTreeMap::new(),
            ambient: Vec::new(),
        }
    }

    pub fn with_entity(mut self, pos: Position, kind: EntityKind) -> Self {
        self.entities.push(Entity::new(pos, kind));
        self
    }

    pub fn with_item(self, pos: Position, item: Item) -> Self {
        self.with_entity(pos, EntityKind::Item(item))
    }

    pub fn with_exit(mut self, direction: Direction, room: &str, arrival: Position) -> Self {
        self.exits.insert(
            direction,
            Exit {
                room: room.to_string(),
                arrival,
            },
        );
        self
    }

    pub fn with_ambient(mut self, message: &str) -> Self {
        self.ambient.push(message.to_string());
        self
    }

    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.pos == pos)
    }

    /// Terrain plus entity state for entering `pos`.
    pub fn check_entry(&self, pos: Position, lantern_dry: bool) -> Result<(), Blocked> {
        let tile = self.map.tile_at(pos).ok_or(Blocked::Solid)?;
        match tile.passability() {
            Passability::Blocked => return Err(Blocked::Solid),
            Passability::Gated => {
                // A gate with nothing on it stays sealed.
                let open = self
                    .entities_at(pos)
                    .any(|e| matches!(e.kind, EntityKind::Barrier { .. } | EntityKind::Door { .. }))
                    && !self.entities_at(pos).any(Entity::blocks_movement);
                if !open {
                    return Err(Blocked::Sealed);
                }
            }
            Passability::NeedsLight if lantern_dry => return Err(Blocked::DeepWater),
            Passability::NeedsLight | Passability::Open => {}
        }
        if let Some(blocker) = self.entities_at(pos).find(|e| e.blocks_movement()) {
            return Err(match &blocker.kind {
                EntityKind::Spirit { name, .. } => Blocked::Spirit(name.clone()),
                _ => Blocked::Sealed,
            });
        }
        Ok(())
    }

    /// Floor item matching the phrase. One within reach of `near` wins over
    /// the first match elsewhere in the room.
    pub fn find_item(&self, phrase: &str, near: Position) -> Option<(Position, &Item)> {
        let mut matches = self
            .entities
            .iter()
            .filter_map(|e| e.item().filter(|i| i.answers_to(phrase)).map(|i| (e.pos, i)));
        let first = matches.next()?;
        if near.within_reach(first.0) {
            return Some(first);
        }
        Some(matches.find(|(pos, _)| near.within_reach(*pos)).unwrap_or(first))
    }

    /// Index of a non-item entity answering to the phrase, preferring one within reach.
    pub fn find_fixture(&self, phrase: &str, near: Position) -> Option<usize> {
        let mut candidates = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.item().is_none() && e.answers_to(phrase));
        let (first, entity) = candidates.next()?;
        if near.within_reach(entity.pos) {
            return Some(first);
        }
        Some(
            candidates
                .find(|(_, e)| near.within_reach(e.pos))
                .map_or(first, |(i, _)| i),
        )
    }

    /// Lift an item out of the room's table.
    pub fn take_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self
            .entities
            .iter()
            .position(|e| e.item().map(|i| i.id) == Some(id))?;
        match self.entities.remove(index).kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn place_item(&mut self, pos: Position, item: Item) {
        self.entities.push(Entity::new(pos, EntityKind::Item(item)));
    }

    pub fn font_at(&self, pos: Position) -> Option<&str> {
        self.entities_at(pos).find_map(|e| match &e.kind {
            EntityKind::Font { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Every room, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct World {
    rooms: BTreeMap<String, Room>,
}

impl World {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms: rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Snapshot of every room's entity table for the save blob.
    pub fn entity_tables(&self) -> BTreeMap<String, Vec<Entity>> {
        self.rooms
            .iter()
            .map(|(id, room)| (id.clone(), room.entities.clone()))
            .collect()
    }

    /// Replace entity tables from a save. All room ids are checked before anything changes.
    pub fn restore_entity_tables(
        &mut self,
        tables: BTreeMap<String, Vec<Entity>>,
    ) -> Result<(), StoreError> {
        if let Some(unknown) = tables.keys().find(|id| !self.rooms.contains_key(*id)) {
            return Err(StoreError::UnknownRoom(unknown.clone()));
        }
        for (id, entities) in tables {
            if let Some(room) = self.rooms.get_mut(&id) {
                room.entities = entities;
            }
        }
        Ok(())
    }
}
