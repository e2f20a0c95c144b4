//! # The Sunken Cathedral
//!
//! Game engine for the lantern-oil adventure: a tile grid explored one step at a
//! time, and a verb-noun parser that pauses the world while a command is typed.
//!
//! ## Layout
//!
//! - [`types`] shared value types (positions, items, entities, difficulty)
//! - [`tilemap`] static terrain and passability
//! - [`world`] rooms with their mutable entity tables
//! - [`inventory`] and [`gauge`] the player's satchel and lantern oil
//! - [`parser`] and [`resolver`] turn a typed line into a world change
//! - [`session`] the driver that owns all of the above
//! - [`storage`] JSON save slots
//! - [`seed`], [`lore`], [`cipher`] canonical content
//! - [`render`] text views
//!
//! ## Example
//!
//! ```rust
//! use lamplighter::cathedral::{Direction, Session, SessionOptions};
//!
//! let mut session = Session::new(SessionOptions::default());
//! session.step(Direction::West);
//! session.begin_command();
//! let outcome = session.submit_command("read scroll").unwrap().unwrap();
//! assert!(outcome.message.contains("Worn Scroll"));
//! ```

pub mod cipher;
pub mod errors;
pub mod gauge;
pub mod inventory;
pub mod lore;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod seed;
pub mod session;
pub mod storage;
pub mod tilemap;
pub mod types;
pub mod world;

pub use errors::{CommandError, StoreError};
pub use gauge::{OilGauge, OilWarning};
pub use inventory::Inventory;
pub use parser::{parse_command, parse_movement, Command, Verb};
pub use session::{
    Location, MoveOutcome, Outcome, Request, Session, SessionOptions, DEFAULT_RECOVERY_OIL,
};
pub use storage::{FileSaveStore, SaveData, SaveSlot, SaveStore, SlotInfo};
pub use types::{
    Attunement, Difficulty, DifficultySettings, Direction, Entity, EntityKind, Item, ItemId,
    ItemKind, LockState, Mode, Position, SpiritState,
};
pub use world::{Blocked, Exit, Room, World};
