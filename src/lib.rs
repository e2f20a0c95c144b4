//! # Lamplighter - The Sunken Cathedral
//!
//! A turn-based ASCII adventure. The Lamplighter explores a drowned cathedral
//! one step at a time while the lantern burns down, opens seals with attuned
//! light, calms the spirits that wander the halls, and pieces together lore
//! carved in runes.
//!
//! ## Features
//!
//! - **Two-phase input**: movement ticks while exploring; typing a command pauses the world.
//! - **Verb-noun parser**: TAKE, DROP, USE, READ, FILL, SHINE, SOOTHE with synonyms.
//! - **Lantern oil**: drains per step and per action; a dry lantern means a blackout
//!   and a return to the last font visited.
//! - **Save slots**: JSON saves with an autosave, written atomically.
//!
//! ## Quick Start
//!
//! ```rust
//! use lamplighter::cathedral::{Direction, MoveOutcome, Session, SessionOptions};
//!
//! let mut session = Session::new(SessionOptions::default());
//! assert_eq!(session.step(Direction::South), MoveOutcome::Moved);
//!
//! session.begin_command();
//! let outcome = session.submit_command("inventory").unwrap().unwrap();
//! assert!(outcome.message.contains("Worn Scroll"));
//! ```
//!
//! ## Module Organization
//!
//! - [`cathedral`] - game engine: world, parser, resolver, session, saves
//! - [`config`] - TOML configuration
//! - [`logutil`] - log line helpers

pub mod cathedral;
pub mod config;
pub mod logutil;
