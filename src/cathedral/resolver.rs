//! Apply a parsed command to the session.
//!
//! Every handler checks all of its preconditions before touching state, so an
//! `Err` always means nothing changed. The per-command oil cost is charged
//! only after a world action succeeds.

use log::info;

use super::errors::CommandError;
use super::lore;
use super::parser::{Command, Verb};
use super::render;
use super::session::{Outcome, Request, Session};
use super::types::{EntityKind, ItemId, ItemKind, LockState, Position, SpiritState};

/// What a noun phrase named.
#[derive(Debug, Clone, PartialEq)]
enum Target {
    Lantern,
    Held(ItemId, String),
    Floor(ItemId, String, Position),
    /// Index into the current room's entity table.
    Fixed(usize, String),
}

pub fn execute(session: &mut Session, command: &Command) -> Result<Outcome, CommandError> {
    let target = command.target.as_deref();
    let noun = || target.ok_or_else(|| CommandError::MissingTarget(command.verb.label().into()));
    match command.verb {
        Verb::Take => take(session, noun()?),
        Verb::Drop => drop_item(session, noun()?),
        Verb::Use => use_item(session, noun()?),
        Verb::Read => read(session, noun()?),
        Verb::Fill => fill(session, target.unwrap_or("LANTERN")),
        Verb::Shine => shine(session, target.unwrap_or("LANTERN")),
        Verb::Soothe => soothe(session, target.unwrap_or("SPIRIT")),
        Verb::Help => Ok(Outcome::say(render::help_text())),
        Verb::Inventory => Ok(Outcome::say(render::inventory_listing(session))),
        Verb::Save => Ok(Outcome::request(
            "Saving your progress...",
            Request::Save(slot_number(target)?),
        )),
        Verb::Load => Ok(Outcome::request(
            "Loading...",
            Request::Load(slot_number(target)?),
        )),
        Verb::Quit => Ok(Outcome::request(
            "The Cathedral will wait for your return.",
            Request::Quit,
        )),
    }
}

fn slot_number(target: Option<&str>) -> Result<Option<u8>, CommandError> {
    match target {
        None => Ok(None),
        Some(t) => t
            .parse::<u8>()
            .map(Some)
            .map_err(|_| CommandError::precondition("Save slots are numbered, e.g. SAVE 2.")),
    }
}

/// Resolve a phrase against the lantern, the inventory, and the current room.
fn locate(session: &Session, phrase: &str, floor_first: bool) -> Result<Target, CommandError> {
    if phrase == "LANTERN" {
        return Ok(Target::Lantern);
    }
    let here = session.player.location.pos;
    let room = session.room_here();
    let held = session
        .player
        .inventory
        .find(phrase)
        .map(|i| Target::Held(i.id, i.name.clone()));
    let floor = room
        .and_then(|r| r.find_item(phrase, here))
        .map(|(pos, i)| Target::Floor(i.id, i.name.clone(), pos));
    let item = if floor_first {
        floor.or(held)
    } else {
        held.or(floor)
    };
    item.or_else(|| {
        room.and_then(|r| {
            r.find_fixture(phrase, here)
                .map(|i| Target::Fixed(i, r.entities[i].label()))
        })
    })
    .ok_or(CommandError::TargetNotFound)
}

/// Accept only the lantern; anything else that exists gets `refusal`.
fn require_lantern(session: &Session, phrase: &str, refusal: &str) -> Result<(), CommandError> {
    match locate(session, phrase, false)? {
        Target::Lantern => Ok(()),
        _ => Err(CommandError::precondition(refusal)),
    }
}

fn charge(session: &mut Session) {
    session.player.oil.drain(session.options.costs.command_cost);
}

fn take(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    let (id, name, pos) = match locate(session, phrase, true)? {
        Target::Floor(id, name, pos) => (id, name, pos),
        Target::Held(_, name) => {
            return Err(CommandError::precondition(format!(
                "You already carry the {}.",
                name
            )))
        }
        Target::Lantern => {
            return Err(CommandError::precondition(
                "Your lantern is already in your hand.",
            ))
        }
        Target::Fixed(_, name) => {
            return Err(CommandError::precondition(format!(
                "You can't take the {}.",
                name
            )))
        }
    };
    if !session.player.location.pos.within_reach(pos) {
        return Err(CommandError::precondition(format!(
            "The {} is out of reach.",
            name
        )));
    }
    if session.player.inventory.is_full() {
        return Err(CommandError::InventoryFull);
    }

    let room = session
        .world
        .room_mut(&session.player.location.room)
        .ok_or(CommandError::TargetNotFound)?;
    let item = room.take_item(id).ok_or(CommandError::TargetNotFound)?;
    if let Err(item) = session.player.inventory.add(item) {
        room.place_item(pos, item);
        return Err(CommandError::InventoryFull);
    }
    charge(session);
    info!("took {} in {}", name, session.player.location.room);
    Ok(Outcome::say(format!("You take the {}.", name)))
}

fn drop_item(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    let id = match session.player.inventory.find(phrase) {
        Some(item) => item.id,
        None => {
            return Err(match locate(session, phrase, false)? {
                Target::Lantern => {
                    CommandError::precondition("You would be lost without your lantern.")
                }
                _ => CommandError::NotCarrying,
            })
        }
    };
    let pos = session.player.location.pos;
    let room = session
        .world
        .room_mut(&session.player.location.room)
        .ok_or(CommandError::TargetNotFound)?;
    let item = session
        .player
        .inventory
        .remove(id)
        .ok_or(CommandError::NotCarrying)?;
    let name = item.name.clone();
    room.place_item(pos, item);

    let mut message = format!("You drop the {}.", name);
    if session.player.attunement == Some(id) {
        session.player.attunement = None;
        message.push_str(" Your lantern's glow returns to plain gold.");
    }
    charge(session);
    info!("dropped {} at {}", name, pos);
    Ok(Outcome::say(message))
}

fn use_item(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    match locate(session, phrase, false)? {
        Target::Held(id, name) => {
            let kind = session
                .player
                .inventory
                .get(id)
                .map(|i| i.kind.clone())
                .ok_or(CommandError::NotCarrying)?;
            match kind {
                ItemKind::Geode(attunement) => {
                    session.player.attunement = Some(id);
                    charge(session);
                    info!("lantern attuned to {}", attunement.name());
                    Ok(Outcome::say(format!(
                        "You set the {} into your lantern. Its flame takes on a {} hue.",
                        name,
                        attunement.name()
                    )))
                }
                ItemKind::Key => open_door(session, id, &name),
                ItemKind::Lore(_) => Err(CommandError::precondition("You can't use that.")),
            }
        }
        Target::Floor(_, name, _) => Err(CommandError::precondition(format!(
            "You need to pick up the {} first.",
            name
        ))),
        Target::Lantern => Err(CommandError::precondition(
            "Your lantern is already lit. Try SHINE LANTERN or FILL LANTERN.",
        )),
        Target::Fixed(..) => Err(CommandError::precondition("You can't use that.")),
    }
}

fn open_door(session: &mut Session, key: ItemId, key_name: &str) -> Result<Outcome, CommandError> {
    let here = session.player.location.pos;
    let room = session
        .world
        .room_mut(&session.player.location.room)
        .ok_or(CommandError::TargetNotFound)?;
    let doors: Vec<usize> = room
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e.kind, EntityKind::Door { .. }) && here.within_reach(e.pos))
        .map(|(i, _)| i)
        .collect();
    if doors.is_empty() {
        return Err(CommandError::precondition(format!(
            "There's no door here for the {}.",
            key_name
        )));
    }
    let fitting = doors.into_iter().find(|&i| {
        matches!(room.entities[i].kind, EntityKind::Door { key: k, .. } if k == key)
    });
    let Some(index) = fitting else {
        return Err(CommandError::precondition(format!(
            "The {} doesn't fit this lock.",
            key_name
        )));
    };
    if let EntityKind::Door { state, .. } = &mut room.entities[index].kind {
        if *state == LockState::Unlocked {
            return Err(CommandError::precondition("The door is already open."));
        }
        *state = LockState::Unlocked;
    }
    charge(session);
    info!("door unlocked in {}", session.player.location.room);
    Ok(Outcome::say(format!(
        "The {} turns with a groan. The door swings open.",
        key_name
    )))
}

fn read(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    let lore_id = match locate(session, phrase, false)? {
        Target::Held(id, _) => session
            .player
            .inventory
            .get(id)
            .and_then(|i| i.lore_id())
            .map(str::to_string),
        Target::Floor(id, _, _) => session
            .room_here()
            .and_then(|r| r.entities.iter().find_map(|e| e.item().filter(|i| i.id == id)))
            .and_then(|i| i.lore_id())
            .map(str::to_string),
        Target::Fixed(index, _) => session
            .room_here()
            .and_then(|r| r.entities.get(index))
            .and_then(|e| match &e.kind {
                EntityKind::Inscription { lore } => Some(lore.clone()),
                _ => None,
            }),
        Target::Lantern => None,
    };
    let entry = lore_id
        .as_deref()
        .and_then(lore::lookup)
        .ok_or_else(|| CommandError::precondition("There's nothing to read on that."))?;

    if !session.journal.iter().any(|id| id == entry.id) {
        session.journal.push(entry.id.to_string());
        info!("lore discovered: {}", entry.id);
    }
    charge(session);
    Ok(Outcome::say(lore::render_entry(entry)))
}

fn fill(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    require_lantern(session, phrase, "You can only fill your lantern.")?;
    let font = session
        .room_here()
        .and_then(|r| r.font_at(session.player.location.pos))
        .map(str::to_string)
        .ok_or_else(|| CommandError::precondition("There's no font here."))?;
    session.player.oil.refill();
    session.checkpoint = session.player.location.clone();
    info!(
        "lantern refilled at {} in {}; checkpoint set",
        font, session.player.location.room
    );
    Ok(Outcome::say(format!(
        "You refill your lantern at the {}. The flame burns bright once more.",
        font
    )))
}

fn shine(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    require_lantern(session, phrase, "Only your lantern can shine.")?;
    if session.player.oil.is_empty() {
        return Err(CommandError::precondition(
            "Your lantern is dry. There is no light to shine.",
        ));
    }
    let active = session.active_attunement();
    let here = session.player.location.pos;
    let room = session
        .world
        .room_mut(&session.player.location.room)
        .ok_or(CommandError::TargetNotFound)?;

    let locked: Vec<usize> = room
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e.kind, EntityKind::Barrier { .. }) && here.within_reach(e.pos))
        .filter(|(_, e)| e.blocks_movement())
        .map(|(i, _)| i)
        .collect();
    if locked.is_empty() {
        let any_barrier = room.entities.iter().any(|e| {
            matches!(e.kind, EntityKind::Barrier { .. }) && here.within_reach(e.pos)
        });
        return Err(CommandError::precondition(if any_barrier {
            "The barrier is already open."
        } else {
            "Your light falls on bare stone."
        }));
    }

    let matching = locked.into_iter().find(|&i| {
        matches!(room.entities[i].kind, EntityKind::Barrier { attunement, .. } if Some(attunement) == active)
    });
    let Some(index) = matching else {
        return Err(CommandError::precondition("Nothing happens."));
    };
    let mut hue = "";
    if let EntityKind::Barrier { attunement, state } = &mut room.entities[index].kind {
        *state = LockState::Unlocked;
        hue = attunement.name();
    }
    charge(session);
    info!("{} barrier opened in {}", hue, session.player.location.room);
    Ok(Outcome::say(format!(
        "Your {} light washes over the barrier. The seal dissolves!",
        hue
    )))
}

fn soothe(session: &mut Session, phrase: &str) -> Result<Outcome, CommandError> {
    let here = session.player.location.pos;
    let (index, name, wanted) = {
        let room = session.room_here().ok_or(CommandError::TargetNotFound)?;
        let spirits: Vec<usize> = room
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.kind, EntityKind::Spirit { .. }) && e.answers_to(phrase))
            .map(|(i, _)| i)
            .collect();
        if spirits.is_empty() {
            locate(session, phrase, false)?;
            return Err(CommandError::precondition("That isn't something you can soothe."));
        }
        let near: Vec<usize> = spirits
            .into_iter()
            .filter(|&i| here.within_reach(room.entities[i].pos))
            .collect();
        if near.is_empty() {
            return Err(CommandError::precondition(
                "The spirit is too far away. Move closer.",
            ));
        }
        let hostile = near.into_iter().find_map(|i| match &room.entities[i].kind {
            EntityKind::Spirit {
                name,
                attunement,
                state: SpiritState::Hostile,
            } => Some((i, name.clone(), *attunement)),
            _ => None,
        });
        hostile.ok_or_else(|| CommandError::precondition("The spirit is already at peace."))?
    };

    if session.active_attunement() != Some(wanted) {
        let penalty = session.options.costs.spirit_penalty;
        session.player.oil.drain(penalty);
        info!("{} lashed out; lost {} oil", name, penalty);
        return Ok(Outcome::say(format!(
            "The {} recoils from your light and lashes out! Your flame gutters as oil boils away.",
            name
        )));
    }

    if let Some(entity) = session
        .world
        .room_mut(&session.player.location.room)
        .and_then(|r| r.entities.get_mut(index))
    {
        if let EntityKind::Spirit { state, .. } = &mut entity.kind {
            *state = SpiritState::Soothed;
        }
    }
    charge(session);
    info!("{} soothed in {}", name, session.player.location.room);
    Ok(Outcome::say(format!(
        "The {} quiets in your {} light and fades into peace.",
        name,
        wanted.name()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cathedral::parser::parse_command;
    use crate::cathedral::session::{Location, SessionOptions};
    use crate::cathedral::types::{Attunement, Difficulty, Item};
    use crate::cathedral::world::{Room, World};

    fn chapel() -> World {
        World::new(vec![Room::new(
            "chapel",
            "Chapel",
            "A small chapel.",
            &["▓▓▒▓▓▓", "▓    ▓", "▓    ▓", "▓    ▓", "▓▓▓▓▓▓"],
        )
        .with_entity(
            Position::new(0, 2),
            EntityKind::Barrier {
                attunement: Attunement::Silver,
                state: LockState::Locked,
            },
        )
        .with_entity(
            Position::new(3, 4),
            EntityKind::Spirit {
                name: "Weeping Sorrow".into(),
                attunement: Attunement::Prayer,
                state: SpiritState::Hostile,
            },
        )
        .with_entity(
            Position::new(3, 1),
            EntityKind::Font {
                name: "Ancient Font".into(),
            },
        )
        .with_item(
            Position::new(2, 2),
            Item::geode(2, "Prayer Geode", Attunement::Prayer),
        )
        .with_item(
            Position::new(1, 4),
            Item::geode(3, "Silver Geode", Attunement::Silver),
        )])
    }

    fn session_at(pos: Position) -> Session {
        Session::with_world(
            chapel(),
            Location::new("chapel", pos),
            vec![Item::lore(1, "Worn Scroll", "scroll", "worn_scroll")],
            SessionOptions::new(Difficulty::Hard),
        )
        .expect("room exists")
    }

    fn run(s: &mut Session, line: &str) -> Result<Outcome, CommandError> {
        let cmd = parse_command(line)?.expect("not blank");
        execute(s, &cmd)
    }

    #[test]
    fn take_within_reach_charges_command_cost() {
        let mut s = session_at(Position::new(1, 2));
        let out = run(&mut s, "take prayer geode").expect("takes");
        assert_eq!(out.message, "You take the Prayer Geode.");
        assert!(s.player.inventory.contains(ItemId(2)));
        let room = s.room_here().unwrap();
        assert!(room.entities.iter().all(|e| e.item().map(|i| i.id) != Some(ItemId(2))));
        assert!((s.player.oil.level() - 99.7).abs() < 1e-9);
    }

    #[test]
    fn take_out_of_reach_changes_nothing() {
        let mut s = session_at(Position::new(1, 1));
        let err = run(&mut s, "take silver geode").unwrap_err();
        assert_eq!(err.to_string(), "The Silver Geode is out of reach.");
        assert!(!s.player.inventory.contains(ItemId(3)));
        assert_eq!(s.player.oil.level(), 100.0);
    }

    #[test]
    fn drop_clears_matching_attunement() {
        let mut s = session_at(Position::new(2, 2));
        run(&mut s, "take geode").expect("takes");
        run(&mut s, "use geode").expect("attunes");
        assert_eq!(s.active_attunement(), Some(Attunement::Prayer));
        run(&mut s, "drop geode").expect("drops");
        assert_eq!(s.player.attunement, None);
    }

    #[test]
    fn drop_unheld_item_reports_not_carrying() {
        let mut s = session_at(Position::new(2, 2));
        assert_eq!(run(&mut s, "drop geode"), Err(CommandError::NotCarrying));
        assert_eq!(run(&mut s, "drop widget"), Err(CommandError::TargetNotFound));
    }

    #[test]
    fn read_records_lore_once() {
        let mut s = session_at(Position::new(2, 2));
        let out = run(&mut s, "read scroll").expect("reads");
        assert!(out.message.starts_with("== The Worn Scroll =="));
        run(&mut s, "read parchment").expect("reads again");
        assert_eq!(s.journal, vec!["worn_scroll".to_string()]);
    }

    #[test]
    fn fill_needs_font_and_sets_checkpoint() {
        let mut s = session_at(Position::new(2, 2));
        s.player.oil.drain(60.0);
        assert!(matches!(run(&mut s, "fill lantern"), Err(CommandError::PreconditionFailed(_))));
        assert_eq!(s.player.oil.level(), 40.0);

        s.player.location.pos = Position::new(3, 1);
        run(&mut s, "fill lamp").expect("fills");
        assert_eq!(s.player.oil.level(), 100.0);
        assert_eq!(s.checkpoint.pos, Position::new(3, 1));
    }

    #[test]
    fn shine_needs_matching_attunement() {
        let mut s = session_at(Position::new(1, 3));
        assert!(run(&mut s, "shine lantern").is_err());
        run(&mut s, "take silver geode").expect("takes");
        let before = s.player.oil.level();
        assert!(run(&mut s, "shine").is_err(), "not yet attuned");
        assert_eq!(s.player.oil.level(), before);

        s.player.location.pos = Position::new(1, 2);
        run(&mut s, "use silver geode").expect("attunes");
        run(&mut s, "shine lantern").expect("opens");
        assert!(!s.room_here().unwrap().entities[0].blocks_movement());
        assert_eq!(
            run(&mut s, "shine lantern").unwrap_err().to_string(),
            "The barrier is already open."
        );
    }

    #[test]
    fn wrong_attunement_costs_the_spirit_penalty() {
        let mut s = session_at(Position::new(2, 3));
        let out = run(&mut s, "soothe spirit").expect("resolves");
        assert!(out.message.contains("lashes out"));
        assert_eq!(s.player.oil.level(), 95.0);
        assert!(s.room_here().unwrap().entities[1].blocks_movement());
    }

    #[test]
    fn matching_attunement_soothes() {
        let mut s = session_at(Position::new(2, 3));
        run(&mut s, "take prayer geode").expect("takes");
        run(&mut s, "use geode").expect("attunes");
        run(&mut s, "calm sorrow").expect("soothes");
        assert!(!s.room_here().unwrap().entities[1].blocks_movement());
        assert_eq!(
            run(&mut s, "soothe spirit").unwrap_err().to_string(),
            "The spirit is already at peace."
        );
    }

    #[test]
    fn meta_commands_are_free() {
        let mut s = session_at(Position::new(2, 2));
        run(&mut s, "help").expect("help");
        run(&mut s, "inventory").expect("inventory");
        let out = run(&mut s, "save 2").expect("save");
        assert_eq!(out.request, Some(Request::Save(Some(2))));
        assert_eq!(s.player.oil.level(), 100.0);
        assert!(run(&mut s, "load x").is_err());
    }
}
