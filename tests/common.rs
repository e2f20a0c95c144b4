//! Test utilities & fixtures shared by the integration tests.

use lamplighter::cathedral::{
    parse_movement, Attunement, CommandError, Difficulty, EntityKind, Item, Location,
    LockState, MoveOutcome, Outcome, Position, Room, Session, SessionOptions, SpiritState,
    World,
};

/// Submit one command through the full two-phase path.
pub fn cmd(session: &mut Session, line: &str) -> Result<Outcome, CommandError> {
    session.begin_command();
    session
        .submit_command(line)
        .map(|o| o.expect("command line was not blank"))
}

/// Walk a run like `"NNEE"`, asserting every step went through.
#[allow(dead_code)]
pub fn walk(session: &mut Session, route: &str) {
    for dir in parse_movement(route).expect("route is all directions") {
        let outcome = session.step(dir);
        assert!(
            matches!(outcome, MoveOutcome::Moved | MoveOutcome::EnteredRoom(_)),
            "step {:?} from {:?} gave {:?}",
            dir,
            session.player.location,
            outcome
        );
    }
}

/// A single room with one of everything, all within a few steps:
///
/// ```text
/// ▓▓▒▓▓▓▓   barrier (silver) at 0,2
/// ▓     ▓
/// ▓ ≈≈  ▓   deep water at 2,2 and 2,3
/// ▓     ▓   font at 3,1, spirit (prayer) at 3,5
/// ▓▓▓▓▓▓▓
/// ```
#[allow(dead_code)]
pub fn shrine() -> World {
    World::new(vec![Room::new(
        "shrine",
        "Shrine",
        "A flooded shrine.",
        &["▓▓▒▓▓▓▓", "▓     ▓", "▓ ≈≈  ▓", "▓     ▓", "▓▓▓▓▓▓▓"],
    )
    .with_entity(
        Position::new(0, 2),
        EntityKind::Barrier {
            attunement: Attunement::Silver,
            state: LockState::Locked,
        },
    )
    .with_entity(
        Position::new(3, 1),
        EntityKind::Font {
            name: "Shrine Font".into(),
        },
    )
    .with_entity(
        Position::new(3, 5),
        EntityKind::Spirit {
            name: "Weeping Sorrow".into(),
            attunement: Attunement::Prayer,
            state: SpiritState::Hostile,
        },
    )
    .with_item(
        Position::new(1, 3),
        Item::geode(2, "Prayer Geode", Attunement::Prayer),
    )
    .with_item(
        Position::new(1, 4),
        Item::geode(3, "Silver Geode", Attunement::Silver),
    )
    .with_item(Position::new(1, 5), Item::key(4, "Iron Key"))])
}

#[allow(dead_code)]
pub fn shrine_session(difficulty: Difficulty, pos: Position) -> Session {
    Session::with_world(
        shrine(),
        Location::new("shrine", pos),
        vec![Item::lore(1, "Worn Scroll", "scroll", "worn_scroll")],
        SessionOptions::new(difficulty),
    )
    .expect("shrine exists")
}
