//! Canonical Sunken Cathedral layout.
//!
//! Three rooms chained by seals: the entrance barrier answers to silver, the
//! sorrow guarding the reliquary to prayer, the nave door to the iron key
//! found in the reliquary, and the bell-ringer in the nave niche to azure.

use super::types::{
    Attunement, Direction, EntityKind, Item, ItemId, LockState, Position, SpiritState,
};
use super::world::{Room, World};

pub const START_ROOM_ID: &str = "entrance";
pub const START_POSITION: Position = Position::new(5, 10);

pub const WORN_SCROLL: ItemId = ItemId(1);
pub const PRAYER_GEODE: ItemId = ItemId(2);
pub const SILVER_GEODE: ItemId = ItemId(3);
pub const IRON_KEY: ItemId = ItemId(4);
pub const AZURE_GEODE: ItemId = ItemId(5);
pub const KEEPERS_LEDGER: ItemId = ItemId(6);
pub const SALT_TABLET: ItemId = ItemId(7);

const ENTRANCE_MAP: [&str; 9] = [
    "▓▓▓▓▓▓▓▓▓▓▒▓▓▓▓▓▓▓▓▓▓",
    "▓≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈▓",
    "▓                   ▓",
    "▓   ▓▓▓       ███   ▓",
    "▓                    ",
    "▓                   ▓",
    "▓                   ▓",
    "▓                   ▓",
    "▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓",
];

const NAVE_MAP: [&str; 9] = [
    "▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓",
    "▓        ▓       ▓  ▓",
    "▓        ▓       ▓  ▓",
    "▓        ▒          ▓",
    "▓▓▓▓▓▓▓▓▓▓≈≈≈≈≈≈≈▓▓▓▓",
    "▓▓▓▓▓▓▓▓▓▓≈≈≈≈≈≈≈≈≈≈▓",
    "▓                   ▓",
    "▓                   ▓",
    "▓▓▓▓▓▓▓▓▓▓ ▓▓▓▓▓▓▓▓▓▓",
];

const RELIQUARY_MAP: [&str; 9] = [
    "▓▓▓▓▓▓▓▓▓▓▓▓▓",
    "▓           ▓",
    "▓  █        ▓",
    "▓  █        ▓",
    "            ▓",
    "▓           ▓",
    "▓        ██ ▓",
    "▓           ▓",
    "▓▓▓▓▓▓▓▓▓▓▓▓▓",
];

/// Items the Lamplighter carries at the start.
pub fn starting_inventory() -> Vec<Item> {
    vec![Item::lore(WORN_SCROLL.0, "Worn Scroll", "scroll", "worn_scroll")]
}

pub fn canonical_world() -> World {
    let entrance = Room::new(
        START_ROOM_ID,
        "The Weeping Halls",
        "You enter through a fractured, rose-shaped window. The water here is \
unnaturally still, and the air, miraculously, is breathable. Bioluminescent moss \
casts a faint glow on carved reliefs of a forgotten sea god.",
        &ENTRANCE_MAP,
    )
    .with_entity(
        Position::new(0, 10),
        EntityKind::Barrier {
            attunement: Attunement::Silver,
            state: LockState::Locked,
        },
    )
    .with_entity(
        Position::new(4, 19),
        EntityKind::Spirit {
            name: "Weeping Sorrow".to_string(),
            attunement: Attunement::Prayer,
            state: SpiritState::Hostile,
        },
    )
    .with_entity(
        Position::new(7, 10),
        EntityKind::Font {
            name: "Ancient Font".to_string(),
        },
    )
    .with_entity(
        Position::new(5, 1),
        EntityKind::Inscription {
            lore: "entrance_sign".to_string(),
        },
    )
    .with_item(
        Position::new(6, 4),
        Item::geode(PRAYER_GEODE.0, "Prayer Geode", Attunement::Prayer),
    )
    .with_item(
        Position::new(2, 16),
        Item::geode(SILVER_GEODE.0, "Silver Geode", Attunement::Silver),
    )
    .with_exit(Direction::North, "nave", Position::new(8, 10))
    .with_exit(Direction::East, "reliquary", Position::new(4, 0))
    .with_ambient("Water drips rhythmically from the vaulted ceiling.")
    .with_ambient("The bioluminescent moss pulses with an otherworldly glow.")
    .with_ambient("An ancient silence fills this sacred space.")
    .with_ambient("The fractured rose window casts ethereal patterns on the walls.");

    let nave = Room::new(
        "nave",
        "The Drowned Nave",
        "Pews lie toppled beneath a skin of black water. A sealed chantry door \
stands to the west, and something stirs in a niche to the east.",
        &NAVE_MAP,
    )
    .with_entity(
        Position::new(3, 9),
        EntityKind::Door {
            key: IRON_KEY,
            state: LockState::Locked,
        },
    )
    .with_entity(
        Position::new(3, 17),
        EntityKind::Spirit {
            name: "Drowned Bell-Ringer".to_string(),
            attunement: Attunement::Azure,
            state: SpiritState::Hostile,
        },
    )
    .with_entity(
        Position::new(2, 4),
        EntityKind::Font {
            name: "Chantry Font".to_string(),
        },
    )
    .with_entity(
        Position::new(7, 3),
        EntityKind::Inscription {
            lore: "nave_inscription".to_string(),
        },
    )
    .with_item(
        Position::new(1, 1),
        Item::geode(AZURE_GEODE.0, "Azure Geode", Attunement::Azure),
    )
    .with_item(
        Position::new(1, 19),
        Item::lore(KEEPERS_LEDGER.0, "Keeper's Ledger", "ledger", "keepers_ledger"),
    )
    .with_exit(Direction::South, START_ROOM_ID, Position::new(0, 10))
    .with_ambient("A cracked bell tolls once, somewhere far below.")
    .with_ambient("Black water laps against the pews.");

    let reliquary = Room::new(
        "reliquary",
        "The Reliquary",
        "Niches line the walls, their relics long since carried off by the tide. \
Salt has crusted over everything that remains.",
        &RELIQUARY_MAP,
    )
    .with_item(Position::new(2, 9), Item::key(IRON_KEY.0, "Iron Key"))
    .with_item(
        Position::new(7, 2),
        Item::lore(SALT_TABLET.0, "Salt Tablet", "tablet", "salt_tablet"),
    )
    .with_exit(Direction::West, START_ROOM_ID, Position::new(4, 20))
    .with_ambient("Salt crystals glitter in your lantern light.");

    World::new(vec![entrance, nave, reliquary])
}
