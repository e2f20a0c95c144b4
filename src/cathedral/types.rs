use serde::{Deserialize, Serialize};
use std::fmt;

/// Save blob schema version. Bump when `SaveData` changes shape.
pub const SAVE_SCHEMA_VERSION: u8 = 1;

/// Maximum number of items the Lamplighter can carry.
pub const INVENTORY_CAPACITY: usize = 4;

/// Full lantern, in percent.
pub const MAX_OIL: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Row/column delta for one step.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// Accepts `N`/`NORTH` style words in any case.
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_uppercase().as_str() {
            "N" | "NORTH" => Some(Direction::North),
            "S" | "SOUTH" => Some(Direction::South),
            "E" | "EAST" => Some(Direction::East),
            "W" | "WEST" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

/// Grid coordinate inside a room, row-major like the map text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// One step in `dir`; `None` when the step would leave the top or left edge.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Position { row, col })
    }

    /// True for the same cell or any of the eight neighbours.
    pub fn within_reach(self, other: Position) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Geode colours. A barrier or spirit answers only to its own attunement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Attunement {
    Prayer,
    Silver,
    Azure,
}

impl Attunement {
    pub fn name(self) -> &'static str {
        match self {
            Attunement::Prayer => "prayer",
            Attunement::Silver => "silver",
            Attunement::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Carries a lore catalog id; READ shows it.
    Lore(String),
    Geode(Attunement),
    Key,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Single keyword the parser matches besides the full name, e.g. `SCROLL`.
    pub noun: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn lore(id: u32, name: &str, noun: &str, lore_id: &str) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            noun: noun.to_uppercase(),
            kind: ItemKind::Lore(lore_id.to_string()),
        }
    }

    pub fn geode(id: u32, name: &str, attunement: Attunement) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            noun: "GEODE".to_string(),
            kind: ItemKind::Geode(attunement),
        }
    }

    pub fn key(id: u32, name: &str) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            noun: "KEY".to_string(),
            kind: ItemKind::Key,
        }
    }

    /// Exact match on the full name or the item's keyword. Expects an upper-cased phrase.
    pub fn answers_to(&self, phrase: &str) -> bool {
        self.name.to_uppercase() == phrase || self.noun == phrase
    }

    pub fn attunement(&self) -> Option<Attunement> {
        match self.kind {
            ItemKind::Geode(a) => Some(a),
            _ => None,
        }
    }

    pub fn lore_id(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Lore(id) => Some(id),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self.kind {
            ItemKind::Lore(_) => 'L',
            ItemKind::Geode(_) => 'G',
            ItemKind::Key => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpiritState {
    Hostile,
    Soothed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Item(Item),
    Font {
        name: String,
    },
    Barrier {
        attunement: Attunement,
        state: LockState,
    },
    Door {
        /// The key item that opens this door.
        key: ItemId,
        state: LockState,
    },
    Spirit {
        name: String,
        attunement: Attunement,
        state: SpiritState,
    },
    Inscription {
        lore: String,
    },
}

/// Something placed on a room cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub pos: Position,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(pos: Position, kind: EntityKind) -> Self {
        Self { pos, kind }
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Keywords the parser can use to name this entity.
    pub fn answers_to(&self, phrase: &str) -> bool {
        match &self.kind {
            EntityKind::Item(item) => item.answers_to(phrase),
            EntityKind::Font { name } => phrase == "FONT" || name.to_uppercase() == phrase,
            EntityKind::Barrier { .. } => phrase == "BARRIER",
            EntityKind::Door { .. } => phrase == "DOOR",
            EntityKind::Spirit { name, .. } => {
                phrase == "SPIRIT" || name.to_uppercase() == phrase
            }
            EntityKind::Inscription { .. } => phrase == "INSCRIPTION" || phrase == "RUNES",
        }
    }

    /// Name used in messages.
    pub fn label(&self) -> String {
        match &self.kind {
            EntityKind::Item(item) => item.name.clone(),
            EntityKind::Font { name } | EntityKind::Spirit { name, .. } => name.clone(),
            EntityKind::Barrier { .. } => "barrier".to_string(),
            EntityKind::Door { .. } => "door".to_string(),
            EntityKind::Inscription { .. } => "inscription".to_string(),
        }
    }

    /// Whether the cell under this entity refuses the player right now.
    pub fn blocks_movement(&self) -> bool {
        match &self.kind {
            EntityKind::Barrier { state, .. } | EntityKind::Door { state, .. } => {
                *state == LockState::Locked
            }
            EntityKind::Spirit { state, .. } => *state == SpiritState::Hostile,
            _ => false,
        }
    }

    /// Map glyph, or `None` when the entity leaves no mark (opened seals, soothed spirits).
    pub fn glyph(&self) -> Option<char> {
        match &self.kind {
            EntityKind::Item(item) => Some(item.glyph()),
            EntityKind::Font { .. } => Some('F'),
            EntityKind::Barrier { state, .. } | EntityKind::Door { state, .. } => match state {
                LockState::Locked => Some('▒'),
                LockState::Unlocked => None,
            },
            EntityKind::Spirit { state, .. } => match state {
                SpiritState::Hostile => Some('S'),
                SpiritState::Soothed => None,
            },
            EntityKind::Inscription { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Explorer,
    Story,
    Easy,
    #[default]
    Hard,
}

/// Oil costs for one difficulty level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DifficultySettings {
    pub move_cost: f64,
    pub command_cost: f64,
    pub spirit_penalty: f64,
}

impl Difficulty {
    pub fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Explorer => DifficultySettings {
                move_cost: 0.0,
                command_cost: 0.0,
                spirit_penalty: 0.1,
            },
            Difficulty::Story => DifficultySettings {
                move_cost: 0.01,
                command_cost: 0.005,
                spirit_penalty: 1.0,
            },
            Difficulty::Easy => DifficultySettings {
                move_cost: 0.1,
                command_cost: 0.05,
                spirit_penalty: 2.0,
            },
            Difficulty::Hard => DifficultySettings {
                move_cost: 0.5,
                command_cost: 0.3,
                spirit_penalty: 5.0,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Explorer => "Explorer Mode",
            Difficulty::Story => "Story Mode",
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "explorer" => Some(Difficulty::Explorer),
            "story" => Some(Difficulty::Story),
            "easy" => Some(Difficulty::Easy),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// The world pauses while the player types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Exploring,
    AwaitingCommand,
}
