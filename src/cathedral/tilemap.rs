//! Static room terrain. Parsed once from the map text; entities are overlaid
//! separately so the grid itself never changes.

use super::types::Position;

/// Terrain class of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
    Rubble,
    /// Door or barrier slot. Passable only when the entity on it is unlocked.
    Gate,
    DeepWater,
}

/// What the terrain alone says about entering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passability {
    Blocked,
    Gated,
    NeedsLight,
    Open,
}

impl Tile {
    /// Map legend. Entity markers and anything unknown read as floor.
    pub fn from_symbol(c: char) -> Tile {
        match c {
            '▓' => Tile::Wall,
            '█' => Tile::Rubble,
            '▒' => Tile::Gate,
            '≈' => Tile::DeepWater,
            _ => Tile::Floor,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Floor => ' ',
            Tile::Wall => '▓',
            Tile::Rubble => '█',
            Tile::Gate => '▒',
            Tile::DeepWater => '≈',
        }
    }

    pub fn passability(self) -> Passability {
        match self {
            Tile::Wall | Tile::Rubble => Passability::Blocked,
            Tile::Gate => Passability::Gated,
            Tile::DeepWater => Passability::NeedsLight,
            Tile::Floor => Passability::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    rows: Vec<Vec<Tile>>,
}

impl TileMap {
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let rows = lines
            .iter()
            .map(|line| line.as_ref().chars().map(Tile::from_symbol).collect())
            .collect();
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// `None` outside the grid, including past the end of a short row.
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.rows.get(pos.row)?.get(pos.col).copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some()
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }
}
