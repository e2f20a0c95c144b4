//! Text views: the room grid with a status panel beside it, the inventory
//! listing, and help.

use super::session::Session;
use super::types::{Mode, Position, INVENTORY_CAPACITY};
use super::world::Room;

const PLAYER_GLYPH: char = '☺';

/// One row per map line, entities and the player drawn over the terrain.
pub fn render_grid(room: &Room, player: Option<Position>) -> Vec<String> {
    room.map
        .rows()
        .iter()
        .enumerate()
        .map(|(r, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(|(c, tile)| {
                    let pos = Position::new(r, c);
                    if player == Some(pos) {
                        return PLAYER_GLYPH;
                    }
                    // Later entries in the table draw on top.
                    room.entities_at(pos)
                        .filter_map(|e| e.glyph())
                        .last()
                        .unwrap_or_else(|| tile.symbol())
                })
                .collect()
        })
        .collect()
}

pub fn status_panel(session: &Session) -> Vec<String> {
    let oil = session.player.oil;
    let geode = session
        .active_geode()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "None".to_string());
    let room = session
        .room_here()
        .map(|r| r.name.as_str())
        .unwrap_or("?");
    let mut lines = vec![
        room.to_string(),
        format!("Oil: {} ({})", oil, oil.warning().label()),
        format!("Geode: {}", geode),
        "Items:".to_string(),
    ];
    for (i, label) in session.player.inventory.slot_labels().iter().enumerate() {
        lines.push(format!(" {}. {}", i + 1, label));
    }
    lines.push(format!("Lore: {} found", session.journal.len()));
    if session.mode() == Mode::AwaitingCommand {
        lines.push("[paused] > ".to_string());
    }
    lines
}

/// Grid and status panel side by side.
pub fn render_view(session: &Session) -> String {
    let Some(room) = session.room_here() else {
        return status_panel(session).join("\n");
    };
    let grid = render_grid(room, Some(session.player.location.pos));
    let panel = status_panel(session);
    let width = room.map.width();
    let height = grid.len().max(panel.len());
    let mut out = String::new();
    for i in 0..height {
        let left = grid.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(left.chars().count());
        out.push_str(left);
        out.extend(std::iter::repeat(' ').take(pad));
        if let Some(right) = panel.get(i) {
            out.push_str("  ");
            out.push_str(right);
        }
        out.push('\n');
    }
    out
}

pub fn inventory_listing(session: &Session) -> String {
    let mut out = format!(
        "You carry {} of {} items:",
        session.player.inventory.len(),
        INVENTORY_CAPACITY
    );
    for (i, label) in session.player.inventory.slot_labels().iter().enumerate() {
        out.push_str(&format!("\n {}. {}", i + 1, label));
        let attuned = session
            .player
            .inventory
            .iter()
            .nth(i)
            .map(|item| Some(item.id) == session.player.attunement)
            .unwrap_or(false);
        if attuned {
            out.push_str(" (in lantern)");
        }
    }
    out.push_str(&format!(
        "\nLantern: {} ({})",
        session.player.oil,
        session.player.oil.warning().label()
    ));
    out
}

pub fn help_text() -> &'static str {
    "Movement: N S E W (or NORTH, GO NORTH, or a run like NNEE). Each step burns oil.\n\
Press / then Enter to pause and type a command. A blank line cancels.\n\
Commands:\n\
  TAKE <item>     pick up something beside you\n\
  DROP <item>     set down something you carry\n\
  USE <item>      set a geode in your lantern, or turn a key\n\
  READ <thing>    read a scroll, tablet, or inscription\n\
  FILL LANTERN    refill at a font; the font becomes your waypoint\n\
  SHINE LANTERN   turn attuned light on a barrier\n\
  SOOTHE SPIRIT   calm a spirit with the right geode\n\
  INVENTORY (I), HELP, SAVE [n], LOAD [n], QUIT\n\
Map: ☺ you  ▓ wall  █ rubble  ▒ seal  ≈ deep water  F font  S spirit\n\
     G geode  K key  L lore"
}
