//! Lore catalog. Items and inscriptions refer to entries by id; READ prints
//! the entry and records the id in the player's journal.

use super::cipher::encipher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoreLine {
    Plain(&'static str),
    /// Shown in runes.
    Carved(&'static str),
}

#[derive(Debug)]
pub struct LoreEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub lines: &'static [LoreLine],
}

use LoreLine::{Carved, Plain};

static CATALOG: &[LoreEntry] = &[
    LoreEntry {
        id: "worn_scroll",
        title: "The Worn Scroll",
        lines: &[
            Plain("From the final testament of Keeper Aldara Westmere,"),
            Plain("Last Lightkeeper of the Meridian Chain."),
            Plain("We are the Lamplighters, keepers of the Consecrated Flames."),
            Plain("Trust in the Light, for it is the only protection against"),
            Plain("the Drowned Sorrows. They can be calmed by one who carries"),
            Plain("the proper blessing."),
            Carved("The lights must never die"),
        ],
    },
    LoreEntry {
        id: "entrance_sign",
        title: "A Carved Sign",
        lines: &[Carved("Beware the deep")],
    },
    LoreEntry {
        id: "salt_tablet",
        title: "The Salt-Crusted Tablet",
        lines: &[
            Plain("A litany of the cathedral wardens, worn almost smooth:"),
            Carved("Silver opens the choir"),
            Carved("Azure stills the drowned bell"),
            Plain("Beneath, a tally of names, each struck through."),
        ],
    },
    LoreEntry {
        id: "nave_inscription",
        title: "Words Above the Nave Arch",
        lines: &[
            Carved("Light is the key and oil is the road"),
            Plain("Someone has scratched a lantern beside the runes."),
        ],
    },
    LoreEntry {
        id: "keepers_ledger",
        title: "The Keeper's Ledger",
        lines: &[
            Plain("Oil drawn from the reliquary font: eleven measures."),
            Plain("The bell-ringer did not return from the flooded stair."),
            Carved("Rest now"),
        ],
    },
];

pub fn lookup(id: &str) -> Option<&'static LoreEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

pub fn catalog() -> &'static [LoreEntry] {
    CATALOG
}

/// Title line followed by the text, carved lines enciphered.
pub fn render_entry(entry: &LoreEntry) -> String {
    let mut out = format!("== {} ==", entry.title);
    for line in entry.lines {
        out.push('\n');
        match line {
            Plain(text) => out.push_str(text),
            Carved(text) => out.push_str(&encipher(text)),
        }
    }
    out
}
