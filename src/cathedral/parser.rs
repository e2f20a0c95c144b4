//! Verb-noun command parsing for the paused command phase, plus the
//! movement shorthand accepted while exploring.
//!
//! Parsing only normalises words. Whether a noun names anything is decided by
//! the resolver against the current room and inventory.

use super::errors::CommandError;
use super::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Take,
    Drop,
    Use,
    Read,
    Fill,
    Shine,
    Soothe,
    Help,
    Inventory,
    Save,
    Load,
    Quit,
}

impl Verb {
    fn from_word(word: &str) -> Option<Verb> {
        let verb = match word {
            "TAKE" | "GET" | "PICK" | "GRAB" => Verb::Take,
            "DROP" | "LEAVE" | "PLACE" => Verb::Drop,
            "USE" | "ACTIVATE" | "EMPLOY" => Verb::Use,
            "READ" | "EXAMINE" | "LOOK" => Verb::Read,
            "FILL" | "REFILL" => Verb::Fill,
            "SHINE" | "LIGHT" | "ILLUMINATE" => Verb::Shine,
            "SOOTHE" | "CALM" | "COMFORT" => Verb::Soothe,
            "HELP" | "COMMANDS" | "?" => Verb::Help,
            "I" | "INV" | "INVENTORY" => Verb::Inventory,
            "SAVE" | "SAVEGAME" => Verb::Save,
            "LOAD" | "LOADGAME" => Verb::Load,
            "Q" | "QUIT" | "EXIT" => Verb::Quit,
            _ => return None,
        };
        Some(verb)
    }

    /// Noun assumed when none is typed. `None` means the verb stands alone
    /// or needs an explicit target.
    fn default_target(self) -> Option<&'static str> {
        match self {
            Verb::Fill | Verb::Shine => Some("LANTERN"),
            Verb::Soothe => Some("SPIRIT"),
            _ => None,
        }
    }

    fn needs_target(self) -> bool {
        matches!(self, Verb::Take | Verb::Drop | Verb::Use | Verb::Read)
    }

    pub fn label(self) -> &'static str {
        match self {
            Verb::Take => "Take",
            Verb::Drop => "Drop",
            Verb::Use => "Use",
            Verb::Read => "Read",
            Verb::Fill => "Fill",
            Verb::Shine => "Shine",
            Verb::Soothe => "Soothe",
            Verb::Help => "Help",
            Verb::Inventory => "Inventory",
            Verb::Save => "Save",
            Verb::Load => "Load",
            Verb::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    /// Upper-cased noun phrase with synonyms folded to their canonical word.
    pub target: Option<String>,
}

/// Fold a single noun synonym onto the word entities answer to.
fn canonical_noun(word: &str) -> &str {
    match word {
        "LAMP" | "LIGHT" => "LANTERN",
        "PAPER" | "PARCHMENT" => "SCROLL",
        "CRYSTAL" | "STONE" => "GEODE",
        "GHOST" | "SORROW" => "SPIRIT",
        "FOUNTAIN" | "BASIN" => "FONT",
        "GATE" | "PASSAGE" => "DOOR",
        "SEAL" => "BARRIER",
        "SIGN" | "RUNES" | "CARVING" => "INSCRIPTION",
        other => other,
    }
}

const FILLER: [&str; 5] = ["THE", "A", "AN", "AT", "UP"];

/// Accepted ahead of a direction while exploring (`go north`).
const MOVE_WORDS: [&str; 3] = ["GO", "MOVE", "WALK"];

/// Parse one submitted command line.
///
/// `Ok(None)` for a blank line, which cancels the command phase.
pub fn parse_command(input: &str) -> Result<Option<Command>, CommandError> {
    let upper = input.trim().to_uppercase();
    let mut words = upper.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };
    if MOVE_WORDS.contains(&first) {
        return Err(CommandError::precondition(
            "Movement isn't a command. Press Enter to resume, then type N, S, E or W.",
        ));
    }
    let verb = Verb::from_word(first).ok_or(CommandError::UnrecognizedCommand)?;

    let rest: Vec<&str> = words.filter(|w| !FILLER.contains(w)).collect();
    let target = match rest.as_slice() {
        [] => None,
        [single] => Some(canonical_noun(single).to_string()),
        many => Some(many.join(" ")),
    };

    let target = match target {
        Some(t) => Some(t),
        None if verb.needs_target() => {
            return Err(CommandError::MissingTarget(verb.label().to_string()))
        }
        None => verb.default_target().map(str::to_string),
    };

    Ok(Some(Command { verb, target }))
}

/// Movement typed while exploring: direction words (`north east`) or a run of
/// compass letters (`nnee`). Each direction is one tick. `None` when the line
/// is anything else.
pub fn parse_movement(input: &str) -> Option<Vec<Direction>> {
    let mut words = input.split_whitespace().peekable();
    if words
        .peek()
        .is_some_and(|w| MOVE_WORDS.contains(&w.to_uppercase().as_str()))
    {
        words.next();
    }
    let mut steps = Vec::new();
    for word in words {
        if let Some(dir) = Direction::parse(word) {
            steps.push(dir);
            continue;
        }
        for c in word.chars() {
            steps.push(Direction::parse(c.encode_utf8(&mut [0u8; 4]))?);
        }
    }
    if steps.is_empty() {
        None
    } else {
        Some(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Command {
        parse_command(input)
            .expect("parses")
            .expect("not blank")
    }

    #[test]
    fn verb_synonyms_fold() {
        assert_eq!(parse("grab scroll").verb, Verb::Take);
        assert_eq!(parse("pick up scroll").verb, Verb::Take);
        assert_eq!(parse("examine runes").verb, Verb::Read);
        assert_eq!(parse("calm ghost").verb, Verb::Soothe);
        assert_eq!(parse("refill").verb, Verb::Fill);
        assert_eq!(parse("i").verb, Verb::Inventory);
    }

    #[test]
    fn noun_synonyms_fold() {
        assert_eq!(parse("read parchment").target.as_deref(), Some("SCROLL"));
        assert_eq!(parse("take crystal").target.as_deref(), Some("GEODE"));
        assert_eq!(parse("soothe sorrow").target.as_deref(), Some("SPIRIT"));
        assert_eq!(parse("fill lamp").target.as_deref(), Some("LANTERN"));
        assert_eq!(parse("read the sign").target.as_deref(), Some("INSCRIPTION"));
    }

    #[test]
    fn multi_word_names_are_kept_whole() {
        let cmd = parse("use Prayer Geode");
        assert_eq!(cmd.verb, Verb::Use);
        assert_eq!(cmd.target.as_deref(), Some("PRAYER GEODE"));
    }

    #[test]
    fn defaults_fill_in_missing_nouns() {
        assert_eq!(parse("shine").target.as_deref(), Some("LANTERN"));
        assert_eq!(parse("light").target.as_deref(), Some("LANTERN"));
        assert_eq!(parse("soothe").target.as_deref(), Some("SPIRIT"));
        assert_eq!(parse("help").target, None);
        assert_eq!(parse("save").target, None);
        assert_eq!(parse("save 3").target.as_deref(), Some("3"));
    }

    #[test]
    fn missing_noun_is_reported_per_verb() {
        assert_eq!(
            parse_command("take"),
            Err(CommandError::MissingTarget("Take".into()))
        );
        assert_eq!(
            parse_command("read the").unwrap_err().to_string(),
            "Read what?"
        );
    }

    #[test]
    fn unknown_verb_and_blank_line() {
        assert_eq!(
            parse_command("dance wildly"),
            Err(CommandError::UnrecognizedCommand)
        );
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn go_is_a_movement_word() {
        assert_eq!(
            parse_movement("go north"),
            Some(vec![Direction::North])
        );
        assert_eq!(
            parse_movement("Walk e e"),
            Some(vec![Direction::East, Direction::East])
        );
        assert_eq!(parse_movement("go"), None);
        assert_eq!(parse_movement("go scroll"), None);
        assert!(matches!(
            parse_command("go north"),
            Err(CommandError::PreconditionFailed(msg)) if msg.contains("N, S, E or W")
        ));
    }

    #[test]
    fn movement_shorthand() {
        use Direction::*;
        assert_eq!(parse_movement("n"), Some(vec![North]));
        assert_eq!(parse_movement("NNEE"), Some(vec![North, North, East, East]));
        assert_eq!(parse_movement("west south"), Some(vec![West, South]));
        assert_eq!(parse_movement("take scroll"), None);
        assert_eq!(parse_movement(""), None);
    }
}
