use thiserror::Error;

/// Why a typed command did nothing. Every variant is shown to the player as a
/// single line and leaves the world untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First word is not a known verb.
    #[error("I don't understand that command.")]
    UnrecognizedCommand,

    /// Verb needs a noun and none was given; carries the verb as typed.
    #[error("{0} what?")]
    MissingTarget(String),

    /// Noun names nothing in the inventory or the current room.
    #[error("You don't see that here.")]
    TargetNotFound,

    /// DROP of something the player does not hold.
    #[error("You're not carrying that.")]
    NotCarrying,

    #[error("Your inventory is full.")]
    InventoryFull,

    /// Target exists but the action can't apply (wrong attunement, no font, out of reach...).
    #[error("{0}")]
    PreconditionFailed(String),
}

impl CommandError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        CommandError::PreconditionFailed(msg.into())
    }
}

/// Errors raised by the save slot store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing saved in the requested slot yet.
    #[error("save slot {0} is empty")]
    SlotEmpty(String),

    #[error("invalid save slot {requested}: choose 1-{max}")]
    InvalidSlot { requested: u8, max: u8 },

    #[error("save schema mismatch: expected {expected}, got {found}")]
    SchemaMismatch { expected: u8, found: u8 },

    /// Save references a room the current world does not have.
    #[error("unknown room in save: {0}")]
    UnknownRoom(String),

    #[error("save holds {held} items but the satchel only has {max} slots")]
    InventoryOverflow { held: usize, max: usize },

    /// Same item id carried twice, or carried while still lying in a room.
    #[error("item {0} appears more than once in save")]
    DuplicateItem(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_player_facing() {
        assert_eq!(
            CommandError::UnrecognizedCommand.to_string(),
            "I don't understand that command."
        );
        assert_eq!(
            CommandError::MissingTarget("Take".into()).to_string(),
            "Take what?"
        );
        assert_eq!(
            CommandError::precondition("Nothing happens.").to_string(),
            "Nothing happens."
        );
    }
}
