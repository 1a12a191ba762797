// Gameplay error types
//
// Missing optional references (sounds, particles, montages, sockets) are not
// errors: the gameplay code skips them silently. These variants cover world
// lookups and configuration validation only.

use crate::game::characters::CharacterId;
use crate::game::items::ItemId;

/// Errors surfaced by the game world and its configuration
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("Item {0} is not a weapon")]
    NotAWeapon(ItemId),

    #[error("Character {0} has no weapon equipped")]
    NoWeaponEquipped(CharacterId),

    #[error("Invalid tuning value for {field}: {reason}")]
    InvalidTuning { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        let err = GameError::UnknownItem(7);
        assert_eq!(err.to_string(), "Unknown item: 7");

        let err = GameError::InvalidTuning {
            field: "automatic_fire_rate",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid tuning value for automatic_fire_rate: must be positive"
        );
    }
}
