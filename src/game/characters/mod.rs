// Character system
//
// This module contains everything related to the playable shooter:
// - Character data structure and management
// - Tuning values for movement, camera, crosshair and combat
// - Follow camera with aim zoom and screen deprojection
// - Fire-rate gating and crosshair spread
// - Animation-facing state and montages

pub mod anim_instance;
pub mod camera;
pub mod character;
pub mod crosshair;
pub mod fire_control;
pub mod tuning;

// Re-export commonly used types
pub use anim_instance::{AnimMontage, AnimSnapshot, ShooterAnimInstance};
pub use camera::{CameraBoom, ControlRotation, FollowCamera, ShooterCamera};
pub use character::{
    CharacterId, CharacterManager, CrosshairTrace, FrameContext, ShooterCharacter,
    DEFAULT_VIEWPORT,
};
pub use crosshair::CrosshairSpread;
pub use fire_control::{FireControl, FireState};
pub use tuning::{CharacterTuning, CombatAssets, LookRates};
