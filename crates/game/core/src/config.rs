/// Rule configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Damage percentage gained (or lost) per class advantage level.
    pub class_bonus_percent: i32,

    /// When false every tile counts as visible to every player.
    pub fog_of_war: bool,

    /// Floor applied to damage after reductions.
    pub minimum_damage: i32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Maximum number of player slots on a board.
    pub const MAX_PLAYERS: usize = 8;
    /// Maximum number of active modifiers a single unit may carry.
    pub const MAX_MODIFIERS_PER_UNIT: usize = 32;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CLASS_BONUS_PERCENT: i32 = 25;
    pub const DEFAULT_MINIMUM_DAMAGE: i32 = 0;

    pub fn new() -> Self {
        Self {
            class_bonus_percent: Self::DEFAULT_CLASS_BONUS_PERCENT,
            fog_of_war: true,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
        }
    }

    pub fn with_class_bonus_percent(mut self, percent: i32) -> Self {
        self.class_bonus_percent = percent;
        self
    }

    pub fn with_fog_of_war(mut self, enabled: bool) -> Self {
        self.fog_of_war = enabled;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
