use super::common::PlayerId;

/// Per-player resources that feed into the rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    id: PlayerId,
    mana: u32,
    alive: bool,
}

impl Player {
    pub fn new(id: PlayerId, mana: u32) -> Self {
        Self {
            id,
            mana,
            alive: true,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.mana >= cost
    }

    /// Deducts `cost`, returning false (and leaving the pool untouched) when
    /// the pool is too small.
    pub(crate) fn spend_mana(&mut self, cost: u32) -> bool {
        match self.mana.checked_sub(cost) {
            Some(rest) => {
                self.mana = rest;
                true
            }
            None => false,
        }
    }

    pub fn gain_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount);
    }

    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
    }
}
