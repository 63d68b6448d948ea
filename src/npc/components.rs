//! Customer components and supporting resources.
use std::fmt;

use bevy::prelude::*;

use crate::dialogue::lines::DialogueLines;

/// Unique identifier for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub struct NpcId(u64);

impl NpcId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NPC-{:04}", self.0)
    }
}

/// Name shown in dialogue and logs.
#[derive(Component, Debug, Clone)]
pub struct Identity {
    pub id: NpcId,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: NpcId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Trade-facing data for a customer standing at the counter.
#[derive(Component, Debug, Clone)]
pub struct ShopNpc {
    wait_time_at_counter: f32,
    pub item_price: f32,
    is_buyer: bool,
    barter_step: f32,
    pub dialogue_lines: DialogueLines,
}

/// Price before and after a barter round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub previous: f32,
    pub current: f32,
}

impl ShopNpc {
    pub fn new(wait_time_at_counter: f32, item_price: f32, is_buyer: bool) -> Self {
        Self {
            wait_time_at_counter: wait_time_at_counter.max(0.0),
            item_price: item_price.max(0.0),
            is_buyer,
            barter_step: 0.0,
            dialogue_lines: DialogueLines::stock(),
        }
    }

    /// Fraction by which each barter round moves the price in the shop's favour.
    pub fn with_barter_step(mut self, step: f32) -> Self {
        self.barter_step = step.clamp(0.0, 1.0);
        self
    }

    pub fn with_lines(mut self, lines: DialogueLines) -> Self {
        self.dialogue_lines = lines;
        self
    }

    pub fn wait_time_at_counter(&self) -> f32 {
        self.wait_time_at_counter
    }

    pub fn is_buyer(&self) -> bool {
        self.is_buyer
    }

    /// Barter hook: buyers raise their offer, sellers lower their asking price.
    pub fn barter_price_change(&mut self) -> PriceChange {
        let previous = self.item_price;
        let factor = if self.is_buyer {
            1.0 + self.barter_step
        } else {
            1.0 - self.barter_step
        };
        self.item_price = (previous * factor).max(0.0);
        PriceChange {
            previous,
            current: self.item_price,
        }
    }
}

/// Resource that issues monotonically increasing customer ids.
#[derive(Resource, Default)]
pub struct NpcIdGenerator {
    next: u64,
}

impl NpcIdGenerator {
    pub fn next_id(&mut self) -> NpcId {
        let id = self.next;
        self.next += 1;
        NpcId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buyers_raise_and_sellers_lower() {
        let mut buyer = ShopNpc::new(2.0, 10.0, true).with_barter_step(0.1);
        let change = buyer.barter_price_change();
        assert_eq!(change.previous, 10.0);
        assert!((change.current - 11.0).abs() < 1e-5);

        let mut seller = ShopNpc::new(2.0, 10.0, false).with_barter_step(0.1);
        seller.barter_price_change();
        assert!((seller.item_price - 9.0).abs() < 1e-5);
    }

    #[test]
    fn zero_step_leaves_price_untouched() {
        let mut npc = ShopNpc::new(2.0, 10.0, true);
        let change = npc.barter_price_change();
        assert_eq!(change.previous, change.current);
    }

    #[test]
    fn ids_are_sequential_and_formatted() {
        let mut ids = NpcIdGenerator::default();
        assert_eq!(ids.next_id(), NpcId::new(0));
        assert_eq!(ids.next_id().to_string(), "NPC-0001");
    }
}
