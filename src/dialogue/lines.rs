//! Named dialogue lines spoken by customers, with per-key fallbacks.
use std::{collections::BTreeMap, fmt};

/// Well-known dialogue tags a customer can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DialogueKey {
    Buying,
    Selling,
    PriceRaised,
    PriceLowered,
    Acceptance,
    Denial,
}

impl DialogueKey {
    pub const ALL: [DialogueKey; 6] = [
        Self::Buying,
        Self::Selling,
        Self::PriceRaised,
        Self::PriceLowered,
        Self::Acceptance,
        Self::Denial,
    ];

    /// Tag as written in configuration files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Buying => "Buying",
            Self::Selling => "Selling",
            Self::PriceRaised => "Price Raised",
            Self::PriceLowered => "Price Lowered",
            Self::Acceptance => "Acceptance",
            Self::Denial => "Denial",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.tag() == tag.trim())
    }

    /// Line shown when a customer has no entry for this key.
    pub fn fallback(self) -> &'static str {
        match self {
            Self::Buying => "I'd like to buy this.",
            Self::Selling => "Would you buy this from me?",
            Self::PriceRaised => "Okay, I guess I can adjust my offer.",
            Self::PriceLowered => "Fine, I'll lower my price.",
            Self::Acceptance => "Deal!",
            Self::Denial => "No thanks, I changed my mind.",
        }
    }

    /// Line every customer starts with unless configuration overrides it.
    fn stock_line(self) -> &'static str {
        match self {
            Self::Buying => "This thing looks pretty cool... I'll take it.",
            Self::Selling => "Found this in my attic. Interested?",
            Self::PriceRaised => "Okay, I guess I can pay a bit more.",
            Self::PriceLowered => "You make a fair point. I'll give you a better offer.",
            Self::Acceptance => "Deal! Here's the money.",
            Self::Denial => "No thanks, I changed my mind.",
        }
    }
}

impl fmt::Display for DialogueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Mapping from dialogue keys to the text a customer says.
///
/// Lookups never fail: `line` falls back to [`DialogueKey::fallback`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueLines {
    lines: BTreeMap<DialogueKey, String>,
}

impl DialogueLines {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn stock() -> Self {
        let lines = DialogueKey::ALL
            .into_iter()
            .map(|key| (key, key.stock_line().to_string()))
            .collect();
        Self { lines }
    }

    /// Builds stock lines overridden by configured entries.
    ///
    /// Returns the tags that did not match any [`DialogueKey`].
    pub fn from_config(raw: BTreeMap<String, String>) -> (Self, Vec<String>) {
        let mut lines = Self::stock();
        let mut unknown = Vec::new();
        for (tag, text) in raw {
            match DialogueKey::from_tag(&tag) {
                Some(key) => lines.insert(key, text),
                None => unknown.push(tag),
            }
        }
        (lines, unknown)
    }

    pub fn insert(&mut self, key: DialogueKey, text: impl Into<String>) {
        self.lines.insert(key, text.into());
    }

    pub fn remove(&mut self, key: DialogueKey) -> Option<String> {
        self.lines.remove(&key)
    }

    pub fn get(&self, key: DialogueKey) -> Option<&str> {
        self.lines.get(&key).map(String::as_str)
    }

    pub fn line(&self, key: DialogueKey) -> &str {
        self.get(key).unwrap_or_else(|| key.fallback())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
