// src/ui/text_box/components.rs
//
// Text box state: progressive reveal, skip, and continue.

use bevy::prelude::*;

use crate::dialogue::session::TextContinuation;

const REVEAL_EPSILON: f32 = 1e-5;

/// Result of pressing the continue/skip trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTrigger {
    /// Box hidden or nothing to continue.
    Ignored,
    /// Reveal was cut short; the full line is now shown.
    Skipped,
    /// Player moved past the line; carries what the line was waiting for.
    Continued(Option<TextContinuation>),
}

/// Modal text surface shared by negotiations and standalone messages.
///
/// Characters are revealed one per `seconds_per_char`; a line of `n`
/// characters is fully shown after `n * seconds_per_char`.
#[derive(Resource, Debug, Clone)]
pub struct TextBox {
    visible: bool,
    full_text: String,
    char_count: usize,
    revealed: usize,
    elapsed: f32,
    seconds_per_char: f32,
    use_typewriter: bool,
    typing: bool,
    can_continue: bool,
    continuation: Option<TextContinuation>,
    speaker: Option<String>,
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new(0.05, true)
    }
}

impl TextBox {
    pub fn new(seconds_per_char: f32, use_typewriter: bool) -> Self {
        Self {
            visible: false,
            full_text: String::new(),
            char_count: 0,
            revealed: 0,
            elapsed: 0.0,
            seconds_per_char: seconds_per_char.max(0.0),
            use_typewriter,
            typing: false,
            can_continue: false,
            continuation: None,
            speaker: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_speaker(&mut self, speaker: Option<String>) {
        self.speaker = speaker;
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_typewriter_speed(&mut self, seconds_per_char: f32) {
        self.seconds_per_char = seconds_per_char.max(0.0);
    }

    /// Starts revealing `text`. Any line still on screen is superseded and
    /// its continuation dropped without being returned.
    pub fn display_text(&mut self, text: impl Into<String>, continuation: Option<TextContinuation>) {
        self.full_text = text.into();
        self.char_count = self.full_text.chars().count();
        self.continuation = continuation;
        self.can_continue = false;
        self.elapsed = 0.0;

        if !self.use_typewriter || self.seconds_per_char <= 0.0 || self.char_count == 0 {
            self.complete_typing();
            return;
        }

        self.typing = true;
        self.revealed = 1;
    }

    /// Empties the box and drops whatever the line was waiting for.
    pub fn clear_text(&mut self) {
        self.full_text.clear();
        self.char_count = 0;
        self.revealed = 0;
        self.typing = false;
        self.can_continue = false;
        self.continuation = None;
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        if !self.typing {
            return;
        }

        self.elapsed += delta_seconds.max(0.0);
        let total = self.char_count as f32 * self.seconds_per_char;
        if self.elapsed + REVEAL_EPSILON >= total {
            self.complete_typing();
            return;
        }

        let shown = ((self.elapsed + REVEAL_EPSILON) / self.seconds_per_char).floor() as usize + 1;
        self.revealed = shown.min(self.char_count);
    }

    /// Skip while typing, continue once the line is complete.
    pub fn trigger(&mut self) -> TextTrigger {
        if !self.visible {
            return TextTrigger::Ignored;
        }
        if self.typing {
            self.complete_typing();
            return TextTrigger::Skipped;
        }
        if self.can_continue {
            self.can_continue = false;
            return TextTrigger::Continued(self.continuation.take());
        }
        TextTrigger::Ignored
    }

    fn complete_typing(&mut self) {
        self.typing = false;
        self.revealed = self.char_count;
        self.can_continue = true;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn can_continue(&self) -> bool {
        self.can_continue
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Portion of the current line revealed so far.
    pub fn visible_text(&self) -> &str {
        match self.full_text.char_indices().nth(self.revealed) {
            Some((byte_index, _)) => &self.full_text[..byte_index],
            None => &self.full_text,
        }
    }
}

/// Root node of the text box panel.
#[derive(Component, Debug)]
pub struct TextBoxRoot;

/// Speaker name line.
#[derive(Component, Debug)]
pub struct TextBoxSpeaker;

/// Body text being revealed.
#[derive(Component, Debug)]
pub struct TextBoxBody;

/// "Press Space to continue" hint.
#[derive(Component, Debug)]
pub struct ContinuePrompt;
