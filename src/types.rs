use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque ID types (ULID strings, URL-safe)
pub type HatId = String;
pub type WordId = String;

pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Stored lifecycle phase of a hat. "Game over" is never stored, see [`Hat::is_game_over`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Init,
    Play,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    pub id: WordId,
    pub hat_id: HatId,
    pub text: String,
    #[serde(default)]
    pub guessed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hat {
    pub id: HatId,
    pub stage: Stage,
    /// Insertion order is kept so views list words the way they were entered
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Hat {
    /// Fresh hat in the word-entry stage
    pub fn new() -> Self {
        Self {
            id: new_id(),
            stage: Stage::Init,
            words: Vec::new(),
        }
    }

    /// Words not yet guessed
    pub fn words_inside(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| !w.guessed)
    }

    pub fn remaining(&self) -> usize {
        self.words_inside().count()
    }

    pub fn guessed(&self) -> usize {
        self.words.len() - self.remaining()
    }

    pub fn word(&self, word_id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == word_id)
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.words.iter().any(|w| w.text == text)
    }

    pub fn is_game_over(&self) -> bool {
        self.stage == Stage::Play && self.remaining() == 0
    }
}

impl Default for Hat {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Hat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Hat {}>", self.id)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Word {}: {}>", self.id, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(hat: &Hat, text: &str, guessed: bool) -> Word {
        Word {
            id: new_id(),
            hat_id: hat.id.clone(),
            text: text.to_string(),
            guessed,
        }
    }

    #[test]
    fn test_new_hat_is_empty_init() {
        let hat = Hat::new();
        assert_eq!(hat.stage, Stage::Init);
        assert!(hat.words.is_empty());
        assert_eq!(hat.id.len(), 26);
        assert!(!hat.is_game_over());
    }

    #[test]
    fn test_words_inside_skips_guessed() {
        let mut hat = Hat::new();
        hat.words.push(word(&hat, "cat", true));
        hat.words.push(word(&hat, "dog", false));

        let inside: Vec<_> = hat.words_inside().map(|w| w.text.as_str()).collect();
        assert_eq!(inside, vec!["dog"]);
        assert_eq!(hat.remaining(), 1);
        assert_eq!(hat.guessed(), 1);
    }

    #[test]
    fn test_game_over_requires_play_stage() {
        let mut hat = Hat::new();
        hat.words.push(word(&hat, "cat", true));
        assert!(!hat.is_game_over());

        hat.stage = Stage::Play;
        assert!(hat.is_game_over());
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Init).unwrap(), "\"init\"");
        assert_eq!(serde_json::to_string(&Stage::Play).unwrap(), "\"play\"");
    }

    #[test]
    fn test_display() {
        let hat = Hat::new();
        let w = word(&hat, "fish", false);
        assert_eq!(hat.to_string(), format!("<Hat {}>", hat.id));
        assert_eq!(w.to_string(), format!("<Word {}: fish>", w.id));
    }
}
