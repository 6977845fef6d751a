//! Hat lifecycle and word pool operations.
//!
//! Everything here works on an in-memory [`Hat`] and never touches the
//! store. Calling an action in the wrong stage is not an error: each
//! operation returns an outcome that tells the caller where to send the
//! player next.

use crate::random::RandomSource;
use crate::types::*;
use std::collections::HashSet;

/// Characters that separate words in a submission (runs collapse)
const SEPARATORS: [char; 4] = [' ', ',', '\n', '\r'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Hat was already in play; nothing changed
    AlreadyPlaying,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddWordsOutcome {
    /// Words actually inserted, in input order (may be empty)
    Added(Vec<Word>),
    /// Hat is in play; submission ignored
    AlreadyStarted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    Word(Word),
    /// Nothing left inside: the game is over
    Empty,
    /// Hat still collecting words
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Guessed,
    AlreadyGuessed,
    /// Word id belongs to another hat (stale or cross-session click)
    NotInHat,
    NotReady,
}

/// Split raw form text into trimmed, non-empty tokens
pub fn split_words(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Move a hat from word entry into play. One-way.
pub fn start(hat: &mut Hat) -> StartOutcome {
    match hat.stage {
        Stage::Init => {
            hat.stage = Stage::Play;
            StartOutcome::Started
        }
        Stage::Play => StartOutcome::AlreadyPlaying,
    }
}

/// Add every new token of `raw` to the hat.
///
/// Tokens are compared by exact text against all words already in the hat
/// (guessed ones included) and against earlier tokens of the same
/// submission.
pub fn add_words(hat: &mut Hat, raw: &str) -> AddWordsOutcome {
    if hat.stage != Stage::Init {
        return AddWordsOutcome::AlreadyStarted;
    }

    let mut seen: HashSet<String> = hat.words.iter().map(|w| w.text.clone()).collect();
    let mut added = Vec::new();

    for token in split_words(raw) {
        if !seen.insert(token.to_string()) {
            continue;
        }
        let word = Word {
            id: new_id(),
            hat_id: hat.id.clone(),
            text: token.to_string(),
            guessed: false,
        };
        hat.words.push(word.clone());
        added.push(word);
    }

    AddWordsOutcome::Added(added)
}

/// Pick a word still inside the hat, uniformly at random. Does not mutate.
pub fn draw_word(hat: &Hat, random: &dyn RandomSource) -> DrawOutcome {
    if hat.stage != Stage::Play {
        return DrawOutcome::NotReady;
    }

    let inside: Vec<&Word> = hat.words_inside().collect();
    if inside.is_empty() {
        return DrawOutcome::Empty;
    }

    let index = random.pick_index(inside.len());
    debug_assert!(index < inside.len(), "pick_index out of range");
    let word = match inside.get(index) {
        Some(word) => *word,
        None => {
            tracing::warn!(index, len = inside.len(), "Random source picked out of range, wrapping");
            inside[index % inside.len()]
        }
    };
    DrawOutcome::Word(word.clone())
}

/// Mark a word of this hat as guessed. Ids from other hats are ignored.
pub fn mark_guessed(hat: &mut Hat, word_id: &str) -> GuessOutcome {
    if hat.stage != Stage::Play {
        return GuessOutcome::NotReady;
    }

    match hat.words.iter_mut().find(|w| w.id == word_id) {
        Some(word) if word.guessed => GuessOutcome::AlreadyGuessed,
        Some(word) => {
            word.guessed = true;
            GuessOutcome::Guessed
        }
        None => GuessOutcome::NotInHat,
    }
}

pub fn is_game_over(hat: &Hat) -> bool {
    hat.is_game_over()
}

/// Where a hat is in its lifecycle, game over included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatStatus {
    Collecting,
    Playing { remaining: usize, guessed: usize },
    GameOver,
}

pub fn status(hat: &Hat) -> HatStatus {
    match hat.stage {
        Stage::Init => HatStatus::Collecting,
        Stage::Play if hat.is_game_over() => HatStatus::GameOver,
        Stage::Play => HatStatus::Playing {
            remaining: hat.remaining(),
            guessed: hat.guessed(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    /// Always picks the same slot
    struct FixedRandom(usize);

    impl RandomSource for FixedRandom {
        fn pick_index(&self, _len: usize) -> usize {
            self.0
        }
    }

    fn texts(hat: &Hat) -> Vec<&str> {
        hat.words.iter().map(|w| w.text.as_str()).collect()
    }

    fn hat_with(words: &str) -> Hat {
        let mut hat = Hat::new();
        add_words(&mut hat, words);
        hat
    }

    #[test]
    fn test_split_words_collapses_separators() {
        let tokens: Vec<_> = split_words("cat, dog  cat\nfish\r\n,,").collect();
        assert_eq!(tokens, vec!["cat", "dog", "cat", "fish"]);
    }

    #[test]
    fn test_split_words_trims_other_whitespace() {
        let tokens: Vec<_> = split_words("\tcat\t,dog").collect();
        assert_eq!(tokens, vec!["cat", "dog"]);
    }

    #[test]
    fn test_add_words_deduplicates_within_submission() {
        let mut hat = Hat::new();
        let outcome = add_words(&mut hat, "cat, dog  cat\nfish");

        match outcome {
            AddWordsOutcome::Added(added) => assert_eq!(added.len(), 3),
            other => panic!("Expected Added, got {:?}", other),
        }
        assert_eq!(texts(&hat), vec!["cat", "dog", "fish"]);
        assert!(hat.words.iter().all(|w| !w.guessed && w.hat_id == hat.id));
    }

    #[test]
    fn test_add_words_deduplicates_against_existing() {
        let mut hat = hat_with("cat dog");
        let outcome = add_words(&mut hat, "dog,bird");

        match outcome {
            AddWordsOutcome::Added(added) => {
                assert_eq!(added.len(), 1);
                assert_eq!(added[0].text, "bird");
            }
            other => panic!("Expected Added, got {:?}", other),
        }
        assert_eq!(texts(&hat), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_add_words_is_case_sensitive() {
        let hat = hat_with("Cat cat CAT");
        assert_eq!(texts(&hat), vec!["Cat", "cat", "CAT"]);
    }

    #[test]
    fn test_add_words_blank_submission_adds_nothing() {
        let mut hat = Hat::new();
        assert_eq!(add_words(&mut hat, ""), AddWordsOutcome::Added(vec![]));
        assert_eq!(add_words(&mut hat, "  \n\r ,, "), AddWordsOutcome::Added(vec![]));
        assert!(hat.words.is_empty());
    }

    #[test]
    fn test_add_words_after_start_is_noop() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);

        assert_eq!(add_words(&mut hat, "fish"), AddWordsOutcome::AlreadyStarted);
        assert_eq!(texts(&hat), vec!["cat", "dog"]);
        assert_eq!(hat.stage, Stage::Play);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut hat = Hat::new();
        assert_eq!(start(&mut hat), StartOutcome::Started);
        assert_eq!(start(&mut hat), StartOutcome::AlreadyPlaying);
        assert_eq!(hat.stage, Stage::Play);
    }

    #[test]
    fn test_draw_requires_play() {
        let hat = hat_with("cat");
        assert_eq!(draw_word(&hat, &FixedRandom(0)), DrawOutcome::NotReady);
    }

    #[test]
    fn test_draw_empty_pool() {
        let mut hat = Hat::new();
        start(&mut hat);
        assert_eq!(draw_word(&hat, &FixedRandom(0)), DrawOutcome::Empty);
    }

    #[test]
    fn test_draw_is_non_destructive() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);
        let before = hat.clone();

        let first = draw_word(&hat, &FixedRandom(1));
        let second = draw_word(&hat, &FixedRandom(1));
        assert_eq!(first, second);
        assert_eq!(hat, before);
    }

    #[test]
    fn test_draw_index_selects_word_inside() {
        let mut hat = hat_with("cat dog fish bird");
        start(&mut hat);
        let dog = hat.words[1].id.clone();
        mark_guessed(&mut hat, &dog);

        let inside: Vec<Word> = hat.words_inside().cloned().collect();
        assert_eq!(inside.len(), 3);
        for (i, expected) in inside.iter().enumerate() {
            match draw_word(&hat, &FixedRandom(i)) {
                DrawOutcome::Word(w) => assert_eq!(&w, expected, "index {}", i),
                other => panic!("Expected Word, got {:?}", other),
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pick_index out of range")]
    fn test_draw_rejects_out_of_range_index() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);
        draw_word(&hat, &FixedRandom(99));
    }

    #[test]
    fn test_guess_then_draw_then_game_over() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);
        let cat = hat.words[0].id.clone();
        let dog = hat.words[1].id.clone();

        assert_eq!(mark_guessed(&mut hat, &cat), GuessOutcome::Guessed);

        let random = SeededRandom::new(3);
        for _ in 0..20 {
            match draw_word(&hat, &random) {
                DrawOutcome::Word(w) => assert_eq!(w.text, "dog"),
                other => panic!("Expected Word, got {:?}", other),
            }
        }

        assert_eq!(mark_guessed(&mut hat, &dog), GuessOutcome::Guessed);
        assert!(is_game_over(&hat));
        assert_eq!(draw_word(&hat, &random), DrawOutcome::Empty);
    }

    #[test]
    fn test_mark_guessed_is_idempotent() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);
        let cat = hat.words[0].id.clone();

        mark_guessed(&mut hat, &cat);
        let once = hat.clone();
        assert_eq!(mark_guessed(&mut hat, &cat), GuessOutcome::AlreadyGuessed);
        assert_eq!(hat, once);
    }

    #[test]
    fn test_mark_guessed_foreign_word_is_noop() {
        let mut hat = hat_with("cat");
        let mut other = hat_with("cat");
        start(&mut hat);
        start(&mut other);
        let foreign = other.words[0].id.clone();
        let before = hat.clone();

        assert_eq!(mark_guessed(&mut hat, &foreign), GuessOutcome::NotInHat);
        assert_eq!(hat, before);
    }

    #[test]
    fn test_mark_guessed_before_play_is_noop() {
        let mut hat = hat_with("cat");
        let cat = hat.words[0].id.clone();

        assert_eq!(mark_guessed(&mut hat, &cat), GuessOutcome::NotReady);
        assert!(!hat.words[0].guessed);
    }

    #[test]
    fn test_game_over_not_reached_in_init() {
        let hat = Hat::new();
        assert!(!is_game_over(&hat));
        assert_eq!(status(&hat), HatStatus::Collecting);
    }

    #[test]
    fn test_status_follows_pool() {
        let mut hat = hat_with("cat dog");
        start(&mut hat);
        assert_eq!(
            status(&hat),
            HatStatus::Playing {
                remaining: 2,
                guessed: 0
            }
        );

        let cat = hat.words[0].id.clone();
        let dog = hat.words[1].id.clone();
        mark_guessed(&mut hat, &cat);
        assert_eq!(
            status(&hat),
            HatStatus::Playing {
                remaining: 1,
                guessed: 1
            }
        );

        mark_guessed(&mut hat, &dog);
        assert_eq!(status(&hat), HatStatus::GameOver);
    }
}
