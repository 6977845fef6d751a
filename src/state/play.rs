use super::AppState;
use crate::game::{self, AddWordsOutcome, DrawOutcome, GuessOutcome, HatStatus};
use crate::store::StoreResult;
use crate::types::*;

impl AppState {
    /// Add the words of a raw submission to a hat still collecting words
    pub async fn add_words(&self, hat_id: &str, raw: &str) -> StoreResult<AddWordsOutcome> {
        let mut outcome = AddWordsOutcome::AlreadyStarted;
        self.store
            .update_hat(
                hat_id,
                Box::new(|hat: &mut Hat| outcome = game::add_words(hat, raw)),
            )
            .await?;

        match &outcome {
            AddWordsOutcome::Added(added) => {
                tracing::info!(hat_id, added = added.len(), "Words added")
            }
            AddWordsOutcome::AlreadyStarted => {
                tracing::debug!(hat_id, "Ignoring words for hat already in play")
            }
        }
        Ok(outcome)
    }

    /// Draw a random word still inside the hat. Never mutates the hat.
    pub async fn draw_word(&self, hat_id: &str) -> StoreResult<DrawOutcome> {
        let hat = self.store.get_hat(hat_id).await?;
        let outcome = game::draw_word(&hat, self.random.as_ref());

        if let DrawOutcome::Word(word) = &outcome {
            tracing::debug!(hat_id, word_id = %word.id, "Word drawn");
        }
        Ok(outcome)
    }

    /// Mark a word as guessed.
    ///
    /// Both ids must exist. A word from another hat is ignored.
    pub async fn mark_guessed(&self, hat_id: &str, word_id: &str) -> StoreResult<GuessOutcome> {
        self.store.get_hat(hat_id).await?;
        let word = self.store.get_word(word_id).await?;

        let mut outcome = GuessOutcome::NotInHat;
        if word.hat_id == hat_id {
            self.store
                .update_hat(
                    hat_id,
                    Box::new(|hat: &mut Hat| outcome = game::mark_guessed(hat, word_id)),
                )
                .await?;
        }

        match outcome {
            GuessOutcome::Guessed => tracing::info!(hat_id, word_id, "Word guessed"),
            GuessOutcome::AlreadyGuessed => tracing::debug!(hat_id, word_id, "Word already guessed"),
            GuessOutcome::NotInHat => {
                tracing::warn!(hat_id, word_id, owner = %word.hat_id, "Ignoring word from another hat")
            }
            GuessOutcome::NotReady => tracing::debug!(hat_id, word_id, "Hat not in play yet"),
        }
        Ok(outcome)
    }

    pub async fn hat_status(&self, hat_id: &str) -> StoreResult<HatStatus> {
        let hat = self.store.get_hat(hat_id).await?;
        Ok(game::status(&hat))
    }
}
