use super::AppState;
use crate::forms::{EnterIdForm, FormErrors, Validation, HAT_NOT_FOUND_MESSAGE};
use crate::game::{self, StartOutcome};
use crate::store::{StoreError, StoreResult};
use crate::types::*;

impl AppState {
    /// Create a new, empty hat in the word-entry stage
    pub async fn create_hat(&self) -> StoreResult<Hat> {
        let hat = self.store.create_hat().await?;
        tracing::info!(hat_id = %hat.id, "Hat created");
        Ok(hat)
    }

    pub async fn get_hat(&self, hat_id: &str) -> StoreResult<Hat> {
        self.store.get_hat(hat_id).await
    }

    /// Move a hat into play. Starting a hat that is already in play is a no-op.
    pub async fn start_hat(&self, hat_id: &str) -> StoreResult<(Hat, StartOutcome)> {
        let mut outcome = StartOutcome::AlreadyPlaying;
        let hat = self
            .store
            .update_hat(
                hat_id,
                Box::new(|hat: &mut Hat| outcome = game::start(hat)),
            )
            .await?;

        match outcome {
            StartOutcome::Started => {
                tracing::info!(hat_id, words = hat.words.len(), "Hat started")
            }
            StartOutcome::AlreadyPlaying => tracing::debug!(hat_id, "Hat already in play"),
        }
        Ok((hat, outcome))
    }

    /// Resolve the join form to an existing hat.
    ///
    /// An unknown id is a form error on `hat_id`, not a store error.
    pub async fn join_hat(&self, form: &EnterIdForm) -> StoreResult<Validation<Hat>> {
        let hat_id = match form.validate() {
            Ok(hat_id) => hat_id,
            Err(errors) => return Ok(Err(errors)),
        };

        match self.store.get_hat(hat_id).await {
            Ok(hat) => {
                tracing::info!(hat_id, "Joined hat");
                Ok(Ok(hat))
            }
            Err(StoreError::HatNotFound(_)) => {
                tracing::debug!(hat_id, "Join attempt for unknown hat");
                Ok(Err(FormErrors::single("hat_id", HAT_NOT_FOUND_MESSAGE)))
            }
            Err(e) => Err(e),
        }
    }
}
