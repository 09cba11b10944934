use std::time::Duration;

use serde_json::Value;
use tokio::time;

use crate::{Error, Result, ScoutService};

impl ScoutService {
	/// Calls the completion service, retrying failures with a fixed delay between attempts.
	pub(crate) async fn complete_with_retry(
		&self,
		stage: &'static str,
		messages: &[Value],
	) -> Result<String> {
		let max_attempts = self.cfg.planner.max_attempts.max(1);
		let delay = Duration::from_millis(self.cfg.planner.retry_delay_ms);
		let mut attempt = 1;

		loop {
			match self.providers.completion.complete(&self.cfg.providers.llm, messages).await {
				Ok(text) => return Ok(text),
				Err(err) if attempt < max_attempts => {
					tracing::warn!(
						error = %err,
						stage,
						attempt,
						max_attempts,
						"Completion call failed. Retrying."
					);

					time::sleep(delay).await;

					attempt += 1;
				},
				Err(err) => {
					tracing::error!(
						error = %err,
						stage,
						attempts = attempt,
						"Completion retries exhausted."
					);

					return Err(Error::CompletionExhausted {
						attempts: attempt,
						message: err.to_string(),
					});
				},
			}
		}
	}
}
