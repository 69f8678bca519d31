//! The participant loop.
//!
//! Polls the coordination server for its turn; when authorized, builds
//! a prompt from the transcript, generates content, and submits it.
//! Not holding the turn yet is normal flow, never an error, and losing
//! a race for the slot just means polling again. Generation and
//! transport failures are retried on the next poll; they never reach
//! debate state.

use std::time::Duration;

use serde_json::{Map, Value};

use debate_day_core::{Role, SessionStatus, Speaker};

use crate::client::ApiClient;
use crate::generator::{self, Generator};
use crate::prompt;

pub struct AgentOpts {
    pub debate_id: String,
    pub role: Role,
    pub name: String,
}

/// Run the worker until its debate finishes.
pub async fn run(
    client: &ApiClient,
    generator: &dyn Generator,
    opts: &AgentOpts,
    poll_interval: Duration,
) {
    tracing::info!(
        debate_id = %opts.debate_id,
        role = %opts.role,
        name = %opts.name,
        "agent started"
    );
    loop {
        let turn = match client.turn(&opts.debate_id).await {
            Ok(turn) => turn,
            Err(err) => {
                tracing::warn!(error = %err, "turn poll failed, backing off");
                tokio::time::sleep(poll_interval).await;
                continue;
            }
        };

        if turn.status == SessionStatus::Finished || turn.next_speaker == Speaker::Done {
            tracing::info!(debate_id = %opts.debate_id, "debate finished, stopping");
            return;
        }

        if turn.next_speaker.role() == Some(opts.role) {
            match take_turn(client, generator, opts, turn.current_round).await {
                Ok(()) => {}
                Err(TurnError::Lost) => {
                    tracing::debug!("turn taken by another submission, repolling");
                }
                Err(TurnError::Failed(err)) => {
                    tracing::warn!(error = %err, "turn attempt failed, will retry");
                }
            }
        } else {
            tracing::debug!(next_speaker = %turn.next_speaker, "not our turn");
        }

        tokio::time::sleep(poll_interval).await;
    }
}

enum TurnError {
    /// Somebody else filled the slot between poll and submit.
    Lost,
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

async fn take_turn(
    client: &ApiClient,
    generator: &dyn Generator,
    opts: &AgentOpts,
    current_round: u32,
) -> Result<(), TurnError> {
    let messages = client
        .context(&opts.debate_id, 0)
        .await
        .map_err(|e| TurnError::Failed(e.into()))?;

    let prompt = prompt::build_prompt(opts.role, &opts.name, &messages, current_round);
    let content = generator
        .generate(&prompt)
        .await
        .map_err(|e| TurnError::Failed(e.into()))?;

    let metadata = verdict_metadata(opts.role, &content);
    match client
        .submit_message(&opts.debate_id, &opts.name, opts.role, &content, metadata)
        .await
    {
        Ok(message) => {
            tracing::info!(
                round = message.round,
                kind = ?message.kind,
                "message accepted"
            );
            Ok(())
        }
        Err(err) if err.is_turn_violation() => Err(TurnError::Lost),
        Err(err) => Err(TurnError::Failed(err.into())),
    }
}

/// The moderator attaches its declared winner; other roles send none.
fn verdict_metadata(role: Role, content: &str) -> Map<String, Value> {
    let mut metadata = Map::new();
    if role == Role::Mod {
        if let Some(winner) = generator::parse_winner(content) {
            metadata.insert("winner".to_owned(), Value::from(winner.to_string()));
        } else {
            tracing::warn!("verdict declared no winner");
        }
    }
    metadata
}
