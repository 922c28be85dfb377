use reqwest::StatusCode;

use ta_common::error::TaError;
use ta_modinput::sink::{EventSink, SinkEvent};
use ta_store::checkpoint::models::PollCheckpoint;
use ta_store::checkpoint::repositories::CheckpointStore;

use super::client::{DropboxClient, DropboxClientError};
use super::models::EventsPage;

/// Per-stanza inputs of one poll cycle.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Short stanza name; keys the checkpoint and tags every event.
    pub input_name: String,
    pub start_time: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug)]
pub struct PollResult {
    pub source: String,
    pub pages: usize,
    pub emitted: usize,
    pub cursor: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("configuration error: {0}")]
    Config(#[source] TaError),

    #[error("failed to fetch account details: {0}")]
    Credential(#[source] TaError),

    #[error(transparent)]
    Client(#[from] DropboxClientError),

    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("malformed team log page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[source] TaError),

    #[error("event sink error: {0}")]
    Sink(#[source] TaError),
}

/// Where the cycle is. Any error returns out of the loop with the checkpoint
/// still on the last fully emitted page.
enum PollState {
    Fetching,
    Emitting(EventsPage),
    Checkpointing { cursor: String, has_more: bool },
    Done,
}

pub struct DropboxPoller<C, E> {
    client: DropboxClient,
    checkpoints: C,
    sink: E,
}

impl<C, E> DropboxPoller<C, E>
where
    C: CheckpointStore,
    E: EventSink,
{
    pub fn new(client: DropboxClient, checkpoints: C, sink: E) -> Self {
        Self {
            client,
            checkpoints,
            sink,
        }
    }

    /// Walk the team log from the stored cursor until the API reports no
    /// more pages. The cursor of a page is persisted only after every event
    /// of that page has been written to the sink.
    pub async fn poll(
        &mut self,
        settings: &PollSettings,
        access_token: &str,
    ) -> Result<PollResult, PollError> {
        let mut checkpoint = PollCheckpoint::load(&self.checkpoints, &settings.input_name)
            .await
            .map_err(PollError::Checkpoint)?;

        tracing::debug!(
            input = %settings.input_name,
            resume = checkpoint.cursor.is_some(),
            "starting team log poll"
        );

        let mut result = PollResult {
            source: settings.input_name.clone(),
            pages: 0,
            emitted: 0,
            cursor: checkpoint.cursor.clone(),
        };

        let mut state = PollState::Fetching;
        loop {
            state = match state {
                PollState::Fetching => {
                    let page = fetch_page(
                        &self.client,
                        settings,
                        access_token,
                        checkpoint.cursor.as_deref(),
                    )
                    .await?;
                    PollState::Emitting(page)
                }
                PollState::Emitting(page) => {
                    tracing::info!(
                        input = %settings.input_name,
                        "Got {} events. Has more: {}",
                        page.events.len(),
                        page.has_more
                    );

                    for event in &page.events {
                        let data = serde_json::to_string(event)?;
                        self.sink
                            .write_event(SinkEvent {
                                stanza: settings.input_name.clone(),
                                source: settings.input_name.clone(),
                                data,
                            })
                            .await
                            .map_err(PollError::Sink)?;
                        result.emitted += 1;
                    }

                    PollState::Checkpointing {
                        cursor: page.cursor,
                        has_more: page.has_more,
                    }
                }
                PollState::Checkpointing { cursor, has_more } => {
                    checkpoint
                        .advance(&self.checkpoints, &cursor)
                        .await
                        .map_err(PollError::Checkpoint)?;
                    result.pages += 1;
                    result.cursor = Some(cursor);

                    if has_more {
                        PollState::Fetching
                    } else {
                        PollState::Done
                    }
                }
                PollState::Done => break,
            };
        }

        Ok(result)
    }
}

/// Fetch one page. Borrows only the client so the poller needs no `Sync`
/// bound on its sink.
async fn fetch_page(
    client: &DropboxClient,
    settings: &PollSettings,
    access_token: &str,
    cursor: Option<&str>,
) -> Result<EventsPage, PollError> {
    let response = match client
        .send_request(
            access_token,
            cursor,
            settings.start_time.as_deref(),
            settings.category.as_deref(),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(input = %settings.input_name, error = %e, "team log request failed");
            return Err(e.into());
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(input = %settings.input_name, %status, body = %body, "unexpected team log status");
        return Err(PollError::UnexpectedStatus { status, body });
    }

    let body = response
        .bytes()
        .await
        .map_err(DropboxClientError::RequestError)?;
    Ok(serde_json::from_slice(&body)?)
}
