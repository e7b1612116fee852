//! Live score feed.
//!
//! Score writes stay quiet inside the storage layer; the web layer publishes
//! one event per committed end so connected clients can refresh standings.

use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use storage::dto::scoring::EndScored;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveScoreEvent {
    EndScored {
        event_id: Uuid,
        score_id: Uuid,
        participant_id: Uuid,
        period_key: String,
        end_number: i32,
        end_score: i32,
        total_score: i32,
        x_count: i32,
        timestamp: DateTime<Utc>,
    },
}

impl LiveScoreEvent {
    pub fn end_scored(scored: &EndScored) -> Self {
        Self::EndScored {
            event_id: scored.score.event_id,
            score_id: scored.score.score_id,
            participant_id: scored.score.participant_id,
            period_key: scored.score.period_key.clone(),
            end_number: scored.end.end_number,
            end_score: scored.end.end_score,
            total_score: scored.score.total_score,
            x_count: scored.score.x_count,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::EndScored { .. } => "EndScored",
        }
    }

    pub fn event_id(&self) -> Uuid {
        match self {
            Self::EndScored { event_id, .. } => *event_id,
        }
    }
}

/// Fan-out of live score events to SSE subscribers
#[derive(Clone)]
pub struct LiveScores {
    tx: broadcast::Sender<LiveScoreEvent>,
}

impl LiveScores {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        info!("Live score feed initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Publishes to current subscribers; returns how many received it.
    pub fn publish(&self, event: LiveScoreEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => {
                debug!("Live score event sent to {} subscribers", count);
                count
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveScoreEvent> {
        self.tx.subscribe()
    }

    /// SSE response over the feed, optionally narrowed to one event.
    pub fn sse(self, event_id: Option<Uuid>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        let mut rx = self.subscribe();
        info!(filter = ?event_id, "New live score subscriber");

        let stream = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(live) => {
                        if event_id.is_some_and(|id| id != live.event_id()) {
                            continue;
                        }
                        match Event::default().event(live.event_type()).json_data(&live) {
                            Ok(event) => yield Ok(event),
                            Err(e) => warn!("Failed to encode live score event: {}", e),
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Live score subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("heartbeat"),
        )
    }
}
