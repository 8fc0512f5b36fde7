//! # Change Event Stream
//!
//! Server-sent events carrying each [`ChangeEvent`](crate::domain::ChangeEvent)
//! as JSON. A client that falls behind the channel receives a `lagged` event
//! and should re-query everything.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::stream::Stream;
use log::{info, warn};
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stream_events))
}

pub async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("GET /api/events - subscriber connected");

    let stream = BroadcastStream::new(state.notifier.subscribe()).map(|message| {
        let event = match message {
            Ok(change) => {
                let data = serde_json::to_string(&change).unwrap_or_else(|_| "{}".into());
                Event::default().event("change").data(data)
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!("Event subscriber lagged, {} events skipped", skipped);
                Event::default().event("lagged").data(skipped.to_string())
            }
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
