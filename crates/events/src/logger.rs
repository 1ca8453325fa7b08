//! Background subscriber that writes every bus event to the trace log.

use tokio::sync::broadcast;

use crate::bus::MapEvent;

pub struct EventLogger;

impl EventLogger {
    /// Run until the bus is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<MapEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = %event.event_type,
                        map_id = event.map_id,
                        member_id = ?event.member_id,
                        map_play_id = ?event.map_play_id,
                        source_entity_type = ?event.source_entity_type,
                        source_entity_id = ?event.source_entity_id,
                        "Map event"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
    }
}
