use crate::errors::TrackerError;
use crate::models::{AppData, FeedingEvent, Recipient, RecipientId};
use chrono::{DateTime, Utc};
use tracing::info;

/// Registers a recipient. Returns `true` when a new one was created; an
/// existing recipient keeps its stored name.
pub fn start(data: &mut AppData, recipient_id: RecipientId, display_name: &str) -> bool {
    if data.has_recipient(recipient_id) {
        return false;
    }

    data.recipients.insert(
        recipient_id,
        Recipient {
            id: recipient_id,
            display_name: display_name.trim().to_string(),
        },
    );
    info!(recipient_id, "recipient registered");
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFeeding {
    pub event: FeedingEvent,
    /// Whether a sleep session was open when the feeding was logged.
    pub sleep_open: bool,
}

pub fn record_feeding(
    data: &mut AppData,
    recipient_id: RecipientId,
    amount_ml: u32,
    timestamp: DateTime<Utc>,
) -> Result<RecordedFeeding, TrackerError> {
    if !data.has_recipient(recipient_id) {
        return Err(TrackerError::UnknownRecipient(recipient_id));
    }

    let event = FeedingEvent {
        id: data.allocate_feeding_id(),
        recipient_id,
        amount_ml,
        timestamp,
    };
    data.feedings.push(event.clone());
    info!(recipient_id, amount_ml, "feeding recorded");

    Ok(RecordedFeeding {
        event,
        sleep_open: data.latest_open_sleep(recipient_id).is_some(),
    })
}
