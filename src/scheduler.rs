//! Daily statistics push at a fixed local wall-clock time.

use crate::clock::LocalClock;
use crate::notify::Notifier;
use crate::state::AppState;
use crate::stats::build_report;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// First instant strictly after `now` whose local time is `at`.
pub fn next_fire_after(clock: &LocalClock, now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = clock.today(now);
    let candidate = clock.to_utc(today, at);
    if candidate > now {
        candidate
    } else {
        clock.to_utc(today + Duration::days(1), at)
    }
}

/// Builds the report for every registered recipient and hands it to the
/// notifier. Returns how many reports were delivered.
pub async fn send_daily_reports(
    state: &AppState,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> usize {
    let reports: Vec<_> = {
        let data = state.data.lock().await;
        data.recipients
            .keys()
            .map(|&id| (id, build_report(&data, &state.clock, id, now).text))
            .collect()
    };

    let mut delivered = 0;
    for (recipient_id, text) in reports {
        match notifier.send_text(recipient_id, &text).await {
            Ok(()) => delivered += 1,
            Err(err) => error!(recipient_id, "failed to send daily report: {}", err.message),
        }
    }
    delivered
}

pub async fn run_daily_reports(state: AppState, notifier: Arc<dyn Notifier>, at: NaiveTime) {
    loop {
        let now = Utc::now();
        let fire_at = next_fire_after(&state.clock, now, at);
        info!("next daily report at {}", state.clock.format_local(fire_at));

        let wait = (fire_at - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let delivered = send_daily_reports(&state, notifier.as_ref(), fire_at).await;
        info!(delivered, "daily reports sent");
    }
}
