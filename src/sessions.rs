//! Sleep session tracker.
//!
//! Per recipient the tracker is either in `NoOpenSession` or
//! `OpenSession(start)`. `begin` opens an interval, `end` closes the most
//! recently started open one. An `end` at or before the start is rejected and
//! leaves the interval open.

use crate::clock::elapsed_minutes;
use crate::errors::TrackerError;
use crate::models::{AppData, RecipientId, SleepInterval};
use chrono::{DateTime, Utc};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoOpenSession,
    OpenSession { start: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPolicy {
    pub single_open_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub minutes: u64,
}

pub fn state(data: &AppData, recipient_id: RecipientId) -> Result<SessionState, TrackerError> {
    ensure_recipient(data, recipient_id)?;
    Ok(match data.latest_open_sleep(recipient_id) {
        Some(open) => SessionState::OpenSession { start: open.start },
        None => SessionState::NoOpenSession,
    })
}

/// Opens a new interval. Unless the policy says otherwise an already open
/// interval is left untouched and a second one is created next to it.
pub fn begin(
    data: &mut AppData,
    recipient_id: RecipientId,
    start: DateTime<Utc>,
    policy: SessionPolicy,
) -> Result<SleepInterval, TrackerError> {
    ensure_recipient(data, recipient_id)?;
    if policy.single_open_session && data.latest_open_sleep(recipient_id).is_some() {
        return Err(TrackerError::SessionAlreadyOpen);
    }

    let interval = SleepInterval {
        id: data.allocate_sleep_id(),
        recipient_id,
        start,
        end: None,
    };
    data.sleeps.push(interval.clone());
    info!(recipient_id, sleep_id = interval.id, %start, "sleep started");
    Ok(interval)
}

pub fn end(
    data: &mut AppData,
    recipient_id: RecipientId,
    end: DateTime<Utc>,
) -> Result<ClosedSession, TrackerError> {
    ensure_recipient(data, recipient_id)?;
    let open = data
        .latest_open_sleep_mut(recipient_id)
        .ok_or(TrackerError::NoActiveSession)?;
    if end <= open.start {
        return Err(TrackerError::InvalidRange);
    }

    open.end = Some(end);
    let minutes = elapsed_minutes(open.start, end).max(0) as u64;
    info!(recipient_id, sleep_id = open.id, minutes, "sleep ended");
    Ok(ClosedSession {
        start: open.start,
        end,
        minutes,
    })
}

fn ensure_recipient(data: &AppData, recipient_id: RecipientId) -> Result<(), TrackerError> {
    if data.has_recipient(recipient_id) {
        Ok(())
    } else {
        Err(TrackerError::UnknownRecipient(recipient_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{DaySelector, LocalClock};
    use crate::records;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn registered() -> AppData {
        let mut data = AppData::default();
        records::start(&mut data, 42, "Mila");
        data
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, h, m, 0).unwrap()
    }

    #[test]
    fn begin_then_end_reports_floored_minutes() {
        let mut data = registered();
        let start = at(10, 0);
        begin(&mut data, 42, start, SessionPolicy::default()).unwrap();
        assert_eq!(state(&data, 42).unwrap(), SessionState::OpenSession { start });

        let end_at = start + Duration::seconds(90 * 60 + 59);
        let closed = end(&mut data, 42, end_at).unwrap();
        assert_eq!(closed.minutes, 90);
        assert_eq!(data.sleeps[0].end, Some(end_at));
        assert_eq!(state(&data, 42).unwrap(), SessionState::NoOpenSession);
    }

    #[test]
    fn end_without_open_session_changes_nothing() {
        let mut data = registered();
        let before = data.sleeps.clone();
        assert_eq!(end(&mut data, 42, at(8, 0)), Err(TrackerError::NoActiveSession));
        assert_eq!(data.sleeps, before);
    }

    #[test]
    fn end_at_or_before_start_keeps_session_open() {
        let mut data = registered();
        let start = at(12, 0);
        begin(&mut data, 42, start, SessionPolicy::default()).unwrap();

        assert_eq!(end(&mut data, 42, start), Err(TrackerError::InvalidRange));
        assert_eq!(
            end(&mut data, 42, start - Duration::minutes(5)),
            Err(TrackerError::InvalidRange)
        );
        assert_eq!(data.sleeps[0].end, None);
        assert_eq!(state(&data, 42).unwrap(), SessionState::OpenSession { start });
    }

    #[test]
    fn manual_yesterday_end_before_today_start_is_invalid() {
        let clock = LocalClock::default();
        let today = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let mut data = registered();

        let start = clock.resolve_local("22:30", DaySelector::Today, today).unwrap();
        begin(&mut data, 42, start, SessionPolicy::default()).unwrap();
        let end_at = clock.resolve_local("06:15", DaySelector::Yesterday, today).unwrap();

        assert_eq!(end(&mut data, 42, end_at), Err(TrackerError::InvalidRange));
        assert!(data.sleeps[0].is_open());
    }

    #[test]
    fn end_closes_the_most_recent_open_interval() {
        let mut data = registered();
        begin(&mut data, 42, at(1, 0), SessionPolicy::default()).unwrap();
        begin(&mut data, 42, at(3, 0), SessionPolicy::default()).unwrap();
        assert_eq!(data.sleeps.len(), 2);

        let closed = end(&mut data, 42, at(4, 0)).unwrap();
        assert_eq!(closed.start, at(3, 0));
        assert_eq!(closed.minutes, 60);
        assert!(data.sleeps[0].is_open());
        assert_eq!(
            state(&data, 42).unwrap(),
            SessionState::OpenSession { start: at(1, 0) }
        );
    }

    #[test]
    fn strict_policy_rejects_second_begin() {
        let mut data = registered();
        let strict = SessionPolicy {
            single_open_session: true,
        };
        begin(&mut data, 42, at(1, 0), strict).unwrap();
        assert_eq!(
            begin(&mut data, 42, at(2, 0), strict),
            Err(TrackerError::SessionAlreadyOpen)
        );
        assert_eq!(data.sleeps.len(), 1);
    }

    #[test]
    fn unknown_recipient_is_rejected() {
        let mut data = AppData::default();
        assert_eq!(
            begin(&mut data, 7, at(1, 0), SessionPolicy::default()),
            Err(TrackerError::UnknownRecipient(7))
        );
        assert_eq!(end(&mut data, 7, at(2, 0)), Err(TrackerError::UnknownRecipient(7)));
        assert!(data.sleeps.is_empty());
    }

    #[test]
    fn sessions_are_tracked_per_recipient() {
        let mut data = registered();
        records::start(&mut data, 43, "Leo");
        begin(&mut data, 42, at(1, 0), SessionPolicy::default()).unwrap();

        assert_eq!(end(&mut data, 43, at(2, 0)), Err(TrackerError::NoActiveSession));
        assert_eq!(end(&mut data, 42, at(2, 0)).unwrap().minutes, 60);
    }
}
