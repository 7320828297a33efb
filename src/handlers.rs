use crate::chart::render_chart;
use crate::clock::format_minutes;
use crate::errors::{AppError, TrackerError};
use crate::models::{
    ChartQuery, FeedingRequest, FeedingResponse, RecipientId, RecipientResponse,
    SeriesResponse, SessionStateResponse, SleepActionRequest, SleepEndedResponse,
    SleepStartedResponse, StartRequest, StatsResponse,
};
use crate::records;
use crate::sessions::{self, SessionState};
use crate::state::AppState;
use crate::stats::{build_report, daily_series};
use crate::ui::{render_dashboard, render_index};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(data.recipients.values()))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
) -> Result<Html<String>, AppError> {
    let data = state.data.lock().await;
    let recipient = data
        .recipients
        .get(&recipient_id)
        .ok_or(TrackerError::UnknownRecipient(recipient_id))?;
    let report = build_report(&data, &state.clock, recipient_id, Utc::now());
    let open_since = data
        .latest_open_sleep(recipient_id)
        .map(|open| state.clock.format_local(open.start));
    Ok(Html(render_dashboard(recipient, &report, open_since.as_deref())))
}

pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartRequest>,
) -> Result<Json<RecipientResponse>, AppError> {
    if payload.display_name.trim().is_empty() {
        return Err(AppError::bad_request("display_name must not be empty"));
    }

    let (created, recipient) = state
        .commit(|data| {
            let created = records::start(data, payload.recipient_id, &payload.display_name);
            let recipient = data
                .recipients
                .get(&payload.recipient_id)
                .cloned()
                .ok_or(TrackerError::UnknownRecipient(payload.recipient_id))?;
            Ok::<_, TrackerError>((created, recipient))
        })
        .await?;

    Ok(Json(RecipientResponse {
        recipient_id: recipient.id,
        display_name: recipient.display_name,
        created,
    }))
}

pub async fn sleep_state(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
) -> Result<Json<SessionStateResponse>, AppError> {
    let data = state.data.lock().await;
    let start = match sessions::state(&data, recipient_id)? {
        SessionState::OpenSession { start } => Some(start),
        SessionState::NoOpenSession => None,
    };
    Ok(Json(SessionStateResponse {
        recipient_id,
        open: start.is_some(),
        start,
    }))
}

pub async fn begin_sleep(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
    Json(payload): Json<SleepActionRequest>,
) -> Result<Json<SleepStartedResponse>, AppError> {
    let start = resolve_instant(&state, &payload, Utc::now())?;

    let policy = state.policy;
    let interval = state
        .commit(|data| sessions::begin(data, recipient_id, start, policy))
        .await?;

    Ok(Json(SleepStartedResponse {
        recipient_id,
        start: interval.start,
        start_local: state.clock.format_local(interval.start),
    }))
}

pub async fn end_sleep(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
    Json(payload): Json<SleepActionRequest>,
) -> Result<Json<SleepEndedResponse>, AppError> {
    let end = resolve_instant(&state, &payload, Utc::now())?;

    let closed = state
        .commit(|data| sessions::end(data, recipient_id, end))
        .await?;

    Ok(Json(SleepEndedResponse {
        recipient_id,
        start: closed.start,
        end: closed.end,
        minutes: closed.minutes,
        message: format!("Sleep finished. Duration: {}", format_minutes(closed.minutes)),
    }))
}

pub async fn record_feeding(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
    Json(payload): Json<FeedingRequest>,
) -> Result<Json<FeedingResponse>, AppError> {
    let now = Utc::now();
    let recorded = state
        .commit(|data| records::record_feeding(data, recipient_id, payload.amount, now))
        .await?;

    Ok(Json(FeedingResponse {
        recipient_id,
        amount_ml: recorded.event.amount_ml,
        timestamp: recorded.event.timestamp,
        sleep_open: recorded.sleep_open,
        message: format!("Saved: {} ml", recorded.event.amount_ml),
    }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    if !data.has_recipient(recipient_id) {
        return Err(TrackerError::UnknownRecipient(recipient_id).into());
    }
    Ok(Json(build_report(&data, &state.clock, recipient_id, Utc::now())))
}

pub async fn get_series(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<SeriesResponse>, AppError> {
    let data = state.data.lock().await;
    if !data.has_recipient(recipient_id) {
        return Err(TrackerError::UnknownRecipient(recipient_id).into());
    }
    let today = state.clock.today(Utc::now());
    let points = daily_series(&data, &state.clock, recipient_id, query.metric, query.period, today);
    Ok(Json(SeriesResponse {
        metric: query.metric,
        period: query.period,
        points,
    }))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Path(recipient_id): Path<RecipientId>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    if !data.has_recipient(recipient_id) {
        return Err(TrackerError::UnknownRecipient(recipient_id).into());
    }
    let today = state.clock.today(Utc::now());
    let points = daily_series(&data, &state.clock, recipient_id, query.metric, query.period, today);
    let svg = render_chart(&points, query.metric, query.period);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// `now` unless the request carries a manual `HH:MM` time.
fn resolve_instant(
    state: &AppState,
    payload: &SleepActionRequest,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TrackerError> {
    match payload.time.as_deref() {
        None => Ok(now),
        Some(time) => state
            .clock
            .resolve_local(time, payload.day, state.clock.today(now)),
    }
}
