//! Day/night buckets, rolling totals and per-day series.
//!
//! One day window is used for both feedings and sleep: local `[06:00, 22:00)`
//! is day, everything else in the local calendar day is night. Feedings are
//! bucketed by their own local time, sleep intervals by the local time of
//! their end.

use crate::clock::{LocalClock, elapsed_minutes, format_minutes};
use crate::models::{
    AppData, Buckets, DailyBuckets, Metric, Period, RecipientId, RollingTotals, SeriesPoint,
    StatsResponse,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

pub const DAY_STARTS_AT_HOUR: u32 = 6;
pub const NIGHT_STARTS_AT_HOUR: u32 = 22;
const WEEK_LOOKBACK_DAYS: i64 = 7;
const MONTH_LOOKBACK_DAYS: i64 = 30;

pub fn is_daytime(time: NaiveTime) -> bool {
    (DAY_STARTS_AT_HOUR..NIGHT_STARTS_AT_HOUR).contains(&time.hour())
}

pub fn daily_buckets(
    data: &AppData,
    clock: &LocalClock,
    recipient_id: RecipientId,
    date: NaiveDate,
) -> DailyBuckets {
    let from = clock.start_of_day(date);
    let to = clock.start_of_day(date + Duration::days(1));

    let mut feeding_ml = Buckets::default();
    for feeding in data.feedings_between(recipient_id, from, to) {
        let amount = u64::from(feeding.amount_ml);
        if is_daytime(clock.local_time_of(feeding.timestamp)) {
            feeding_ml.day += amount;
        } else {
            feeding_ml.night += amount;
        }
    }

    let mut sleep_minutes = Buckets::default();
    for (sleep, end) in data.finished_sleeps_between(recipient_id, from, to) {
        let minutes = sleep_duration(sleep.start, end);
        if is_daytime(clock.local_time_of(end)) {
            sleep_minutes.day += minutes;
        } else {
            sleep_minutes.night += minutes;
        }
    }

    DailyBuckets {
        date: date.to_string(),
        feeding_ml,
        sleep_minutes,
    }
}

/// Totals of everything logged since local midnight of `start_date`.
pub fn rolling(
    data: &AppData,
    clock: &LocalClock,
    recipient_id: RecipientId,
    start_date: NaiveDate,
) -> RollingTotals {
    let from = clock.start_of_day(start_date);
    let to = DateTime::<Utc>::MAX_UTC;

    let feeding_ml = data
        .feedings_between(recipient_id, from, to)
        .map(|feeding| u64::from(feeding.amount_ml))
        .sum();
    let sleep_minutes = data
        .finished_sleeps_between(recipient_id, from, to)
        .map(|(sleep, end)| sleep_duration(sleep.start, end))
        .sum();

    RollingTotals {
        since: start_date.to_string(),
        feeding_ml,
        sleep_minutes,
    }
}

pub fn build_report(
    data: &AppData,
    clock: &LocalClock,
    recipient_id: RecipientId,
    now: DateTime<Utc>,
) -> StatsResponse {
    let today = clock.today(now);
    let daily = daily_buckets(data, clock, recipient_id, today);
    let week = rolling(
        data,
        clock,
        recipient_id,
        today - Duration::days(WEEK_LOOKBACK_DAYS),
    );
    let month = rolling(
        data,
        clock,
        recipient_id,
        today - Duration::days(MONTH_LOOKBACK_DAYS),
    );
    let text = render_report(today, &daily, &week, &month);

    StatsResponse {
        recipient_id,
        today: daily,
        last_7_days: week,
        last_30_days: month,
        text,
    }
}

pub fn render_report(
    today: NaiveDate,
    daily: &DailyBuckets,
    week: &RollingTotals,
    month: &RollingTotals,
) -> String {
    format!(
        "Statistics for {date}:\n\
         Feeding: day {day_ml} ml, night {night_ml} ml\n\
         Sleep: day {day_sleep}, night {night_sleep}\n\
         \n\
         Last week:\n\
         Feeding: {week_ml} ml | Sleep: {week_sleep}\n\
         Last month:\n\
         Feeding: {month_ml} ml | Sleep: {month_sleep}",
        date = today.format("%d.%m.%Y"),
        day_ml = daily.feeding_ml.day,
        night_ml = daily.feeding_ml.night,
        day_sleep = format_minutes(daily.sleep_minutes.day),
        night_sleep = format_minutes(daily.sleep_minutes.night),
        week_ml = week.feeding_ml,
        week_sleep = format_minutes(week.sleep_minutes),
        month_ml = month.feeding_ml,
        month_sleep = format_minutes(month.sleep_minutes),
    )
}

/// One point per local day ending with `today`, zero-filled. Feeding values
/// are millilitres, sleep values are hours rounded to two decimals.
pub fn daily_series(
    data: &AppData,
    clock: &LocalClock,
    recipient_id: RecipientId,
    metric: Metric,
    period: Period,
    today: NaiveDate,
) -> Vec<SeriesPoint> {
    let days = period.days() as usize;
    let first = today - Duration::days(days as i64 - 1);
    let from = clock.start_of_day(first);
    let to = clock.start_of_day(today + Duration::days(1));

    let mut totals = vec![0u64; days];
    let mut add = |instant: DateTime<Utc>, value: u64| {
        let index = (clock.local_date_of(instant) - first).num_days();
        if let Some(slot) = usize::try_from(index).ok().and_then(|i| totals.get_mut(i)) {
            *slot += value;
        }
    };

    match metric {
        Metric::Feeding => {
            for feeding in data.feedings_between(recipient_id, from, to) {
                add(feeding.timestamp, u64::from(feeding.amount_ml));
            }
        }
        Metric::Sleep => {
            for (sleep, end) in data.finished_sleeps_between(recipient_id, from, to) {
                add(end, sleep_duration(sleep.start, end));
            }
        }
    }

    totals
        .into_iter()
        .enumerate()
        .map(|(offset, total)| SeriesPoint {
            date: (first + Duration::days(offset as i64)).to_string(),
            value: match metric {
                Metric::Feeding => total as f64,
                Metric::Sleep => (total as f64 / 60.0 * 100.0).round() / 100.0,
            },
        })
        .collect()
}

fn sleep_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    elapsed_minutes(start, end).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;
    use crate::sessions::{self, SessionPolicy};

    const ID: RecipientId = 42;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(clock: &LocalClock, day: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
        clock.to_utc(day, NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn fixture() -> (AppData, LocalClock) {
        let mut data = AppData::default();
        records::start(&mut data, ID, "Mila");
        (data, LocalClock::default())
    }

    fn sleep(data: &mut AppData, start: DateTime<Utc>, end: DateTime<Utc>) {
        sessions::begin(data, ID, start, SessionPolicy::default()).unwrap();
        sessions::end(data, ID, end).unwrap();
    }

    #[test]
    fn late_evening_feeding_counts_as_night() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 2);
        records::record_feeding(&mut data, ID, 120, local(&clock, today, 23, 0)).unwrap();

        let buckets = daily_buckets(&data, &clock, ID, today);
        assert_eq!(buckets.feeding_ml, Buckets { day: 0, night: 120 });
    }

    #[test]
    fn feeding_buckets_cover_the_whole_local_day() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 2);
        let samples = [(0, 0, 10), (5, 59, 20), (6, 0, 30), (21, 59, 40), (22, 0, 50), (23, 59, 60)];
        for (h, m, amount) in samples {
            records::record_feeding(&mut data, ID, amount, local(&clock, today, h, m)).unwrap();
        }
        // Outside the local day on both sides.
        records::record_feeding(&mut data, ID, 500, local(&clock, today, 0, 0) - Duration::minutes(1))
            .unwrap();
        records::record_feeding(&mut data, ID, 500, local(&clock, today + Duration::days(1), 0, 0))
            .unwrap();

        let buckets = daily_buckets(&data, &clock, ID, today);
        assert_eq!(buckets.feeding_ml.day, 70);
        assert_eq!(buckets.feeding_ml.night, 140);
        assert_eq!(buckets.feeding_ml.total(), 210);
    }

    #[test]
    fn sleep_is_bucketed_by_local_end_time() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 2);
        let yesterday = today - Duration::days(1);

        // Overnight sleep ending 05:30 today: night, attributed to today.
        sleep(&mut data, local(&clock, yesterday, 21, 0), local(&clock, today, 5, 30));
        // Nap ending 14:45.
        sleep(&mut data, local(&clock, today, 13, 0), local(&clock, today, 14, 45));
        // Ends tomorrow, not part of today.
        sleep(
            &mut data,
            local(&clock, today, 23, 0),
            local(&clock, today + Duration::days(1), 1, 0),
        );

        let buckets = daily_buckets(&data, &clock, ID, today);
        assert_eq!(buckets.sleep_minutes.night, 8 * 60 + 30);
        assert_eq!(buckets.sleep_minutes.day, 105);
    }

    #[test]
    fn open_sessions_are_ignored() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 2);
        sessions::begin(&mut data, ID, local(&clock, today, 9, 0), SessionPolicy::default())
            .unwrap();

        let buckets = daily_buckets(&data, &clock, ID, today);
        assert_eq!(buckets.sleep_minutes.total(), 0);
    }

    #[test]
    fn rolling_counts_from_local_midnight() {
        let (mut data, clock) = fixture();
        let since = date(2026, 3, 26);
        records::record_feeding(&mut data, ID, 100, local(&clock, since, 0, 0)).unwrap();
        records::record_feeding(&mut data, ID, 100, local(&clock, since, 0, 0) - Duration::seconds(1))
            .unwrap();
        sleep(&mut data, local(&clock, since, 1, 0), local(&clock, since, 2, 30));

        let totals = rolling(&data, &clock, ID, since);
        assert_eq!(totals.feeding_ml, 100);
        assert_eq!(totals.sleep_minutes, 90);
        assert_eq!(totals.since, "2026-03-26");
    }

    #[test]
    fn report_combines_today_week_and_month() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 20);
        records::record_feeding(&mut data, ID, 120, local(&clock, today, 8, 0)).unwrap();
        records::record_feeding(&mut data, ID, 80, local(&clock, today, 23, 0)).unwrap();
        records::record_feeding(&mut data, ID, 50, local(&clock, today - Duration::days(10), 12, 0))
            .unwrap();
        records::record_feeding(&mut data, ID, 70, local(&clock, today - Duration::days(40), 12, 0))
            .unwrap();
        sleep(&mut data, local(&clock, today, 10, 0), local(&clock, today, 11, 15));

        let now = local(&clock, today, 23, 30);
        let report = build_report(&data, &clock, ID, now);
        assert_eq!(report.today.feeding_ml, Buckets { day: 120, night: 80 });
        assert_eq!(report.today.sleep_minutes, Buckets { day: 75, night: 0 });
        assert_eq!(report.last_7_days.feeding_ml, 200);
        assert_eq!(report.last_30_days.feeding_ml, 250);
        assert_eq!(report.last_30_days.sleep_minutes, 75);
        assert!(report.text.starts_with("Statistics for 20.04.2026:"));
        assert!(report.text.contains("Feeding: day 120 ml, night 80 ml"));
        assert!(report.text.contains("Sleep: day 1 h 15 min, night 0 min"));
    }

    #[test]
    fn series_length_matches_period_and_is_zero_filled() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 20);
        records::record_feeding(&mut data, ID, 120, local(&clock, today, 1, 0)).unwrap();
        records::record_feeding(&mut data, ID, 30, local(&clock, today - Duration::days(2), 23, 0))
            .unwrap();
        // Older than the 7 day window.
        records::record_feeding(&mut data, ID, 999, local(&clock, today - Duration::days(7), 12, 0))
            .unwrap();

        for period in [Period::Week, Period::Month, Period::All] {
            let series = daily_series(&data, &clock, ID, Metric::Feeding, period, today);
            assert_eq!(series.len(), period.days() as usize);
            assert_eq!(series.last().unwrap().date, "2026-04-20");
        }

        let week = daily_series(&data, &clock, ID, Metric::Feeding, Period::Week, today);
        let values: Vec<f64> = week.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![0.0, 0.0, 0.0, 0.0, 30.0, 0.0, 120.0]);
        assert_eq!(week[0].date, "2026-04-14");
    }

    #[test]
    fn sleep_series_is_in_hours_by_end_date() {
        let (mut data, clock) = fixture();
        let today = date(2026, 4, 20);
        sleep(
            &mut data,
            local(&clock, today - Duration::days(1), 22, 0),
            local(&clock, today, 6, 20),
        );

        let series = daily_series(&data, &clock, ID, Metric::Sleep, Period::Week, today);
        assert_eq!(series[6].value, 8.33);
        assert_eq!(series[5].value, 0.0);
    }
}
