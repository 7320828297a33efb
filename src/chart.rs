use crate::models::{Metric, Period, SeriesPoint};
use std::fmt::Write;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 56.0;
const MAX_X_LABELS: usize = 10;

/// Renders the series as an SVG document. Feedings are drawn as a line with
/// markers, sleep as bars.
pub fn render_chart(points: &[SeriesPoint], metric: Metric, period: Period) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let max = points.iter().map(|point| point.value).fold(0.0_f64, f64::max);
    let y_max = nice_ceiling(max);
    let count = points.len().max(1);
    let step_x = plot_w / count as f64;

    let x_of = |index: usize| MARGIN_LEFT + step_x * (index as f64 + 0.5);
    let y_of = |value: f64| MARGIN_TOP + plot_h - value / y_max * plot_h;

    let (title, unit, color) = match metric {
        Metric::Feeding => ("Feedings", "ml", "#2f4858"),
        Metric::Sleep => ("Sleep", "hours", "#8ab6d6"),
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"##
    );
    let _ = write!(svg, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
    let _ = write!(
        svg,
        r##"<text x="{x}" y="24" font-size="16" fill="#2b2a28">{title} ({label}, {unit})</text>"##,
        x = MARGIN_LEFT,
        label = period.label(),
    );

    for tick in 0..=4 {
        let value = y_max * f64::from(tick) / 4.0;
        let y = y_of(value);
        let _ = write!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#e5e0d8"/><text x="{tx}" y="{ty:.1}" text-anchor="end" fill="#5f5c57">{value}</text>"##,
            x2 = WIDTH - MARGIN_RIGHT,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
            value = format_value(value),
        );
    }

    match metric {
        Metric::Sleep => {
            let bar_w = (step_x * 0.7).max(1.0);
            for (index, point) in points.iter().enumerate() {
                let y = y_of(point.value);
                let _ = write!(
                    svg,
                    r##"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{color}"><title>{date}: {value}</title></rect>"##,
                    x = x_of(index) - bar_w / 2.0,
                    h = MARGIN_TOP + plot_h - y,
                    date = point.date,
                    value = format_value(point.value),
                );
            }
        }
        Metric::Feeding => {
            let path = points
                .iter()
                .enumerate()
                .map(|(index, point)| format!("{:.1},{:.1}", x_of(index), y_of(point.value)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                svg,
                r##"<polyline points="{path}" fill="none" stroke="{color}" stroke-width="2"/>"##
            );
            for (index, point) in points.iter().enumerate() {
                let _ = write!(
                    svg,
                    r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="3" fill="{color}"><title>{date}: {value}</title></circle>"##,
                    cx = x_of(index),
                    cy = y_of(point.value),
                    date = point.date,
                    value = format_value(point.value),
                );
            }
        }
    }

    let label_step = (points.len() / MAX_X_LABELS).max(1);
    for (index, point) in points.iter().enumerate().step_by(label_step) {
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" fill="#5f5c57">{label}</text>"##,
            x = x_of(index),
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            label = short_date(&point.date),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// `2026-04-20` -> `20.04`.
fn short_date(iso: &str) -> String {
    let mut parts = iso.split('-').skip(1);
    match (parts.next(), parts.next()) {
        (Some(month), Some(day)) => format!("{day}.{month}"),
        _ => iso.to_string(),
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Rounds up to 1, 2 or 5 times a power of ten so the axis ticks stay readable.
fn nice_ceiling(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    for factor in [1.0, 2.0, 5.0, 10.0] {
        if max <= factor * magnitude {
            return factor * magnitude;
        }
    }
    10.0 * magnitude
}
