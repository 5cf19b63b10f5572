//! Inline SVG charts for the statistics tab.

use crate::services::stats::{CategoryCount, YearCount};

use super::templates::html_escape;
use crate::models::clip;

const CHART_WIDTH: f64 = 560.0;
const LABEL_WIDTH: f64 = 170.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 6.0;
const LINE_HEIGHT: f64 = 280.0;
const MARGIN: f64 = 40.0;

/// Horizontal bar chart of records per task.
pub fn task_bar_chart(series: &[CategoryCount]) -> String {
    if series.is_empty() {
        return r#"<p class="empty">No task data for the current filters.</p>"#.to_string();
    }

    let max = series.iter().map(|c| c.count).max().unwrap_or(1).max(1) as f64;
    let bar_area = CHART_WIDTH - LABEL_WIDTH - MARGIN;
    let height = series.len() as f64 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP;

    let mut bars = String::new();
    for (i, item) in series.iter().enumerate() {
        let y = BAR_GAP + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let width = (item.count as f64 / max * bar_area).max(1.0);
        let label = html_escape(&clip(&item.label, 24));

        bars.push_str(&format!(
            r#"
        <g class="bar">
            <title>{}: {}</title>
            <text x="{:.1}" y="{:.1}" text-anchor="end" class="bar-label">{}</text>
            <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="3"></rect>
            <text x="{:.1}" y="{:.1}" class="bar-value">{}</text>
        </g>"#,
            html_escape(&item.label),
            item.count,
            LABEL_WIDTH - 8.0,
            y + BAR_HEIGHT * 0.7,
            label,
            LABEL_WIDTH,
            y,
            width,
            BAR_HEIGHT,
            LABEL_WIDTH + width + 6.0,
            y + BAR_HEIGHT * 0.7,
            item.count
        ));
    }

    format!(
        r#"<svg class="chart task-chart" viewBox="0 0 {:.0} {:.0}" role="img" aria-label="Tasks overview">{}
    </svg>"#,
        CHART_WIDTH, height, bars
    )
}

/// Line chart of records per publication year.
pub fn year_line_chart(series: &[YearCount]) -> String {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.year, last.year),
        _ => {
            return r#"<p class="empty">No year data for the current filters.</p>"#.to_string()
        }
    };

    let max = series.iter().map(|y| y.count).max().unwrap_or(1).max(1) as f64;
    let plot_w = CHART_WIDTH - 2.0 * MARGIN;
    let plot_h = LINE_HEIGHT - 2.0 * MARGIN;
    let span = (i64::from(last) - i64::from(first)) as f64;

    let x = |year: i32| {
        if span == 0.0 {
            MARGIN + plot_w / 2.0
        } else {
            MARGIN + (i64::from(year) - i64::from(first)) as f64 / span * plot_w
        }
    };
    let y = |count: usize| MARGIN + plot_h - count as f64 / max * plot_h;

    let points: Vec<String> = series
        .iter()
        .map(|p| format!("{:.1},{:.1}", x(p.year), y(p.count)))
        .collect();

    // Thin the year labels so they do not overlap.
    let step = series.len().div_ceil(10).max(1);
    let mut markers = String::new();
    for (i, p) in series.iter().enumerate() {
        markers.push_str(&format!(
            r#"
        <circle cx="{:.1}" cy="{:.1}" r="3"><title>{}: {}</title></circle>"#,
            x(p.year),
            y(p.count),
            p.year,
            p.count
        ));
        if i % step == 0 || i + 1 == series.len() {
            markers.push_str(&format!(
                r#"
        <text x="{:.1}" y="{:.1}" text-anchor="middle" class="axis-label">{}</text>"#,
                x(p.year),
                LINE_HEIGHT - MARGIN + 16.0,
                p.year
            ));
        }
    }

    format!(
        r#"<svg class="chart year-chart" viewBox="0 0 {w:.0} {h:.0}" role="img" aria-label="Datasets by year">
        <line x1="{m:.1}" y1="{base:.1}" x2="{right:.1}" y2="{base:.1}" class="axis"></line>
        <line x1="{m:.1}" y1="{m:.1}" x2="{m:.1}" y2="{base:.1}" class="axis"></line>
        <text x="{lx:.1}" y="{base:.1}" text-anchor="end" class="axis-label">0</text>
        <text x="{lx:.1}" y="{top:.1}" text-anchor="end" class="axis-label">{max}</text>
        <text x="{cx:.1}" y="{xt:.1}" text-anchor="middle" class="axis-title">Year</text>
        <polyline points="{points}" class="trend"></polyline>{markers}
    </svg>"#,
        w = CHART_WIDTH,
        h = LINE_HEIGHT,
        m = MARGIN,
        base = MARGIN + plot_h,
        right = MARGIN + plot_w,
        lx = MARGIN - 6.0,
        top = MARGIN + 4.0,
        max = max as usize,
        cx = MARGIN + plot_w / 2.0,
        xt = LINE_HEIGHT - 4.0,
        points = points.join(" "),
        markers = markers
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert!(task_bar_chart(&[]).contains("No task data"));
        assert!(year_line_chart(&[]).contains("No year data"));
    }

    #[test]
    fn test_bar_chart_escapes_labels() {
        let svg = task_bar_chart(&[CategoryCount {
            label: "Q&A <eval>".to_string(),
            count: 3,
        }]);
        assert!(svg.contains("Q&amp;A &lt;eval&gt;"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_line_chart_single_point() {
        let svg = year_line_chart(&[YearCount {
            year: 2020,
            count: 4,
        }]);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(">2020<"));
    }

    #[test]
    fn test_line_chart_extreme_years() {
        let svg = year_line_chart(&[
            YearCount {
                year: i32::MIN,
                count: 1,
            },
            YearCount {
                year: i32::MAX,
                count: 1,
            },
        ]);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(&format!(">{}<", i32::MAX)));
        assert!(!svg.contains("NaN"));
    }
}
