//! Standalone SVG line chart for a graph series.

use crate::domain::graph::GraphPoint;
use crate::domain::money::format_money;

const PADDING: f64 = 40.0;
const LINE_COLOUR: &str = "#2da9b9";

pub fn render_line_chart(title: &str, points: &[GraphPoint], width: u32, height: u32) -> String {
    let width = f64::from(width);
    let height = f64::from(height);

    if points.is_empty() {
        return format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}"><text x="{PADDING:.0}" y="{PADDING:.0}">No data available.</text></svg>"#
        );
    }

    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = width - 2.0 * PADDING;
    let plot_height = height - 2.0 * PADDING;

    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if points.len() > 1 {
        plot_width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let polyline: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = PADDING + i as f64 * scale_x;
            let y = height - PADDING - (point.value - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    let first = points[0].time.format("%Y-%m-%d %H:%M");
    let last = points[points.len() - 1].time.format("%Y-%m-%d %H:%M");
    let bottom = height - PADDING;
    let right = width - PADDING;

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">
  <title>{title}</title>
  <line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{bottom:.0}" stroke="{LINE_COLOUR}" stroke-width="3"/>
  <line x1="{PADDING:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="{LINE_COLOUR}" stroke-width="3"/>
  <polyline fill="none" stroke="{LINE_COLOUR}" stroke-width="2" points="{points}"/>
  <text x="{PADDING:.0}" y="{label_y:.0}" fill="{LINE_COLOUR}" font-size="12">{max_label}</text>
  <text x="{PADDING:.0}" y="{bottom_label:.0}" fill="{LINE_COLOUR}" font-size="12">{min_label}</text>
  <text x="{PADDING:.0}" y="{time_y:.0}" font-size="10">{first}</text>
  <text x="{right:.0}" y="{time_y:.0}" font-size="10" text-anchor="end">{last}</text>
</svg>
"#,
        title = escape(title),
        points = polyline.join(" "),
        label_y = PADDING - 6.0,
        max_label = format_money(max),
        bottom_label = bottom - 4.0,
        min_label = format_money(min),
        time_y = height - PADDING / 2.0,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(minute: u32, value: f64) -> GraphPoint {
        GraphPoint {
            time: NaiveDate::from_ymd_opt(2023, 10, 2)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            value,
        }
    }

    #[test]
    fn empty_series_placeholder() {
        let svg = render_line_chart("AAPL", &[], 800, 300);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data available."));
    }

    #[test]
    fn single_point() {
        let svg = render_line_chart("AAPL", &[point(30, 100.0)], 800, 300);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("points=\"40.0,260.0\""));
    }

    #[test]
    fn scales_into_plot_area() {
        let svg = render_line_chart(
            "portfolio",
            &[point(30, 100.0), point(35, 150.0), point(40, 200.0)],
            500,
            200,
        );
        // x spans 40..460, y spans 160 (min) .. 40 (max)
        assert!(svg.contains("points=\"40.0,160.0 250.0,100.0 460.0,40.0\""));
        assert!(svg.contains("$200.00"));
        assert!(svg.contains("$100.00"));
        assert!(svg.contains("width=\"500\""));
    }

    #[test]
    fn title_is_escaped() {
        let svg = render_line_chart("A<B & C>", &[point(30, 1.0)], 400, 200);
        assert!(svg.contains("<title>A&lt;B &amp; C&gt;</title>"));
    }
}
