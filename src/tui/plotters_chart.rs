//! Plotters-powered chart widgets for Ratatui.
//!
//! Two charts: the decile line chart (one line per party over deciles 1-10)
//! and the per-party bar chart used by both the societal metric view and the
//! household results. Plotters output is drawn into the Ratatui buffer with
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the plotters trait that provides `filled()`.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::decile::{DECILE_COUNT, DecileRow, line_series};
use crate::chart::party::PartyBar;
use crate::domain::Party;

const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

/// Half-width of a bar in x units (bars sit on integer positions).
const BAR_HALF_WIDTH: f64 = 0.35;

pub fn party_color(party: Party) -> RGBColor {
    let (r, g, b) = party.color();
    RGBColor(r, g, b)
}

/// Relative income change by decile.
pub struct DecileChart<'a> {
    pub pivot: &'a [DecileRow],
    /// Symmetric y bound; the axis runs from `-bound` to `+bound`.
    pub bound: f64,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for DecileChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }

        let [y0, y1] = decile_y_range(self.bound);
        let x0 = 1.0;
        let x1 = f64::from(DECILE_COUNT);
        let series: Vec<(Party, Vec<(f64, f64)>)> = Party::ALL
            .iter()
            .map(|&p| (p, line_series(self.pivot, p)))
            .collect();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("Income decile")
                .x_labels(usize::from(DECILE_COUNT))
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &RGBColor(90, 90, 90)))?;

            for (party, points) in &series {
                chart.draw_series(LineSeries::new(points.iter().copied(), &party_color(*party)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// One vertical bar per party, in `Party::ALL` order.
pub struct PartyBarChart<'a> {
    pub bars: &'a [PartyBar],
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for PartyBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }

        let values: Vec<f64> = self.bars.iter().map(|b| b.value).collect();
        let [y0, y1] = bar_y_range(&values);
        let x0 = -0.5;
        let x1 = self.bars.len() as f64 - 0.5;
        let bars = self.bars;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(bars.len())
                .y_labels(5)
                .x_label_formatter(&|v| bar_label(bars, *v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(bars.iter().enumerate().map(|(i, bar)| bar_rect(i, bar)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Filled bar from zero to the value, centred on x position `index`.
fn bar_rect(index: usize, bar: &PartyBar) -> Rectangle<(f64, f64)> {
    let x = index as f64;
    Rectangle::new(
        [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, bar.value)],
        party_color(bar.party).filled(),
    )
}

fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

/// `[-bound, bound]`, widened to `[-1, 1]` when every value is zero.
fn decile_y_range(bound: f64) -> [f64; 2] {
    let b = if bound.is_finite() && bound > 0.0 { bound } else { 1.0 };
    [-b, b]
}

/// Y range that always contains zero, with a little headroom.
fn bar_y_range(values: &[f64]) -> [f64; 2] {
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let hi = values.iter().copied().fold(0.0_f64, f64::max);
    if lo == hi {
        return [-1.0, 1.0];
    }
    let pad = (hi - lo) * 0.1;
    [if lo < 0.0 { lo - pad } else { 0.0 }, if hi > 0.0 { hi + pad } else { 0.0 }]
}

/// Party name for an x tick that lands on a bar; blank elsewhere.
fn bar_label(bars: &[PartyBar], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    bars.get(i as usize)
        .map(|b| b.party.short_label().to_string())
        .unwrap_or_default()
}
