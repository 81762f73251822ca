//! Ratatui-based terminal dashboard.
//!
//! Two tabs share one selection (year, indirect impacts, metric):
//! - Societal: decile line chart, party comparison table, metric bar chart
//! - Household: the household form and the calculator results
//!
//! Slow work (dataset loading, household calculation) is queued by a key
//! press and run after the next draw, so the status line shows what is
//! happening while the call blocks.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs},
};

use crate::chart::{
    PartyChart, headline, household_chart, household_headline, household_metrics, impact_table, party_chart,
    pivot_deciles, round1, y_bound,
};
use crate::data::{DatasetCache, HouseholdClient, HouseholdError, LoadState};
use crate::domain::{
    DEFAULT_HOUSEHOLD_METRIC, HouseholdResult, HouseholdSituation, MetricUnit, Party, ViewConfig,
};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::filter::{filter_decile_data, filter_manifesto_data};
use crate::report::format::{format_axis_value, format_gbp, format_metric, format_pct_tick};

mod form;
mod plotters_chart;

use form::{adjust, field_text, visible_fields};
use plotters_chart::{DecileChart, PartyBarChart};

/// Start the TUI.
pub fn run(config: ViewConfig, cache: DatasetCache, household: HouseholdClient) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, cache, household);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Societal,
    Household,
}

impl Tab {
    fn toggle(self) -> Tab {
        match self {
            Tab::Societal => Tab::Household,
            Tab::Household => Tab::Societal,
        }
    }
}

/// Blocking work to run after the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Load,
    Calculate,
}

/// Household results plus the scenario they were calculated for.
struct HouseholdRun {
    results: Vec<HouseholdResult>,
    year: i32,
    include_indirect: bool,
}

struct App {
    config: ViewConfig,
    cache: DatasetCache,
    household: HouseholdClient,
    tab: Tab,
    pending: Option<Pending>,
    load_error: Option<String>,
    form: HouseholdSituation,
    selected_field: usize,
    household_run: Option<HouseholdRun>,
    household_metric: String,
    status: String,
}

impl App {
    fn new(config: ViewConfig, cache: DatasetCache, household: HouseholdClient) -> Self {
        let status = format!("Loading datasets from {}...", cache.source());
        Self {
            config,
            cache,
            household,
            tab: Tab::Societal,
            pending: Some(Pending::Load),
            load_error: None,
            form: HouseholdSituation::default(),
            selected_field: 0,
            household_run: None,
            household_metric: DEFAULT_HOUSEHOLD_METRIC.to_string(),
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if let Some(pending) = self.pending.take() {
                self.run_pending(pending);
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn run_pending(&mut self, pending: Pending) {
        match pending {
            Pending::Load => match self.cache.load_all() {
                Ok(()) => {
                    self.load_error = None;
                    self.status = format!("Loaded datasets from {}.", self.cache.source());
                }
                Err(err) => {
                    log::warn!("dataset load failed: {err}");
                    self.status = "Failed to load data. Press r to retry.".to_string();
                    self.load_error = Some(err.to_string());
                }
            },
            Pending::Calculate => {
                match self
                    .household
                    .calculate(&self.form, self.config.year, self.config.include_indirect)
                {
                    Ok(results) => {
                        self.status = format!("Calculated {} household results.", results.len());
                        let metrics = household_metrics(&results);
                        if !metrics.contains(&self.household_metric) {
                            self.household_metric = metrics
                                .first()
                                .cloned()
                                .unwrap_or_else(|| DEFAULT_HOUSEHOLD_METRIC.to_string());
                        }
                        self.household_run = Some(HouseholdRun {
                            results,
                            year: self.config.year,
                            include_indirect: self.config.include_indirect,
                        });
                    }
                    Err(err) => {
                        self.status = err.to_string();
                    }
                }
            }
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::BackTab => self.tab = self.tab.toggle(),
            KeyCode::Char('y') => {
                self.config.next_year();
                self.status = format!("year: {}", self.config.year);
            }
            KeyCode::Char('Y') => {
                self.config.prev_year();
                self.status = format!("year: {}", self.config.year);
            }
            KeyCode::Char('i') => {
                self.config.include_indirect = !self.config.include_indirect;
                self.status = format!("indirect impacts: {}", on_off(self.config.include_indirect));
            }
            KeyCode::Char('r') if self.cache.state() == LoadState::Loading => {
                self.status = format!("Loading datasets from {}...", self.cache.source());
                self.pending = Some(Pending::Load);
            }
            KeyCode::Char('e') => self.export_snapshot(),
            _ => match self.tab {
                Tab::Societal => self.handle_societal_key(code),
                Tab::Household => self.handle_household_key(code),
            },
        }
        false
    }

    fn handle_societal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('m') | KeyCode::Right => self.config.metric = self.config.metric.next(),
            KeyCode::Char('M') | KeyCode::Left => self.config.metric = self.config.metric.prev(),
            _ => return,
        }
        self.status = format!("metric: {}", self.config.metric.label());
    }

    fn handle_household_key(&mut self, code: KeyCode) {
        let fields = visible_fields(&self.form);
        match code {
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_field + 1 < fields.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                if let Some(&field) = fields.get(self.selected_field) {
                    let delta = if code == KeyCode::Left { -1 } else { 1 };
                    adjust(&mut self.form, field, delta);
                }
                // Toggles can hide fields below the cursor.
                let len = visible_fields(&self.form).len();
                self.selected_field = self.selected_field.min(len.saturating_sub(1));
            }
            KeyCode::Enter => {
                if self.household.is_busy() {
                    self.status = HouseholdError::Busy.to_string();
                } else {
                    self.status = "Calculating household impacts...".to_string();
                    self.pending = Some(Pending::Calculate);
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                if let Some(run) = &self.household_run {
                    let metrics = household_metrics(&run.results);
                    let delta = if code == KeyCode::Char('m') { 1 } else { -1 };
                    self.household_metric = cycle_metric(&metrics, &self.household_metric, delta);
                    self.status = format!("household metric: {}", self.household_metric);
                }
            }
            _ => {}
        }
    }

    fn export_snapshot(&mut self) {
        let Some((manifesto, decile)) = self.cache.loaded() else {
            self.status = "No data loaded to export.".to_string();
            return;
        };
        let snapshot =
            crate::io::build_snapshot(&self.config, manifesto, decile, &self.cache.source().to_string());
        let path = std::path::PathBuf::from(format!(
            "manifestos_{}_{}.json",
            self.config.year,
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        self.status = match crate::io::write_snapshot_json(&path, &snapshot) {
            Ok(()) => format!("Wrote snapshot: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.tab {
            Tab::Societal => self.draw_societal(frame, chunks[1]),
            Tab::Household => self.draw_household(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Line::from(vec![
            Span::styled("manifestos", Style::default().fg(Color::Cyan)),
            Span::raw(" | UK general election manifesto impacts"),
        ]);
        frame.render_widget(Paragraph::new(title), rows[0]);

        let state = match self.cache.state() {
            LoadState::Ready => "ready",
            LoadState::Loading if self.load_error.is_some() => "load failed",
            LoadState::Loading => "loading",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(
                    "year: {} | indirect impacts: {} | metric: {} | data: {} ({state})",
                    self.config.year,
                    on_off(self.config.include_indirect),
                    self.config.metric.label(),
                    self.cache.source(),
                ),
                Style::default().fg(Color::Gray),
            ))),
            rows[1],
        );

        let selected = match self.tab {
            Tab::Societal => 0,
            Tab::Household => 1,
        };
        let tabs = Tabs::new(vec!["Societal impacts", "Your household"])
            .select(selected)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, rows[2]);
    }

    fn draw_societal(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some((manifesto, decile)) = self.cache.loaded() else {
            self.draw_not_ready(frame, area);
            return;
        };

        let rows = filter_manifesto_data(manifesto, self.config.year, self.config.include_indirect);
        let deciles = filter_decile_data(decile, self.config.year, self.config.include_indirect);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        // Decile chart.
        let block = Block::default()
            .title("Relative change in household income by decile")
            .borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);
        let (chart_rect, legend_rect) = split_last_line(inner);
        let pivot = pivot_deciles(&deciles);
        frame.render_widget(
            DecileChart {
                pivot: &pivot,
                bound: y_bound(&deciles),
                fmt_y: format_pct_tick,
            },
            chart_rect,
        );
        frame.render_widget(Paragraph::new(legend()), legend_rect);

        // Comparison table.
        let header = Row::new(
            std::iter::once(Cell::from("Metric")).chain(Party::ALL.iter().map(|p| Cell::from(p.label()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));
        let table_rows = impact_table(&rows).into_iter().map(|row| {
            let style = if row.metric == self.config.metric {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(std::iter::once(row.label.to_string()).chain(row.values)).style(style)
        });
        let table = Table::new(
            table_rows,
            [Constraint::Length(26), Constraint::Min(8), Constraint::Min(8), Constraint::Min(8)],
        )
        .header(header)
        .block(Block::default().title("Party comparison").borders(Borders::ALL));
        frame.render_widget(table, bottom[0]);

        // Metric bar chart.
        let metric = self.config.metric;
        let chart = party_chart(&rows, metric);
        let fmt_y = match metric.unit() {
            MetricUnit::Billions => fmt_axis_bn as fn(f64) -> String,
            MetricUnit::Percent => fmt_axis_pct,
        };
        let values = chart
            .bars
            .iter()
            .map(|b| format!("{} {}", b.party.short_label(), format_metric(b.value, metric.unit())))
            .collect::<Vec<_>>()
            .join(" | ");
        self.draw_bar_chart(frame, bottom[1], &headline(&chart, metric), &chart, fmt_y, values);
    }

    fn draw_household(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        let fields = visible_fields(&self.form);
        let items: Vec<ListItem> = fields.iter().map(|&f| ListItem::new(field_text(&self.form, f))).collect();
        let list = List::new(items)
            .block(Block::default().title("Your household").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field.min(fields.len().saturating_sub(1))));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let Some(run) = &self.household_run else {
            let msg = if self.household.is_configured() {
                "Adjust the form, then press Enter to calculate.".to_string()
            } else {
                HouseholdError::NotConfigured.to_string()
            };
            let p = Paragraph::new(msg)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title("Impact on your household").borders(Borders::ALL));
            frame.render_widget(p, chunks[1]);
            return;
        };

        let chart = household_chart(&run.results, &self.household_metric);
        let mut values = chart
            .bars
            .iter()
            .map(|b| format!("{} {}", b.party.short_label(), format_gbp(b.value)))
            .collect::<Vec<_>>()
            .join(" | ");
        if run.year != self.config.year || run.include_indirect != self.config.include_indirect {
            values.push_str(&format!(
                "  (calculated for {}, press Enter to update)",
                run.year
            ));
        }
        let title = format!("{}: {}", self.household_metric, household_headline(&chart));
        self.draw_bar_chart(frame, chunks[1], &title, &chart, format_gbp, values);
    }

    fn draw_bar_chart(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        chart: &PartyChart,
        fmt_y: fn(f64) -> String,
        values: String,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (chart_rect, values_rect) = split_last_line(inner);
        frame.render_widget(PartyBarChart { bars: &chart.bars, fmt_y }, chart_rect);
        frame.render_widget(
            Paragraph::new(values).style(Style::default().fg(Color::Gray)),
            values_rect,
        );
    }

    fn draw_not_ready(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match &self.load_error {
            Some(err) => Text::from(vec![
                Line::from(Span::styled("Failed to load data.", Style::default().fg(Color::Red))),
                Line::from(err.as_str()),
                Line::from("Press r to retry."),
            ]),
            None => Text::from(Line::from(Span::styled(
                "Loading data...",
                Style::default().fg(Color::Yellow),
            ))),
        };
        frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.tab {
            Tab::Societal => "y/Y year  i indirect  m/M metric  Tab household  e export  q quit",
            Tab::Household => "↑/↓ select  ←/→ adjust  Enter calculate  m metric  Tab societal  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn legend() -> Line<'static> {
    let mut spans = Vec::new();
    for party in Party::ALL {
        let (r, g, b) = party.color();
        spans.push(Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))));
        spans.push(Span::raw(format!("{}  ", party.label())));
    }
    Line::from(spans)
}

/// Split off the bottom line of `area` for a caption.
fn split_last_line(area: Rect) -> (Rect, Rect) {
    if area.height < 2 {
        return (area, Rect { height: 0, ..area });
    }
    let chart = Rect {
        height: area.height - 1,
        ..area
    };
    let caption = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    (chart, caption)
}

/// Step through `metrics` from `current`, wrapping. Unknown `current` starts at the first.
fn cycle_metric(metrics: &[String], current: &str, delta: i32) -> String {
    if metrics.is_empty() {
        return current.to_string();
    }
    let n = metrics.len() as i64;
    let next = match metrics.iter().position(|m| m == current) {
        Some(pos) => (pos as i64 + i64::from(delta)).rem_euclid(n),
        None => 0,
    };
    metrics[next as usize].clone()
}

fn fmt_axis_bn(v: f64) -> String {
    format_axis_value(round1(v), MetricUnit::Billions)
}

fn fmt_axis_pct(v: f64) -> String {
    format_axis_value(round1(v), MetricUnit::Percent)
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::form::Field;
    use super::*;
    use crate::data::DataSource;
    use crate::domain::MetricKey;

    fn app() -> App {
        let dir = std::env::temp_dir().join("manifestos-tui-test-missing");
        App::new(
            ViewConfig::default(),
            DatasetCache::new(DataSource::Dir(dir)),
            HouseholdClient::new(None),
        )
    }

    #[test]
    fn cycle_metric_wraps_both_ways() {
        let metrics = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(cycle_metric(&metrics, "C", 1), "A");
        assert_eq!(cycle_metric(&metrics, "A", -1), "C");
        assert_eq!(cycle_metric(&metrics, "missing", 1), "A");
        assert_eq!(cycle_metric(&[], "Net change", 1), "Net change");
    }

    #[test]
    fn split_last_line_reserves_caption() {
        let (chart, caption) = split_last_line(Rect::new(0, 0, 40, 10));
        assert_eq!(chart.height, 9);
        assert_eq!(caption.y, 9);
        assert_eq!(caption.height, 1);
    }

    #[test]
    fn selection_keys_update_shared_config() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('y')));
        assert_eq!(app.config.year, 2025);
        app.handle_key(KeyCode::Char('i'));
        assert!(!app.config.include_indirect);
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.config.metric, MetricKey::Benefits);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.tab, Tab::Household);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn failed_load_is_reported_and_retryable() {
        let mut app = app();
        let pending = app.pending.take();
        assert_eq!(pending, Some(Pending::Load));
        app.run_pending(Pending::Load);
        assert!(app.load_error.is_some());
        assert!(app.status.contains("retry"));

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.pending, Some(Pending::Load));
    }

    #[test]
    fn unconfigured_household_reports_message() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.pending, Some(Pending::Calculate));
        app.run_pending(Pending::Calculate);
        assert!(app.status.contains("HOUSEHOLD_API_URL"));
        assert!(app.household_run.is_none());
    }

    #[test]
    fn household_cursor_stays_on_visible_fields() {
        let mut app = app();
        app.tab = Tab::Household;
        // Move to "Partner", reveal its fields, move into them, then hide them.
        let partner = visible_fields(&app.form)
            .iter()
            .position(|&f| f == Field::HasPartner)
            .unwrap();
        app.selected_field = partner;
        app.handle_key(KeyCode::Right);
        assert!(app.form.has_partner);
        for _ in 0..20 {
            app.handle_key(KeyCode::Down);
        }
        let len = visible_fields(&app.form).len();
        assert_eq!(app.selected_field, len - 1);
        app.selected_field = partner;
        app.handle_key(KeyCode::Left);
        assert!(!app.form.has_partner);
        assert!(app.selected_field < visible_fields(&app.form).len());
    }
}
