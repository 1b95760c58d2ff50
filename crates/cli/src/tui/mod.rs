pub mod data;

use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar as ChartBar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph},
    Frame, Terminal,
};

use caseboard_engine::filter::ALL;
use caseboard_engine::{CaseFilter, FilteredView, Selection, Snapshot};

use crate::util;
use data::MergedGrid;

const CAPTION: &str = "Dashboard updates with live data from the configured sources";

// Fixed-height rows around the merged table: title, filters, metrics,
// charts, caption, status, plus the table's borders and header.
const METRICS_HEIGHT: u16 = 3;
const CHARTS_HEIGHT: u16 = 10;
const CHROME_HEIGHT: u16 = 1 + 1 + METRICS_HEIGHT + CHARTS_HEIGHT + 1 + 1 + 3;

enum Notice {
    Info(String),
    Error(String),
}

struct TuiApp {
    snapshot: Snapshot,
    view: FilteredView,
    grid: MergedGrid,
    /// Indexes into `snapshot.type_options` / `status_options` (0 = All)
    type_idx: usize,
    status_idx: usize,
    cursor_row: usize,
    scroll_row: usize,
    sources_label: String,
    loaded_at: String,
    notice: Option<Notice>,
    reload_requested: bool,
    should_quit: bool,
    show_help: bool,
}

fn selection(options: &[String], idx: usize) -> Selection {
    match options.get(idx) {
        Some(v) if v != ALL => Selection::exact(v.clone()),
        _ => Selection::All,
    }
}

fn step(idx: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

fn now_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl TuiApp {
    fn new(snapshot: Snapshot, sources_label: String) -> Self {
        let view = snapshot.view(&CaseFilter::default());
        let grid = MergedGrid::from_merged(&snapshot.merged);
        Self {
            snapshot,
            view,
            grid,
            type_idx: 0,
            status_idx: 0,
            cursor_row: 0,
            scroll_row: 0,
            sources_label,
            loaded_at: now_label(),
            notice: None,
            reload_requested: false,
            should_quit: false,
            show_help: false,
        }
    }

    fn filter(&self) -> CaseFilter {
        CaseFilter::new(
            selection(&self.snapshot.type_options, self.type_idx),
            selection(&self.snapshot.status_options, self.status_idx),
        )
    }

    fn refresh_view(&mut self) {
        self.view = self.snapshot.view(&self.filter());
    }

    fn cycle_type(&mut self, forward: bool) {
        self.type_idx = step(self.type_idx, self.snapshot.type_options.len(), forward);
        self.refresh_view();
    }

    fn cycle_status(&mut self, forward: bool) {
        self.status_idx = step(self.status_idx, self.snapshot.status_options.len(), forward);
        self.refresh_view();
    }

    fn reset_filters(&mut self) {
        self.type_idx = 0;
        self.status_idx = 0;
        self.refresh_view();
    }

    /// Swap in a freshly loaded snapshot. On failure the current one stays.
    /// Selected filter values survive when the new data still has them.
    fn apply_reload(&mut self, result: Result<Snapshot, String>) {
        match result {
            Ok(snapshot) => {
                let keep = |options: &[String], old: &str| {
                    options.iter().position(|o| o == old).unwrap_or(0)
                };
                let old_type = self.filter().case_type.label().to_string();
                let old_status = self.filter().case_status.label().to_string();
                self.type_idx = keep(&snapshot.type_options, &old_type);
                self.status_idx = keep(&snapshot.status_options, &old_status);

                self.grid = MergedGrid::from_merged(&snapshot.merged);
                self.snapshot = snapshot;
                self.refresh_view();
                self.cursor_row = self.cursor_row.min(self.grid.num_rows().saturating_sub(1));
                self.scroll_row = self.scroll_row.min(self.cursor_row);
                self.loaded_at = now_label();
                self.notice = Some(Notice::Info(format!("reloaded {} rows", self.grid.num_rows())));
            }
            Err(message) => {
                self.notice = Some(Notice::Error(format!("reload failed: {}", message)));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('t') => self.cycle_type(true),
            KeyCode::Char('T') => self.cycle_type(false),
            KeyCode::Char('s') => self.cycle_status(true),
            KeyCode::Char('S') => self.cycle_status(false),
            KeyCode::Char('a') => self.reset_filters(),
            KeyCode::Char('r') => self.reload_requested = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-20),
            KeyCode::PageDown => self.move_cursor(20),
            KeyCode::Home | KeyCode::Char('g') => self.cursor_row = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor_row = self.grid.num_rows().saturating_sub(1);
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let last = self.grid.num_rows().saturating_sub(1) as i64;
        self.cursor_row = (self.cursor_row as i64 + delta).clamp(0, last) as usize;
    }

    fn ensure_visible(&mut self, visible_rows: usize) {
        if self.cursor_row < self.scroll_row {
            self.scroll_row = self.cursor_row;
        }
        if visible_rows > 0 && self.cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = self.cursor_row + 1 - visible_rows;
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(METRICS_HEIGHT),
            Constraint::Length(CHARTS_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_filters(frame, chunks[1]);
        self.draw_metrics(frame, chunks[2]);

        let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);
        self.draw_type_chart(frame, charts[0]);
        self.draw_status_chart(frame, charts[1]);

        self.draw_table(frame, chunks[4]);
        frame.render_widget(
            Paragraph::new(CAPTION).style(Style::default().fg(Color::DarkGray)),
            chunks[5],
        );
        self.draw_status(frame, chunks[6]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Legal Intake Dashboard | {} | updated {} ",
            self.sources_label, self.loaded_at
        );
        let para = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let filter = &self.view.filter;
        let value = |s: &Selection| {
            let style = if s.is_all() {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            };
            Span::styled(format!("[{}]", s.label()), style)
        };
        let hint = Style::default().fg(Color::DarkGray);
        let line = Line::from(vec![
            Span::raw(" Case Type: "),
            value(&filter.case_type),
            Span::styled(" t/T", hint),
            Span::raw("   Case Status: "),
            value(&filter.case_status),
            Span::styled(" s/S", hint),
            Span::styled("   a: reset", hint),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_metrics(&self, frame: &mut Frame, area: Rect) {
        let m = &self.view.metrics;
        let cards = [
            ("Total Cases", m.total_cases, Color::Cyan),
            ("Open Cases", m.open, Color::Green),
            ("Under Investigation", m.under_investigation, Color::Yellow),
            ("Unique Clients", m.unique_clients, Color::Magenta),
        ];
        let slots = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((label, value, color), slot) in cards.iter().zip(slots.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(*color))
                .title(format!(" {} ", label));
            let para = Paragraph::new(Span::styled(
                value.to_string(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(para, *slot);
        }
    }

    fn draw_type_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Cases by Type ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let slices = &self.view.breakdown.by_type;
        if slices.is_empty() {
            frame.render_widget(
                Paragraph::new("(no cases)").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let palette = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta, Color::Blue, Color::Red];
        let rows = inner.height as usize;
        let overflow = slices.len() > rows;
        let shown = if overflow { rows.saturating_sub(1) } else { slices.len() };

        for (i, slice) in slices.iter().take(shown).enumerate() {
            let line = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(palette[i % palette.len()]).bg(Color::Black))
                .ratio((slice.percent / 100.0).clamp(0.0, 1.0))
                .label(format!("{} {} ({:.1}%)", slice.label, slice.count, slice.percent));
            frame.render_widget(gauge, line);
        }
        if overflow && rows > 0 {
            let line = Rect::new(inner.x, inner.y + shown as u16, inner.width, 1);
            let more = format!("+{} more types", slices.len() - shown);
            frame.render_widget(
                Paragraph::new(more).style(Style::default().fg(Color::DarkGray)),
                line,
            );
        }
    }

    fn draw_status_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Cases by Status ");
        let bars_data = &self.view.breakdown.by_status;
        if bars_data.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("(no cases)").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let inner_width = area.width.saturating_sub(2) as usize;
        let bar_width = (inner_width / bars_data.len()).saturating_sub(1).clamp(3, 14) as u16;
        let bars: Vec<ChartBar> = bars_data
            .iter()
            .map(|b| {
                ChartBar::default()
                    .value(b.count as u64)
                    .label(Line::from(util::truncate_display(&b.label, bar_width as usize)))
                    .style(Style::default().fg(Color::Cyan))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(1)
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Cases (with Personal Info): {} rows ", self.grid.num_rows()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let grid = &self.grid;
        let ncols = grid.visible_columns(inner.width as usize);

        let mut header_spans = Vec::with_capacity(ncols);
        for c in 0..ncols {
            let w = grid.col_widths[c];
            header_spans.push(Span::styled(
                format!("{} ", util::pad_right(&grid.col_names[c], w)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }

        let visible_rows = inner.height.saturating_sub(1) as usize;
        let end_row = (self.scroll_row + visible_rows).min(grid.num_rows());

        let mut lines: Vec<Line> = Vec::with_capacity(visible_rows + 1);
        lines.push(Line::from(header_spans));

        if grid.num_rows() == 0 {
            lines.push(Line::from(Span::styled("(no cases)", Style::default().fg(Color::DarkGray))));
        }

        for r in self.scroll_row..end_row {
            let style = if r == self.cursor_row {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let spans: Vec<Span> = (0..ncols)
                .map(|c| {
                    let value = grid.rows[r].get(c).map(|s| s.as_str()).unwrap_or("");
                    Span::styled(format!("{} ", util::pad_right(value, grid.col_widths[c])), style)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let d = &self.snapshot.diagnostics;
        let (left, style) = match &self.notice {
            Some(Notice::Error(msg)) => (
                format!(" {}", msg),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            Some(Notice::Info(msg)) => (
                format!(" {}", msg),
                Style::default().fg(Color::Black).bg(Color::DarkGray),
            ),
            None => (
                format!(
                    " {} unmatched | {} fanned out (+{} rows) | {} malformed lists | {} unknown ids",
                    d.unmatched_cases,
                    d.fanned_out_cases.len(),
                    d.extra_rows,
                    d.expansion.malformed_fields,
                    d.orphan_case_ids.len()
                ),
                Style::default().fg(Color::Black).bg(Color::DarkGray),
            ),
        };
        let right = format!(
            "Row {}/{}  r: reload  ?: help ",
            (self.cursor_row + 1).min(self.grid.num_rows()),
            self.grid.num_rows()
        );
        let padding = (area.width as usize)
            .saturating_sub(util::display_width(&left) + util::display_width(&right));
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status, style))).style(style),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Filters",
            "  -------",
            "  t / T             Next/prev case type",
            "  s / S             Next/prev case status",
            "  a                 Reset both to All",
            "",
            "  Table",
            "  -----",
            "  arrows / jk       Move cursor",
            "  PgUp / PgDn       Page up/down",
            "  Home / g          First row",
            "  End  / G          Last row",
            "",
            "  General",
            "  -------",
            "  r                 Reload both sources",
            "  q / Esc           Quit",
            "  ?                 Toggle this help",
            "",
        ];
        let help_width: u16 = 46;
        let help_height: u16 = help_lines.len() as u16 + 2;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the interactive dashboard. `reload` runs a full fetch-and-join cycle.
pub fn run(
    snapshot: Snapshot,
    sources_label: String,
    mut reload: impl FnMut() -> Result<Snapshot, String>,
) -> Result<(), String> {
    let app = TuiApp::new(snapshot, sources_label);
    run_app(app, &mut reload)
}

fn run_app(
    mut app: TuiApp,
    reload: &mut impl FnMut() -> Result<Snapshot, String>,
) -> Result<(), String> {
    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        let height = terminal.size().map(|s| s.height).unwrap_or_default();
        app.ensure_visible(height.saturating_sub(CHROME_HEIGHT) as usize);

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if app.reload_requested {
            app.reload_requested = false;
            app.notice = Some(Notice::Info("reloading...".to_string()));
            terminal
                .draw(|frame| app.draw(frame))
                .map_err(|e| format!("draw error: {}", e))?;
            let result = reload();
            app.apply_reload(result);
            continue;
        }

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) = event::read().map_err(|e| format!("event read error: {}", e))? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
