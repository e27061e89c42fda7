// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based blur chart viewer
//!
//! Renders swept circle-of-confusion curves as a line chart with the
//! acceptable-blur threshold, on the alternate screen.

use crate::config::CameraProfile;
use crate::constants::{chart, units};
use crate::errors::{AppError, AppResult};
use crate::sweep::{self, BlurUnit, DistanceGrid, FocusPolicy, SweepRequest, SweepSeries};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};
use std::io::{self, stdout};
use std::time::Duration;
use tracing::debug;

/// Legend color cycle, reused from the start when there are more curves
const SERIES_COLORS: [Color; 9] = [
    Color::Red,
    Color::White,
    Color::Blue,
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Rgb(210, 105, 30),
    Color::Yellow,
    Color::Rgb(85, 107, 47),
];

/// Run the interactive blur chart
pub fn run(
    profile: &CameraProfile,
    request: &SweepRequest,
    policy: FocusPolicy,
    unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, profile, request, policy, unit, grid);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    profile: &CameraProfile,
    request: &SweepRequest,
    policy: FocusPolicy,
    mut unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<()> {
    let mut view = ChartView::build(profile, request, policy, unit, grid)?;
    let mut show_help = false;
    let mut status_message = build_status_message(unit);

    loop {
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let chart_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };

            f.render_widget(&view, chart_area);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let status = StatusBar {
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // The chart is static; the poll timeout only paces redraws on resize
        if event::poll(Duration::from_millis(60))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C to quit
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            // 'u' to toggle the blur unit
            if key.code == KeyCode::Char('u') {
                show_help = false;
                unit = unit.toggled();
                view = ChartView::build(profile, request, policy, unit, grid)?;
                status_message = build_status_message(unit);
            }

            // 'h' to toggle help
            if key.code == KeyCode::Char('h') {
                show_help = !show_help;
                status_message = if show_help {
                    build_help_message()
                } else {
                    build_status_message(unit)
                };
            }

            // 'q' or Esc also quits
            if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                break;
            }
        }
    }

    Ok(())
}

fn build_status_message(unit: BlurUnit) -> String {
    format!(
        "unit: {} | 'u' toggle unit | 'h' help | 'q' quit",
        unit.display_name()
    )
}

fn build_help_message() -> String {
    "u: Toggle mm/pixels | h: Toggle help | q/Esc/Ctrl+C: Quit".to_string()
}

/// Widget that renders the swept series as a line chart
struct ChartView {
    series: Vec<SweepSeries>,
    threshold_label: String,
    threshold_points: Vec<(f64, f64)>,
    title: String,
    unit: BlurUnit,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartView {
    fn build(
        profile: &CameraProfile,
        request: &SweepRequest,
        policy: FocusPolicy,
        unit: BlurUnit,
        grid: &DistanceGrid,
    ) -> AppResult<ChartView> {
        let series = request.build(profile, policy, unit, grid)?;
        if series.is_empty() || series[0].points.is_empty() {
            return Err(AppError::Other("nothing to chart".into()));
        }

        let threshold = sweep::threshold_in_unit(profile, unit)?;
        let first = &series[0].points;
        let x_bounds = [first[0].0, first[first.len() - 1].0];

        // The blur disk grows without bound toward the lens; cap the axis so
        // the in-focus region stays readable.
        let y_max = match unit {
            BlurUnit::Pixels => chart::BLUR_AXIS_MAX_PX,
            BlurUnit::Millimetres => {
                chart::BLUR_AXIS_MAX_PX * profile.pixel_pitch_um / units::UM_PER_MM
            }
        };

        debug!(
            series = series.len(),
            unit = unit.display_name(),
            "built chart view"
        );

        Ok(ChartView {
            series,
            threshold_label: format!("Acceptable blur [{}]", unit.display_name()),
            threshold_points: vec![(x_bounds[0], threshold), (x_bounds[1], threshold)],
            title: format!("{} ({})", request.title(), profile.name),
            unit,
            x_bounds,
            y_bounds: [0.0, y_max],
        })
    }

    fn blur_label(&self, value: f64) -> String {
        match self.unit {
            BlurUnit::Pixels => format!("{:.1}", value),
            BlurUnit::Millimetres => format!("{:.3}", value),
        }
    }
}

impl Widget for &ChartView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut datasets = Vec::with_capacity(self.series.len() + 1);
        for (i, series) in self.series.iter().enumerate() {
            datasets.push(
                Dataset::default()
                    .name(series.label.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                    .data(&series.points),
            );
        }
        datasets.push(
            Dataset::default()
                .name(self.threshold_label.clone())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Red))
                .data(&self.threshold_points),
        );

        let x_mid = (self.x_bounds[0] + self.x_bounds[1]) / 2.0;
        let y_mid = (self.y_bounds[0] + self.y_bounds[1]) / 2.0;

        let chart = Chart::new(datasets)
            .block(Block::bordered().title(self.title.as_str()))
            .x_axis(
                Axis::default()
                    .title("Distance [m]")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(self.x_bounds)
                    .labels([
                        format!("{:.2}", self.x_bounds[0]),
                        format!("{:.1}", x_mid),
                        format!("{:.1}", self.x_bounds[1]),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(self.unit.axis_label())
                    .style(Style::default().fg(Color::Gray))
                    .bounds(self.y_bounds)
                    .labels([
                        self.blur_label(self.y_bounds[0]),
                        self.blur_label(y_mid),
                        self.blur_label(self.y_bounds[1]),
                    ]),
            );

        chart.render(area, buf);
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Render text
        let text = if self.message.len() > area.width as usize {
            &self.message[..area.width as usize]
        } else {
            self.message
        };

        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
