//! Gauge + sparkline views for CPU, memory, GPU, and disks.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Sparkline, Table},
    Frame,
};

use crate::app::{App, Category};
use crate::data::HistoryBuffer;
use crate::poll::{KEY_CPU, KEY_GPU, KEY_MEMORY};
use crate::ui::common::{format_bytes, format_uptime};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the active category's meter view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.category() {
        Category::Cpu => render_cpu(frame, app, area),
        Category::Memory => render_memory(frame, app, area),
        Category::Gpu => render_gpu(frame, app, area),
        Category::Disks => render_disks(frame, app, area),
        // Network has its own module.
        Category::Network => {}
    }
}

/// Render a percent trend as inline sparkline characters, 0-100 mapped
/// onto 8 bar levels.
pub fn percent_trend(buffer: &HistoryBuffer) -> String {
    buffer
        .iter()
        .map(|v| {
            let level = ((v.clamp(0.0, 100.0) / 100.0) * 7.0).round() as usize;
            SPARKLINE_CHARS[level.min(7)]
        })
        .collect()
}

fn meter_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::vertical([
        Constraint::Length(3), // gauge
        Constraint::Min(5),    // history chart
        Constraint::Length(7), // details
    ])
    .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn render_usage_meter(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    percentage: f64,
    history_key: &str,
    details: Vec<Line>,
) {
    let [gauge_area, chart_area, details_area] = meter_layout(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .gauge_style(app.theme.usage_style(percentage))
        .ratio((percentage / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", percentage));
    frame.render_widget(gauge, gauge_area);

    let data: Vec<u64> = app
        .scheduler
        .history(history_key)
        .map(|h| h.as_sparkline())
        .unwrap_or_default();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(" last 60 samples ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .data(&data)
        .max(100)
        .style(Style::default().fg(app.theme.highlight));
    frame.render_widget(sparkline, chart_area);

    let paragraph = Paragraph::new(details).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(paragraph, details_area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().add_modifier(Modifier::DIM)),
        Span::raw(value),
    ])
}

fn render_cpu(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = app.scheduler.latest() else {
        render_loading(frame, app, area);
        return;
    };
    let cpu = &snapshot.cpu;

    let details = vec![
        detail_line("Model", cpu.brand.clone()),
        detail_line("Cores", cpu.cores.to_string()),
        detail_line("Frequency", format!("{} MHz", cpu.frequency_mhz)),
        detail_line(
            "Temperature",
            cpu.temperature.map_or("n/a".to_string(), |t| format!("{:.1} °C", t)),
        ),
        detail_line("Uptime", format_uptime(cpu.uptime_secs)),
    ];

    render_usage_meter(
        frame,
        app,
        area,
        "CPU",
        f64::from(cpu.usage_percent),
        KEY_CPU,
        details,
    );
}

fn render_memory(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = app.scheduler.latest() else {
        render_loading(frame, app, area);
        return;
    };
    let memory = &snapshot.memory;

    let details = vec![
        detail_line("In use", format_bytes(memory.used)),
        detail_line("Available", format_bytes(memory.available)),
        detail_line("Total", format_bytes(memory.total)),
    ];

    render_usage_meter(
        frame,
        app,
        area,
        "Memory",
        memory.percentage,
        KEY_MEMORY,
        details,
    );
}

fn render_gpu(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = app.scheduler.latest() else {
        render_loading(frame, app, area);
        return;
    };
    let gpu = &snapshot.gpu;

    let title = if gpu.simulated { "GPU (simulated)" } else { "GPU" };
    let details = vec![
        detail_line(
            "VRAM used",
            gpu.vram_used.map_or("n/a".to_string(), format_bytes),
        ),
        detail_line(
            "Temperature",
            gpu.temperature.map_or("n/a".to_string(), |t| format!("{:.1} °C", t)),
        ),
        detail_line(
            "Source",
            if gpu.simulated {
                "simulated (no GPU probe available)".to_string()
            } else {
                "hardware".to_string()
            },
        ),
    ];

    render_usage_meter(frame, app, area, title, gpu.usage_percent, KEY_GPU, details);
}

fn render_disks(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = app.scheduler.latest() else {
        render_loading(frame, app, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Disk"),
        Cell::from("Mount"),
        Cell::from("Used"),
        Cell::from("Total"),
        Cell::from("Use%"),
        Cell::from("Trend"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = snapshot
        .disks
        .iter()
        .map(|disk| {
            let trend = app
                .scheduler
                .history(&disk.entity_key())
                .map(percent_trend)
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(disk.name.clone()),
                Cell::from(disk.mount_point.clone()),
                Cell::from(format_bytes(disk.used)),
                Cell::from(format_bytes(disk.total)),
                Cell::from(Span::styled(
                    format!("{:>5.1}%", disk.percentage),
                    app.theme.usage_style(disk.percentage),
                )),
                Cell::from(trend),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Disks ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new("Waiting for first snapshot...")
        .style(Style::default().fg(app.theme.border).add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_trend_levels() {
        let mut buffer = HistoryBuffer::with_capacity(3);
        buffer.push(0.0);
        buffer.push(50.0);
        buffer.push(100.0);
        let trend = percent_trend(&buffer);
        let chars: Vec<char> = trend.chars().collect();
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[0], SPARKLINE_CHARS[0]);
        assert_eq!(chars[2], SPARKLINE_CHARS[7]);
    }

    #[test]
    fn test_percent_trend_clamps_out_of_range() {
        let mut buffer = HistoryBuffer::with_capacity(2);
        buffer.push(-10.0);
        buffer.push(400.0);
        let chars: Vec<char> = percent_trend(&buffer).chars().collect();
        assert_eq!(chars[0], SPARKLINE_CHARS[0]);
        assert_eq!(chars[1], SPARKLINE_CHARS[7]);
    }
}
