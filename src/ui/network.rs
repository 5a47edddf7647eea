//! Network interface table with derived throughput rates.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use crate::app::App;
use crate::poll::net_key;
use crate::ui::common::{format_bytes, format_rate};

/// Placeholder shown instead of IP addresses while they are hidden.
const MASKED_VALUE: &str = "••••••••";

/// Render the network view: interface table on top, detail panel with
/// a throughput sparkline for the selected interface below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let interfaces = app.scheduler.interfaces();

    if interfaces.is_empty() {
        let paragraph = Paragraph::new("Waiting for interface readings...")
            .style(Style::default().fg(app.theme.border).add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Min(6), Constraint::Length(8)]).split(area);

    render_table(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Interface"),
        Cell::from("State"),
        Cell::from("Rx/s"),
        Cell::from("Tx/s"),
        Cell::from("Rx total"),
        Cell::from("Tx total"),
        Cell::from("Errs"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .scheduler
        .interfaces()
        .iter()
        .enumerate()
        .map(|(i, (info, sample))| {
            let state = if info.up {
                Span::styled("up", Style::default().fg(app.theme.healthy))
            } else {
                Span::styled("down", Style::default().fg(app.theme.border))
            };
            let style = if i == app.selected_interface {
                app.theme.selected
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(info.name.clone()),
                Cell::from(state),
                Cell::from(format_rate(sample.rx_bytes_per_sec)),
                Cell::from(format_rate(sample.tx_bytes_per_sec)),
                Cell::from(format_bytes(info.bytes_received)),
                Cell::from(format_bytes(info.bytes_transmitted)),
                Cell::from(info.errors.to_string()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Interfaces ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some((info, sample)) = app.scheduler.interfaces().get(app.selected_interface) else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let addresses = if info.ip_addresses.is_empty() {
        "none".to_string()
    } else if app.view_state.reveal_sensitive() {
        info.ip_addresses.join(", ")
    } else {
        MASKED_VALUE.to_string()
    };

    let dim = Style::default().add_modifier(Modifier::DIM);
    let lines = vec![
        Line::from(vec![
            Span::styled("Packets rx/tx  ", dim),
            Span::raw(format!(
                "{} / {}",
                info.packets_received, info.packets_transmitted
            )),
        ]),
        Line::from(vec![
            Span::styled("Errors/drops   ", dim),
            Span::raw(format!("{} / {}", info.errors, info.drops)),
        ]),
        Line::from(vec![Span::styled("Addresses      ", dim), Span::raw(addresses)]),
        Line::from(vec![
            Span::styled("               ", dim),
            Span::styled(
                if app.view_state.reveal_sensitive() {
                    "press s to hide"
                } else {
                    "press s to reveal"
                },
                dim,
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" {} ", info.name))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(paragraph, chunks[0]);

    let data: Vec<u64> = app
        .scheduler
        .history(&net_key("rx", &info.name))
        .map(|h| h.as_sparkline())
        .unwrap_or_default();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(format!(" rx {} ", format_rate(sample.rx_bytes_per_sec)))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .data(&data)
        .style(Style::default().fg(app.theme.highlight));
    frame.render_widget(sparkline, chunks[1]);
}
