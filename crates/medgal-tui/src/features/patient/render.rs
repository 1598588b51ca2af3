//! Patient dashboard view.

use medgal_core::types::RecordSummary;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use super::state::{PatientSection, PatientState};
use crate::common::{format_wire_date, truncate_with_ellipsis};
use crate::state::TuiState;

pub fn render_patient(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_section_tabs(frame, &tui.patient, chunks[0]);

    match tui.patient.section {
        PatientSection::Overview => render_overview(frame, &tui.patient, chunks[1]),
        PatientSection::Records => render_records(frame, &tui.patient, chunks[1]),
        PatientSection::Search => render_search(frame, &tui.patient, chunks[1]),
        PatientSection::Shared => render_shared(frame, tui, chunks[1]),
        PatientSection::Profile => render_profile(frame, &tui.patient, chunks[1]),
    }
}

fn render_section_tabs(frame: &mut Frame, patient: &PatientState, area: Rect) {
    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ")];
    for (index, section) in PatientSection::all().iter().enumerate() {
        let label = format!(" {}:{} ", index + 1, section.label());
        if *section == patient.section {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_overview(frame: &mut Frame, patient: &PatientState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    // Stat tiles
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[0]);

    if let Some(error) = &patient.stats_error {
        render_inline_error(frame, error, chunks[0]);
    } else {
        let stats = patient.stats.unwrap_or_default();
        render_stat_tile(frame, "Total Records", stats.total_records, tiles[0]);
        render_stat_tile(frame, "Verified", stats.verified_records, tiles[1]);
        render_stat_tile(frame, "Pending", stats.pending_records, tiles[2]);
        render_stat_tile(frame, "Shared", stats.shared_records, tiles[3]);
    }

    let block = Block::default().title(" Recent Records ").borders(Borders::ALL);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);
    if let Some(error) = &patient.records_error {
        render_inline_error(frame, error, inner);
    } else {
        render_record_table(frame, &patient.records, patient.selected, false, inner);
    }
}

fn render_records(frame: &mut Frame, patient: &PatientState, area: Rect) {
    let block = Block::default()
        .title(" My Records ")
        .borders(Borders::ALL)
        .title_bottom(" ↑/↓ select · Enter details · p preview · d download ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = &patient.records_error {
        render_inline_error(frame, error, inner);
        return;
    }
    if patient.records.is_empty() {
        frame.render_widget(
            Paragraph::new("No records yet. Hospitals will upload your documents here.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }
    render_record_table(frame, &patient.records, patient.selected, true, inner);
    render_notice(frame, patient.notice.as_deref(), area);
}

fn render_search(frame: &mut Frame, patient: &PatientState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query_block = Block::default().title(" Search ").borders(Borders::ALL);
    let query_inner = query_block.inner(chunks[0]);
    frame.render_widget(query_block, chunks[0]);
    frame.render_widget(
        Paragraph::new(format!("{}▏", patient.search_query.value())),
        query_inner,
    );

    let results_block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .title_bottom(" Enter search · Ctrl+P preview · Ctrl+D download ");
    let results_inner = results_block.inner(chunks[1]);
    frame.render_widget(results_block, chunks[1]);

    if let Some(error) = &patient.search_error {
        render_inline_error(frame, error, results_inner);
    } else if patient.searched && patient.search_results.is_empty() {
        frame.render_widget(
            Paragraph::new("No matches.").style(Style::default().fg(Color::DarkGray)),
            results_inner,
        );
    } else {
        render_record_table(
            frame,
            &patient.search_results,
            patient.search_selected,
            true,
            results_inner,
        );
    }
}

fn render_shared(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let patient = &tui.patient;
    let block = Block::default()
        .title(" Share Access ")
        .borders(Borders::ALL)
        .title_bottom(" g generate share code ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let access_code = tui
        .session
        .current()
        .map(|i| i.access_code.clone())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from("Share your records with a hospital using your access code."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Access code: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                access_code,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(error) = &patient.share_error {
        lines.push(Line::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(code) = &patient.share_code {
        lines.push(Line::from(vec![
            Span::styled("  Share link:  ", Style::default().fg(Color::DarkGray)),
            Span::styled(code.clone(), Style::default().fg(Color::Green)),
        ]));
    } else {
        lines.push(Line::styled(
            "  Press g to generate a fresh share link.",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_profile(frame: &mut Frame, patient: &PatientState, area: Rect) {
    let block = Block::default()
        .title(" Profile ")
        .borders(Borders::ALL)
        .title_bottom(" Tab next field · Enter/Ctrl+S save · Esc back ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &patient.profile_form;
    let labels = [
        "Gender",
        "Date of birth",
        "Blood group",
        "Address",
        "Emergency",
    ];
    let values = [
        form.gender.value(),
        form.date_of_birth.value(),
        form.blood_group.value(),
        form.address.value(),
        form.emergency_contact.value(),
    ];

    let mut lines = Vec::new();
    for (index, (label, value)) in labels.iter().zip(values.iter()).enumerate() {
        let focused = form.focus == index;
        let marker = if focused { "▸ " } else { "  " };
        let mut shown = (*value).to_string();
        if focused {
            shown.push('▏');
        }
        lines.push(Line::from(vec![
            Span::raw(marker.to_string()),
            Span::styled(
                format!("{label:>14}: "),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(shown),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = &patient.profile_error {
        lines.push(Line::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(notice) = &patient.notice {
        lines.push(Line::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

// ============================================================================
// Shared widgets
// ============================================================================

pub(crate) fn render_stat_tile(frame: &mut Frame, label: &str, value: u64, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let lines = vec![
        Line::styled(
            value.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Line::styled(label.to_string(), Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

pub(crate) fn render_record_table(
    frame: &mut Frame,
    records: &[RecordSummary],
    selected: usize,
    highlight: bool,
    area: Rect,
) {
    let header = Row::new(vec!["Type", "File", "Date", "Status", "Source"])
        .style(Style::default().fg(Color::DarkGray));

    let rows: Vec<Row<'static>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let date = record
                .upload_date
                .as_deref()
                .map(format_wire_date)
                .unwrap_or_else(|| "—".to_string());
            let source = record
                .hospital
                .clone()
                .or_else(|| record.patient_access_code.clone())
                .unwrap_or_else(|| "—".to_string());
            let row = Row::new(vec![
                Cell::from(record.kind_label().to_string()),
                Cell::from(truncate_with_ellipsis(
                    record.file_name.as_deref().unwrap_or("—"),
                    24,
                )),
                Cell::from(date),
                Cell::from(record.status.label()),
                Cell::from(truncate_with_ellipsis(&source, 20)),
            ]);
            if highlight && index == selected {
                row.style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(26),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header);
    frame.render_widget(table, area);
}

pub(crate) fn render_inline_error(frame: &mut Frame, error: &str, area: Rect) {
    frame.render_widget(
        Paragraph::new(format!("✗ {error}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false }),
        area,
    );
}

pub(crate) fn render_notice(frame: &mut Frame, notice: Option<&str>, area: Rect) {
    if let Some(notice) = notice
        && area.height > 2
    {
        let line = Rect {
            x: area.x + 2,
            y: area.y + area.height - 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(truncate_with_ellipsis(notice, line.width as usize))
                .style(Style::default().fg(Color::Green)),
            line,
        );
    }
}
