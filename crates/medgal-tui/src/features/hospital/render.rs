//! Hospital dashboard view.

use medgal_core::types::RecordType;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use super::state::{HospitalSection, HospitalState};
use crate::common::TextField;
use crate::features::patient::render::{
    render_inline_error, render_notice, render_record_table, render_stat_tile,
};
use crate::state::TuiState;

pub fn render_hospital(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_section_tabs(frame, &tui.hospital, chunks[0]);

    match tui.hospital.section {
        HospitalSection::Overview => render_overview(frame, &tui.hospital, chunks[1]),
        HospitalSection::Records => render_records(frame, &tui.hospital, chunks[1]),
        HospitalSection::Patients => render_patients(frame, &tui.hospital, chunks[1]),
        HospitalSection::Upload => render_upload(frame, &tui.hospital, chunks[1]),
        HospitalSection::Search => render_search(frame, &tui.hospital, chunks[1]),
    }
}

fn render_section_tabs(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ")];
    for (index, section) in HospitalSection::all().iter().enumerate() {
        let label = format!(" {}:{} ", index + 1, section.label());
        if *section == hospital.section {
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

fn render_overview(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[0]);

    if let Some(error) = &hospital.stats_error {
        render_inline_error(frame, error, chunks[0]);
    } else {
        let stats = hospital.stats.unwrap_or_default();
        render_stat_tile(frame, "Total Uploads", stats.total_uploads, tiles[0]);
        render_stat_tile(frame, "Active Patients", stats.active_patients, tiles[1]);
        render_stat_tile(frame, "Pending Review", stats.pending_reviews, tiles[2]);
        render_stat_tile(frame, "Today", stats.today_uploads, tiles[3]);
    }

    // Record-type breakdown over this hospital's uploads.
    let block = Block::default().title(" Uploads by Type ").borders(Borders::ALL);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if let Some(error) = &hospital.records_error {
        render_inline_error(frame, error, inner);
        return;
    }
    let lines: Vec<Line<'static>> = RecordType::all()
        .iter()
        .map(|kind| {
            let count = hospital
                .records
                .iter()
                .filter(|r| r.record_type == Some(*kind))
                .count();
            Line::from(vec![
                Span::styled(
                    format!("{:>18}: ", kind.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(count.to_string()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_records(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let block = Block::default()
        .title(" Uploads ")
        .borders(Borders::ALL)
        .title_bottom(" ↑/↓ select · Enter details · p preview · d download ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = &hospital.records_error {
        render_inline_error(frame, error, inner);
        return;
    }
    if hospital.records.is_empty() {
        frame.render_widget(
            Paragraph::new("No records uploaded yet.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }
    render_record_table(frame, &hospital.records, hospital.selected, true, inner);
    render_notice(frame, hospital.notice.as_deref(), area);
}

fn render_patients(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let lookup_block = Block::default()
        .title(" Add Patient by Access Code ")
        .borders(Borders::ALL);
    let lookup_inner = lookup_block.inner(chunks[0]);
    frame.render_widget(lookup_block, chunks[0]);

    let mut lookup_lines = vec![Line::from(format!(
        "Access code: {}▏",
        hospital.lookup_code.value()
    ))];
    if let Some(error) = &hospital.lookup_error {
        lookup_lines.push(Line::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(found) = &hospital.lookup_result {
        lookup_lines.push(Line::styled(
            format!("✓ {} <{}>", found.name, found.email),
            Style::default().fg(Color::Green),
        ));
    }
    frame.render_widget(Paragraph::new(lookup_lines), lookup_inner);

    let roster_block = Block::default().title(" Patients ").borders(Borders::ALL);
    let roster_inner = roster_block.inner(chunks[1]);
    frame.render_widget(roster_block, chunks[1]);

    if let Some(error) = &hospital.patients_error {
        render_inline_error(frame, error, roster_inner);
        return;
    }
    let header = Row::new(vec!["Name", "Email", "Access Code"])
        .style(Style::default().fg(Color::DarkGray));
    let rows: Vec<Row<'static>> = hospital
        .patients
        .iter()
        .enumerate()
        .map(|(index, patient)| {
            let row = Row::new(vec![
                Cell::from(patient.name.clone()),
                Cell::from(patient.email.clone()),
                Cell::from(patient.access_code.clone()),
            ]);
            if index == hospital.patient_selected {
                row.style(Style::default().fg(Color::Black).bg(Color::Cyan))
            } else {
                row
            }
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(30),
            Constraint::Min(12),
        ],
    )
    .header(header);
    frame.render_widget(table, roster_inner);
}

fn render_upload(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let block = Block::default()
        .title(" Upload Record ")
        .borders(Borders::ALL)
        .title_bottom(" Tab next field · ←/→ change type · Enter/Ctrl+S submit ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &hospital.upload;
    let mut lines = vec![
        upload_field_line("File path", &form.file_path, form.focus == 0),
        upload_field_line("Access code", &form.access_code, form.focus == 1),
        Line::from(vec![
            Span::raw(if form.focus == 2 { "▸ " } else { "  " }),
            Span::styled(
                format!("{:>12}: ", "Record type"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("◂ {} ▸", form.record_type().label()),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        upload_field_line("Notes", &form.notes, form.focus == 3),
        Line::from(""),
    ];

    if let Some(error) = &hospital.upload_error {
        lines.push(Line::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(notice) = &hospital.upload_notice {
        lines.push(Line::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn upload_field_line(label: &str, field: &TextField, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let mut value = field.display();
    if focused {
        value.push('▏');
    }
    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(
            format!("{label:>12}: "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn render_search(frame: &mut Frame, hospital: &HospitalState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query_block = Block::default().title(" Search Uploads ").borders(Borders::ALL);
    let query_inner = query_block.inner(chunks[0]);
    frame.render_widget(query_block, chunks[0]);
    frame.render_widget(
        Paragraph::new(format!("{}▏", hospital.search_query.value())),
        query_inner,
    );

    let results_block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .title_bottom(" Enter search · Ctrl+P preview · Ctrl+D download ");
    let results_inner = results_block.inner(chunks[1]);
    frame.render_widget(results_block, chunks[1]);

    if let Some(error) = &hospital.search_error {
        render_inline_error(frame, error, results_inner);
    } else if hospital.searched && hospital.search_results.is_empty() {
        frame.render_widget(
            Paragraph::new("No matches.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: false }),
            results_inner,
        );
    } else {
        render_record_table(
            frame,
            &hospital.search_results,
            hospital.search_selected,
            true,
            results_inner,
        );
    }
}
