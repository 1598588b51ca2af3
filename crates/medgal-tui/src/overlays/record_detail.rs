//! Record detail overlay.

use crossterm::event::{KeyCode, KeyEvent};
use medgal_core::types::RecordSummary;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::{OverlayRequest, OverlayUpdate};
use crate::common::format_wire_date;
use crate::features::patient::start_download;
use crate::state::TuiState;

#[derive(Debug)]
pub struct RecordDetailState {
    pub record: RecordSummary,
}

impl RecordDetailState {
    pub fn open(record: RecordSummary) -> Self {
        Self { record }
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => OverlayUpdate::close(),
            KeyCode::Char('p') => OverlayUpdate::open(OverlayRequest::Preview {
                record: self.record.clone(),
            }),
            KeyCode::Char('d') => {
                OverlayUpdate::stay().with_effects(start_download(tui, &self.record))
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = super::render_utils::centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" Record #{} ", self.record.record_id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title_bottom(" p preview · d download · Esc close ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let record = &self.record;
        let mut lines = vec![
            detail_line("Type", record.kind_label()),
            detail_line("File", record.file_name.as_deref().unwrap_or("—")),
            detail_line(
                "Uploaded",
                &record
                    .upload_date
                    .as_deref()
                    .map(format_wire_date)
                    .unwrap_or_else(|| "—".to_string()),
            ),
            detail_line("Status", record.status.label()),
        ];
        if let Some(hospital) = &record.hospital {
            lines.push(detail_line("Hospital", hospital));
        }
        if let Some(code) = &record.patient_access_code {
            lines.push(detail_line("Patient code", code));
        }
        if let Some(description) = &record.description {
            lines.push(Line::from(""));
            lines.push(Line::from(description.clone()));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>13}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}
