//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a
//! ratatui Frame, and never mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::features::{hospital, login, patient};
use crate::routes::Route;
use crate::state::{AppState, TuiState};

/// Spinner frames for in-flight task indication.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, state, chunks[0]);

    // Route guard rule 1: while the session is restoring, no view has been
    // decided yet; render only a placeholder.
    if state.session.is_restoring() {
        render_restoring(frame, chunks[1]);
    } else {
        match state.route {
            Route::Landing => render_landing(frame, chunks[1]),
            Route::Login | Route::Register => {
                login::render_login(frame, &state.login, chunks[1]);
            }
            Route::PatientDashboard => patient::render_patient(frame, state, chunks[1]),
            Route::HospitalDashboard => hospital::render_hospital(frame, state, chunks[1]),
        }
    }

    render_status_line(frame, state, chunks[2]);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, chunks[1]);
    }
}

fn render_header(frame: &mut Frame, state: &TuiState, area: Rect) {
    let mut spans = vec![Span::styled(
        " Medical Gallery ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(identity) = state.session.current() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} ({})", identity.name, identity.user_type.label()),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_restoring(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::styled(
            "  Restoring session…",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_landing(frame: &mut Frame, area: Rect) {
    let popup = crate::overlays::render_utils::centered_rect(60, 50, area);
    let lines = vec![
        Line::from(""),
        Line::styled(
            "Medical Gallery",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("Your medical records, in one place."),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" sign in    "),
            Span::styled("r", Style::default().fg(Color::Cyan)),
            Span::raw(" create account    "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        popup,
    );
}

fn render_status_line(frame: &mut Frame, state: &TuiState, area: Rect) {
    let mut spans: Vec<Span<'static>> = Vec::new();

    if state.tasks.is_any_running() {
        let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!(" {spinner} working "),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::raw(" "));
    }

    let hints = match state.route {
        Route::Landing => "Enter sign in · q quit",
        Route::Login | Route::Register => "Ctrl+O mode · Ctrl+R role · Ctrl+C quit",
        Route::PatientDashboard | Route::HospitalDashboard => {
            "1-5 sections · r refresh · Ctrl+L log out · Ctrl+C quit"
        }
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
