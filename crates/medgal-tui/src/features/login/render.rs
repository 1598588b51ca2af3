//! Login feature view.

use medgal_core::auth::OTP_LEN;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::state::{
    BackendStatus, CredentialPhase, FederatedPhase, LoginMode, LoginState, OtpPhase,
};
use crate::common::TextField;
use crate::overlays::render_utils::centered_rect;

pub fn render_login(frame: &mut Frame, login: &LoginState, area: Rect) {
    let popup_area = centered_rect(64, 76, area);

    let title = match login.mode {
        LoginMode::Register => " Create Account ",
        _ => " Sign In ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title_bottom(" Ctrl+O mode · Ctrl+R role · Enter submit · Esc back ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(backend_banner(login));
    lines.push(Line::from(""));

    // Role selector
    lines.push(Line::from(vec![
        Span::styled("      I am a: ", Style::default().fg(Color::DarkGray)),
        role_span(login, medgal_core::types::UserType::Patient),
        Span::raw("  "),
        role_span(login, medgal_core::types::UserType::Hospital),
    ]));

    // Mode selector
    lines.push(Line::from(vec![
        Span::styled("        Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            login.mode.label().to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ]));
    lines.push(Line::from(""));

    match login.mode {
        LoginMode::Otp => render_otp_lines(login, &mut lines),
        LoginMode::Credentials => render_credential_lines(login, &mut lines),
        LoginMode::Register => render_register_lines(login, &mut lines),
        LoginMode::Federated => render_federated_lines(login, &mut lines),
    }

    lines.push(Line::from(""));
    if let Some(error) = &login.error {
        lines.push(Line::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(info) = &login.info {
        lines.push(Line::styled(
            info.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn backend_banner(login: &LoginState) -> Line<'static> {
    match login.backend {
        BackendStatus::Checking => Line::styled(
            "Checking backend connection…",
            Style::default().fg(Color::DarkGray),
        ),
        BackendStatus::Online => Line::styled(
            "✓ Backend connected",
            Style::default().fg(Color::Green),
        ),
        BackendStatus::Offline => Line::styled(
            "✗ Backend unreachable",
            Style::default().fg(Color::Red),
        ),
    }
}

fn role_span(login: &LoginState, role: medgal_core::types::UserType) -> Span<'static> {
    if login.role == role {
        Span::styled(
            format!("[{}]", role.label()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!(" {} ", role.label()),
            Style::default().fg(Color::DarkGray),
        )
    }
}

fn field_line(label: &str, field: &TextField, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let mut value = field.display();
    if focused {
        value.push('▏');
    }
    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{label:>12}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn render_otp_lines(login: &LoginState, lines: &mut Vec<Line<'static>>) {
    match login.otp {
        OtpPhase::Idle | OtpPhase::Sending => {
            lines.push(field_line("Contact", &login.contact, true));
            lines.push(Line::from(""));
            if login.otp == OtpPhase::Sending {
                lines.push(Line::styled(
                    "Sending code…",
                    Style::default().fg(Color::Yellow),
                ));
            } else {
                lines.push(Line::styled(
                    "Enter to receive a one-time code.",
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        OtpPhase::AwaitingCode | OtpPhase::Verifying => {
            // Six fixed cells, filled left to right.
            let mut cells: Vec<Span<'static>> = vec![Span::raw("     ")];
            let entered: Vec<char> = login.code.value().chars().collect();
            for index in 0..OTP_LEN {
                let cell = entered
                    .get(index)
                    .map_or_else(|| "[ ]".to_string(), |d| format!("[{d}]"));
                cells.push(Span::styled(
                    cell,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
                cells.push(Span::raw(" "));
            }
            lines.push(Line::from(format!(
                "   Code sent to {}.",
                login.contact.value()
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(cells));
            lines.push(Line::from(""));
            if login.otp == OtpPhase::Verifying {
                lines.push(Line::styled(
                    "Verifying…",
                    Style::default().fg(Color::Yellow),
                ));
            } else {
                lines.push(Line::styled(
                    "Enter to verify · Esc to re-enter contact",
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }
}

fn render_credential_lines(login: &LoginState, lines: &mut Vec<Line<'static>>) {
    lines.push(field_line("Email", &login.email, login.focus == 0));
    lines.push(field_line("Password", &login.password, login.focus == 1));
    lines.push(Line::from(""));
    if login.credential == CredentialPhase::Submitting {
        lines.push(Line::styled(
            "Signing in…",
            Style::default().fg(Color::Yellow),
        ));
    }
}

fn render_register_lines(login: &LoginState, lines: &mut Vec<Line<'static>>) {
    lines.push(field_line("Name", &login.name, login.focus == 0));
    lines.push(field_line("Email", &login.email, login.focus == 1));
    lines.push(field_line("Password", &login.password, login.focus == 2));
    lines.push(field_line("Confirm", &login.confirm, login.focus == 3));
    lines.push(Line::from(""));
    if login.credential == CredentialPhase::Submitting {
        lines.push(Line::styled(
            "Creating account…",
            Style::default().fg(Color::Yellow),
        ));
    }
}

fn render_federated_lines(login: &LoginState, lines: &mut Vec<Line<'static>>) {
    match &login.federated {
        FederatedPhase::Idle => {
            lines.push(Line::from(
                "   Enter opens the provider sign-in in your browser.",
            ));
        }
        FederatedPhase::AwaitingProvider { .. } => {
            lines.push(Line::from("   Waiting for the provider…"));
            lines.push(Line::from(""));
            lines.push(field_line("Token", &login.token_input, true));
            lines.push(Line::from(""));
            lines.push(Line::styled(
                "Paste the access token, then Enter · Esc cancels",
                Style::default().fg(Color::DarkGray),
            ));
        }
        FederatedPhase::Exchanging => {
            lines.push(Line::styled(
                "Exchanging token…",
                Style::default().fg(Color::Yellow),
            ));
        }
    }
}
