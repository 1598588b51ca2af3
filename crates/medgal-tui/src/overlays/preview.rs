//! Record preview overlay and its local resource handle.
//!
//! Preview bytes are fetched from the API and written to a temp file, the
//! locally-addressable resource a viewer can open. The handle owns that
//! file: it is explicitly released when the overlay closes, when a new
//! preview replaces it, or when a stale result arrives for an overlay that
//! is already gone. Drop is the backstop for unwind paths, so a handle can
//! never outlive the view that created it. At most one handle exists per
//! view at any time.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::centered_rect;
use crate::state::TuiState;

/// Owned temp file backing a preview.
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
    released: bool,
}

impl PreviewHandle {
    /// Writes the fetched bytes to a fresh temp file.
    pub fn create(file_name: &str, bytes: &[u8]) -> io::Result<Self> {
        let safe_name: String = file_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let path = std::env::temp_dir().join(format!(
            "medgal-preview-{}-{safe_name}",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, bytes)?;
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the handle, deleting the backing file.
    pub fn release(mut self) {
        self.delete();
    }

    fn delete(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove preview file");
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.delete();
    }
}

/// Preview overlay state. Opens in the loading state; the runtime delivers
/// either a handle or an error.
#[derive(Debug)]
pub struct PreviewState {
    pub record_id: u64,
    pub file_name: String,
    pub handle: Option<PreviewHandle>,
    pub error: Option<String>,
}

impl PreviewState {
    pub fn loading(record_id: u64, file_name: String) -> Self {
        Self {
            record_id,
            file_name,
            handle: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.handle.is_none() && self.error.is_none()
    }

    /// Installs a freshly created handle, releasing any predecessor.
    pub fn install(&mut self, handle: PreviewHandle) {
        if let Some(previous) = self.handle.take() {
            previous.release();
        }
        self.handle = Some(handle);
        self.error = None;
    }

    /// Takes the handle out for release on close.
    pub fn take_handle(&mut self) -> Option<PreviewHandle> {
        self.handle.take()
    }

    pub fn handle_key(&mut self, _tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let mut title = format!(" Preview — {} ", self.file_name);
        if self.is_loading() {
            let _ = write!(&mut title, "(loading…) ");
        }
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title_bottom(" Esc/q to close ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let lines: Vec<Line<'static>> = if self.is_loading() {
            vec![Line::from("Fetching record content…")]
        } else if let Some(error) = &self.error {
            vec![Line::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )]
        } else if let Some(handle) = &self.handle {
            vec![
                Line::from("Preview saved locally:"),
                Line::from(""),
                Line::styled(
                    handle.path().display().to_string(),
                    Style::default().fg(Color::Green),
                ),
                Line::from(""),
                Line::from("Open it with your viewer of choice; the file is"),
                Line::from("removed as soon as this preview closes."),
            ]
        } else {
            vec![]
        };

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_removes_backing_file() {
        let handle = PreviewHandle::create("scan.png", b"abc").unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());

        handle.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_replacement_releases_previous_handle() {
        // Opening preview B without closing A: A's resource is released at
        // the moment B's is installed; never more than one outstanding.
        let mut state = PreviewState::loading(1, "a.png".to_string());

        let a = PreviewHandle::create("a.png", b"aaa").unwrap();
        let a_path = a.path().to_path_buf();
        state.install(a);
        assert!(a_path.exists());

        let b = PreviewHandle::create("b.png", b"bbb").unwrap();
        let b_path = b.path().to_path_buf();
        state.install(b);

        assert!(!a_path.exists());
        assert!(b_path.exists());

        state.take_handle().unwrap().release();
        assert!(!b_path.exists());
    }

    #[test]
    fn test_drop_is_a_backstop() {
        let path = {
            let handle = PreviewHandle::create("c.pdf", b"ccc").unwrap();
            handle.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
