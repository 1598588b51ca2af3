//! Patient dashboard reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{PatientSection, ProfileForm};
use crate::effects::UiEffect;
use crate::events::PatientUiEvent;
use crate::overlays;
use crate::routes::Route;
use crate::state::{AppState, TuiState};

/// Effects issued when the dashboard mounts (and on identity change):
/// stats and records are fetched concurrently as independent tasks, so a
/// failure of one never blocks the other.
pub fn on_enter(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    let stats_task = tui.task_seq.next_id();
    let records_task = tui.task_seq.next_id();
    vec![
        UiEffect::FetchPatientStats {
            task: stats_task,
            user_id,
        },
        UiEffect::FetchPatientRecords {
            task: records_task,
            user_id,
        },
    ]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match app.tui.patient.section {
        PatientSection::Search => handle_search_key(app, key),
        PatientSection::Profile => handle_profile_key(app, key),
        _ => handle_browse_key(app, key),
    }
}

fn handle_browse_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(ch @ '1'..='5') if !ctrl => {
            set_section_by_digit(app, ch)
        }
        KeyCode::Esc => {
            app.tui.patient.set_section(PatientSection::Overview);
            vec![]
        }
        KeyCode::Up => {
            app.tui.patient.selected = app.tui.patient.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            let len = app.tui.patient.visible_records().len();
            if len > 0 && app.tui.patient.selected + 1 < len {
                app.tui.patient.selected += 1;
            }
            vec![]
        }
        KeyCode::Enter => {
            if app.tui.patient.section == PatientSection::Records
                && let Some(record) = app.tui.patient.selected_record().cloned()
            {
                return overlays::open_record_detail(app, record);
            }
            vec![]
        }
        KeyCode::Char('p') if !ctrl => {
            if app.tui.patient.section == PatientSection::Records
                && let Some(record) = app.tui.patient.selected_record().cloned()
            {
                return overlays::open_preview(app, &record);
            }
            vec![]
        }
        KeyCode::Char('d') if !ctrl => {
            if app.tui.patient.section == PatientSection::Records
                && let Some(record) = app.tui.patient.selected_record().cloned()
            {
                return start_download(&mut app.tui, &record);
            }
            vec![]
        }
        KeyCode::Char('g') if !ctrl => {
            if app.tui.patient.section == PatientSection::Shared {
                return generate_share_code(&mut app.tui);
            }
            vec![]
        }
        KeyCode::Char('r') if !ctrl => on_enter(&mut app.tui),
        _ => vec![],
    }
}

fn set_section_by_digit(app: &mut AppState, digit: char) -> Vec<UiEffect> {
    let index = (digit as usize) - ('1' as usize);
    let Some(section) = PatientSection::all().get(index).copied() else {
        return vec![];
    };
    app.tui.patient.set_section(section);
    if section == PatientSection::Profile {
        return fetch_profile(&mut app.tui);
    }
    vec![]
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.patient.set_section(PatientSection::Overview);
            vec![]
        }
        KeyCode::Enter => {
            let query = tui.patient.search_query.value().trim().to_string();
            if query.is_empty() {
                // Empty query short-circuits locally.
                tui.patient.search_error = Some("Enter a search term first.".to_string());
                return vec![];
            }
            if tui.tasks.search.is_running() {
                return vec![];
            }
            tui.patient.search_error = None;
            let task = tui.task_seq.next_id();
            vec![UiEffect::SearchRecords {
                task,
                query,
                hospital_scope: None,
            }]
        }
        KeyCode::Up => {
            tui.patient.search_selected = tui.patient.search_selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            let len = tui.patient.search_results.len();
            if len > 0 && tui.patient.search_selected + 1 < len {
                tui.patient.search_selected += 1;
            }
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            if let Some(record) = tui.patient.selected_record().cloned() {
                return overlays::open_preview(app, &record);
            }
            vec![]
        }
        KeyCode::Char('d') if ctrl => {
            if let Some(record) = tui.patient.selected_record().cloned() {
                return start_download(&mut app.tui, &record);
            }
            vec![]
        }
        KeyCode::Backspace => {
            tui.patient.search_query.backspace();
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            tui.patient.search_query.push(ch);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_profile_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.patient.set_section(PatientSection::Overview);
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            tui.patient.profile_form.focus =
                (tui.patient.profile_form.focus + 1) % ProfileForm::FIELD_COUNT;
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.patient.profile_form.focus = (tui.patient.profile_form.focus
                + ProfileForm::FIELD_COUNT
                - 1)
                % ProfileForm::FIELD_COUNT;
            vec![]
        }
        KeyCode::Enter => {
            if tui.patient.profile_form.focus + 1 < ProfileForm::FIELD_COUNT {
                tui.patient.profile_form.focus += 1;
                vec![]
            } else {
                save_profile(tui)
            }
        }
        KeyCode::Char('s') if ctrl => save_profile(tui),
        KeyCode::Backspace => {
            let focus = tui.patient.profile_form.focus;
            tui.patient.profile_form.field_mut(focus).backspace();
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            let focus = tui.patient.profile_form.focus;
            tui.patient.profile_form.field_mut(focus).push(ch);
            vec![]
        }
        _ => vec![],
    }
}

fn fetch_profile(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    if tui.tasks.profile_fetch.is_running() {
        return vec![];
    }
    let task = tui.task_seq.next_id();
    vec![UiEffect::FetchProfile { task, user_id }]
}

fn save_profile(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    if tui.tasks.profile_save.is_running() {
        return vec![];
    }
    let task = tui.task_seq.next_id();
    let profile = tui.patient.profile_form.to_profile();
    vec![UiEffect::SaveProfile {
        task,
        user_id,
        profile,
    }]
}

fn generate_share_code(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    if tui.tasks.share_code.is_running() {
        return vec![];
    }
    tui.patient.share_error = None;
    let task = tui.task_seq.next_id();
    vec![UiEffect::GenerateShareCode { task, user_id }]
}

pub fn start_download(tui: &mut TuiState, record: &medgal_core::types::RecordSummary) -> Vec<UiEffect> {
    if tui.tasks.download.is_running() {
        return vec![];
    }
    let task = tui.task_seq.next_id();
    let file_name = record
        .file_name
        .clone()
        .unwrap_or_else(|| format!("record-{}.bin", record.record_id));
    vec![UiEffect::DownloadRecord {
        task,
        record_id: record.record_id,
        file_name,
    }]
}

pub fn handle_event(app: &mut AppState, event: PatientUiEvent) -> Vec<UiEffect> {
    // Results for a dashboard the user has already left are stale.
    if app.tui.route != Route::PatientDashboard {
        return vec![];
    }
    let tui = &mut app.tui;
    match event {
        PatientUiEvent::StatsLoaded(result) => {
            match result {
                Ok(stats) => {
                    tui.patient.stats = Some(stats);
                    tui.patient.stats_error = None;
                }
                Err(e) => tui.patient.stats_error = Some(e.message),
            }
            vec![]
        }
        PatientUiEvent::RecordsLoaded(result) => {
            match result {
                Ok(records) => {
                    tui.patient.records = records;
                    tui.patient.records_error = None;
                    let len = tui.patient.records.len();
                    if tui.patient.selected >= len {
                        tui.patient.selected = len.saturating_sub(1);
                    }
                }
                Err(e) => tui.patient.records_error = Some(e.message),
            }
            vec![]
        }
        PatientUiEvent::SearchLoaded(result) => {
            match result {
                Ok(results) => {
                    // Server search is global; patients only ever see their
                    // own rows.
                    let own_code = tui.session.current().map(|i| i.access_code.clone());
                    let known: Vec<u64> =
                        tui.patient.records.iter().map(|r| r.record_id).collect();
                    tui.patient.search_results = results
                        .into_iter()
                        .filter(|r| {
                            known.contains(&r.record_id)
                                || (r.patient_access_code.is_some()
                                    && r.patient_access_code == own_code)
                        })
                        .collect();
                    tui.patient.search_selected = 0;
                    tui.patient.searched = true;
                }
                Err(e) => {
                    tui.patient.search_error = Some(e.message);
                    tui.patient.searched = true;
                }
            }
            vec![]
        }
        PatientUiEvent::ShareCodeGenerated(result) => {
            match result {
                Ok(code) => {
                    tui.patient.share_code = Some(code);
                    tui.patient.share_error = None;
                }
                Err(e) => tui.patient.share_error = Some(e.message),
            }
            vec![]
        }
        PatientUiEvent::ProfileLoaded(result) => {
            match result {
                Ok(profile) => {
                    tui.patient.profile_form = ProfileForm::from_profile(&profile);
                    tui.patient.profile = Some(profile);
                    tui.patient.profile_error = None;
                }
                Err(e) => tui.patient.profile_error = Some(e.message),
            }
            vec![]
        }
        PatientUiEvent::ProfileSaved(result) => {
            match result {
                Ok(message) => {
                    tui.patient.notice =
                        Some(message.unwrap_or_else(|| "Profile updated.".to_string()));
                    return fetch_profile(tui);
                }
                Err(e) => tui.patient.profile_error = Some(e.message),
            }
            vec![]
        }
    }
}
