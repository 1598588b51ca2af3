//! Hospital dashboard reducer.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{HospitalSection, UploadForm};
use crate::effects::UiEffect;
use crate::events::HospitalUiEvent;
use crate::features::patient::start_download;
use crate::overlays;
use crate::routes::Route;
use crate::state::{AppState, TuiState};

/// Effects issued when the dashboard mounts: stats, uploads, and the
/// patient roster are three independent tasks.
pub fn on_enter(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    let stats_task = tui.task_seq.next_id();
    let records_task = tui.task_seq.next_id();
    let patients_task = tui.task_seq.next_id();
    vec![
        UiEffect::FetchHospitalStats {
            task: stats_task,
            user_id,
        },
        UiEffect::FetchHospitalRecords {
            task: records_task,
            user_id,
        },
        UiEffect::FetchHospitalPatients {
            task: patients_task,
            user_id,
        },
    ]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match app.tui.hospital.section {
        HospitalSection::Upload => handle_upload_key(app, key),
        HospitalSection::Search => handle_search_key(app, key),
        HospitalSection::Patients => handle_patients_key(app, key),
        _ => handle_browse_key(app, key),
    }
}

fn handle_browse_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(ch @ '1'..='5') if !ctrl => {
            let index = (ch as usize) - ('1' as usize);
            if let Some(section) = HospitalSection::all().get(index).copied() {
                app.tui.hospital.set_section(section);
            }
            vec![]
        }
        KeyCode::Esc => {
            app.tui.hospital.set_section(HospitalSection::Overview);
            vec![]
        }
        KeyCode::Up => {
            app.tui.hospital.selected = app.tui.hospital.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            let len = app.tui.hospital.visible_records().len();
            if len > 0 && app.tui.hospital.selected + 1 < len {
                app.tui.hospital.selected += 1;
            }
            vec![]
        }
        KeyCode::Enter => {
            if app.tui.hospital.section == HospitalSection::Records
                && let Some(record) = app.tui.hospital.selected_record().cloned()
            {
                return overlays::open_record_detail(app, record);
            }
            vec![]
        }
        KeyCode::Char('p') if !ctrl => {
            if app.tui.hospital.section == HospitalSection::Records
                && let Some(record) = app.tui.hospital.selected_record().cloned()
            {
                return overlays::open_preview(app, &record);
            }
            vec![]
        }
        KeyCode::Char('d') if !ctrl => {
            if app.tui.hospital.section == HospitalSection::Records
                && let Some(record) = app.tui.hospital.selected_record().cloned()
            {
                return start_download(&mut app.tui, &record);
            }
            vec![]
        }
        KeyCode::Char('r') if !ctrl => on_enter(&mut app.tui),
        _ => vec![],
    }
}

fn handle_upload_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.hospital.set_section(HospitalSection::Overview);
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            tui.hospital.upload.focus = (tui.hospital.upload.focus + 1) % UploadForm::FIELD_COUNT;
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.hospital.upload.focus =
                (tui.hospital.upload.focus + UploadForm::FIELD_COUNT - 1) % UploadForm::FIELD_COUNT;
            vec![]
        }
        KeyCode::Left if tui.hospital.upload.focus == 2 => {
            tui.hospital.upload.cycle_record_type(-1);
            vec![]
        }
        KeyCode::Right if tui.hospital.upload.focus == 2 => {
            tui.hospital.upload.cycle_record_type(1);
            vec![]
        }
        KeyCode::Enter => {
            if tui.hospital.upload.focus + 1 < UploadForm::FIELD_COUNT {
                tui.hospital.upload.focus += 1;
                vec![]
            } else {
                submit_upload(tui)
            }
        }
        KeyCode::Char('s') if ctrl => submit_upload(tui),
        KeyCode::Backspace => {
            if let Some(field) = upload_field_mut(&mut tui.hospital.upload) {
                field.backspace();
            }
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            if let Some(field) = upload_field_mut(&mut tui.hospital.upload) {
                field.push(ch);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn upload_field_mut(form: &mut UploadForm) -> Option<&mut crate::common::TextField> {
    match form.focus {
        0 => Some(&mut form.file_path),
        1 => Some(&mut form.access_code),
        2 => None, // record type is a picker, not a text field
        _ => Some(&mut form.notes),
    }
}

/// Validates the upload form and emits the upload effect. The required
/// fields are checked here, before any request exists; failures set a local
/// message and nothing leaves the machine.
fn submit_upload(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(user_id) = tui.session.current().map(|i| i.user_id) else {
        return vec![];
    };
    if tui.tasks.upload.is_running() {
        return vec![];
    }
    tui.hospital.upload_notice = None;

    let file_path = tui.hospital.upload.file_path.value().trim().to_string();
    if file_path.is_empty() {
        tui.hospital.upload_error = Some("Select a file to upload.".to_string());
        return vec![];
    }
    let access_code = tui.hospital.upload.access_code.value().trim().to_string();
    if access_code.is_empty() {
        tui.hospital.upload_error = Some("Enter the patient's access code.".to_string());
        return vec![];
    }

    tui.hospital.upload_error = None;
    let task = tui.task_seq.next_id();
    vec![UiEffect::UploadRecord {
        task,
        file_path: PathBuf::from(file_path),
        patient_access_code: access_code,
        record_type: tui.hospital.upload.record_type(),
        notes: tui.hospital.upload.notes.value().to_string(),
        hospital_id: user_id,
    }]
}

fn handle_patients_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.hospital.set_section(HospitalSection::Overview);
            vec![]
        }
        KeyCode::Up => {
            tui.hospital.patient_selected = tui.hospital.patient_selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            let len = tui.hospital.patients.len();
            if len > 0 && tui.hospital.patient_selected + 1 < len {
                tui.hospital.patient_selected += 1;
            }
            vec![]
        }
        KeyCode::Enter => {
            // Look up a patient by the access code typed into the field.
            let code = tui.hospital.lookup_code.value().trim().to_string();
            if code.is_empty() {
                tui.hospital.lookup_error = Some("Enter an access code.".to_string());
                return vec![];
            }
            if tui.tasks.patient_lookup.is_running() {
                return vec![];
            }
            tui.hospital.lookup_error = None;
            let task = tui.task_seq.next_id();
            vec![UiEffect::LookupPatient {
                task,
                access_code: code,
            }]
        }
        KeyCode::Backspace => {
            tui.hospital.lookup_code.backspace();
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            tui.hospital.lookup_code.push(ch);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.hospital.set_section(HospitalSection::Overview);
            vec![]
        }
        KeyCode::Enter => {
            let query = tui.hospital.search_query.value().trim().to_string();
            if query.is_empty() {
                tui.hospital.search_error = Some("Enter a search term first.".to_string());
                return vec![];
            }
            if tui.tasks.search.is_running() {
                return vec![];
            }
            let hospital_scope = tui.session.current().map(|i| i.user_id);
            tui.hospital.search_error = None;
            let task = tui.task_seq.next_id();
            vec![UiEffect::SearchRecords {
                task,
                query,
                hospital_scope,
            }]
        }
        KeyCode::Up => {
            tui.hospital.search_selected = tui.hospital.search_selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            let len = tui.hospital.search_results.len();
            if len > 0 && tui.hospital.search_selected + 1 < len {
                tui.hospital.search_selected += 1;
            }
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            if let Some(record) = tui.hospital.selected_record().cloned() {
                return overlays::open_preview(app, &record);
            }
            vec![]
        }
        KeyCode::Char('d') if ctrl => {
            if let Some(record) = tui.hospital.selected_record().cloned() {
                return start_download(&mut app.tui, &record);
            }
            vec![]
        }
        KeyCode::Backspace => {
            tui.hospital.search_query.backspace();
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            tui.hospital.search_query.push(ch);
            vec![]
        }
        _ => vec![],
    }
}

pub fn handle_event(app: &mut AppState, event: HospitalUiEvent) -> Vec<UiEffect> {
    if app.tui.route != Route::HospitalDashboard {
        return vec![];
    }
    let tui = &mut app.tui;
    match event {
        HospitalUiEvent::StatsLoaded(result) => {
            match result {
                Ok(stats) => {
                    tui.hospital.stats = Some(stats);
                    tui.hospital.stats_error = None;
                }
                Err(e) => tui.hospital.stats_error = Some(e.message),
            }
            vec![]
        }
        HospitalUiEvent::RecordsLoaded(result) => {
            match result {
                Ok(records) => {
                    tui.hospital.records = records;
                    tui.hospital.records_error = None;
                    let len = tui.hospital.records.len();
                    if tui.hospital.selected >= len {
                        tui.hospital.selected = len.saturating_sub(1);
                    }
                }
                Err(e) => tui.hospital.records_error = Some(e.message),
            }
            vec![]
        }
        HospitalUiEvent::PatientsLoaded(result) => {
            match result {
                Ok(patients) => {
                    tui.hospital.patients = patients;
                    tui.hospital.patients_error = None;
                }
                Err(e) => tui.hospital.patients_error = Some(e.message),
            }
            vec![]
        }
        HospitalUiEvent::SearchLoaded(result) => {
            match result {
                Ok(results) => {
                    tui.hospital.search_results = results;
                    tui.hospital.search_selected = 0;
                    tui.hospital.searched = true;
                }
                Err(e) => {
                    tui.hospital.search_error = Some(e.message);
                    tui.hospital.searched = true;
                }
            }
            vec![]
        }
        HospitalUiEvent::Uploaded(result) => {
            match result {
                Ok(message) => {
                    tui.hospital.upload_notice =
                        Some(message.unwrap_or_else(|| "Record uploaded.".to_string()));
                    tui.hospital.upload = UploadForm::default();
                    // Refresh counts and the uploads table.
                    return on_enter(tui);
                }
                Err(e) => tui.hospital.upload_error = Some(e.message),
            }
            vec![]
        }
        HospitalUiEvent::PatientLookedUp(result) => {
            match result {
                Ok(identity) => {
                    tui.hospital.lookup_result = Some(identity);
                    tui.hospital.lookup_error = None;
                }
                Err(e) => {
                    tui.hospital.lookup_result = None;
                    tui.hospital.lookup_error = Some(e.message);
                }
            }
            vec![]
        }
    }
}
