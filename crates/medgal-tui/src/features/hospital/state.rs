//! Hospital dashboard state.

use medgal_core::types::{HospitalStats, Identity, PatientEntry, RecordSummary, RecordType};

use crate::common::TextField;

/// Sections of the hospital dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HospitalSection {
    #[default]
    Overview,
    Records,
    Patients,
    Upload,
    Search,
}

impl HospitalSection {
    pub fn all() -> &'static [HospitalSection] {
        &[
            HospitalSection::Overview,
            HospitalSection::Records,
            HospitalSection::Patients,
            HospitalSection::Upload,
            HospitalSection::Search,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            HospitalSection::Overview => "Overview",
            HospitalSection::Records => "Uploads",
            HospitalSection::Patients => "Patients",
            HospitalSection::Upload => "Upload Record",
            HospitalSection::Search => "Search",
        }
    }
}

/// Upload form. Validation of the required fields happens on submit,
/// before any request is constructed.
#[derive(Debug)]
pub struct UploadForm {
    pub file_path: TextField,
    pub access_code: TextField,
    pub record_type_index: usize,
    pub notes: TextField,
    pub focus: usize,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            file_path: TextField::new(),
            access_code: TextField::new(),
            record_type_index: 0,
            notes: TextField::new(),
            focus: 0,
        }
    }
}

impl UploadForm {
    /// file path, access code, record type, notes.
    pub const FIELD_COUNT: usize = 4;

    pub fn record_type(&self) -> RecordType {
        RecordType::all()[self.record_type_index % RecordType::all().len()]
    }

    pub fn cycle_record_type(&mut self, step: isize) {
        let len = RecordType::all().len() as isize;
        let index = self.record_type_index as isize + step;
        self.record_type_index = index.rem_euclid(len) as usize;
    }
}

/// Hospital dashboard state.
#[derive(Debug, Default)]
pub struct HospitalState {
    pub section: HospitalSection,

    pub stats: Option<HospitalStats>,
    pub stats_error: Option<String>,

    pub records: Vec<RecordSummary>,
    pub records_error: Option<String>,
    pub selected: usize,

    pub patients: Vec<PatientEntry>,
    pub patients_error: Option<String>,
    pub patient_selected: usize,

    /// Add-patient lookup by access code (Patients section).
    pub lookup_code: TextField,
    pub lookup_result: Option<Identity>,
    pub lookup_error: Option<String>,

    pub upload: UploadForm,
    pub upload_error: Option<String>,
    pub upload_notice: Option<String>,

    pub search_query: TextField,
    pub search_results: Vec<RecordSummary>,
    pub search_selected: usize,
    pub search_error: Option<String>,
    pub searched: bool,

    pub notice: Option<String>,
}

impl HospitalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches section, resetting the per-section derived state.
    pub fn set_section(&mut self, section: HospitalSection) {
        if self.section == section {
            return;
        }
        self.section = section;
        self.selected = 0;
        self.patient_selected = 0;
        self.lookup_code.clear();
        self.lookup_result = None;
        self.lookup_error = None;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected = 0;
        self.search_error = None;
        self.searched = false;
        self.upload_error = None;
        self.upload_notice = None;
        self.notice = None;
    }

    pub fn visible_records(&self) -> &[RecordSummary] {
        match self.section {
            HospitalSection::Search => &self.search_results,
            _ => &self.records,
        }
    }

    pub fn selected_record(&self) -> Option<&RecordSummary> {
        match self.section {
            HospitalSection::Search => self.search_results.get(self.search_selected),
            _ => self.records.get(self.selected),
        }
    }
}
