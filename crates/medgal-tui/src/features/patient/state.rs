//! Patient dashboard state.
//!
//! Everything here is derived view state: it is rebuilt from the API on
//! mount and reset when the active section changes. Nothing in this module
//! is ever persisted.

use medgal_core::types::{PatientStats, Profile, RecordSummary};

use crate::common::TextField;

/// Sections of the patient dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientSection {
    #[default]
    Overview,
    Records,
    Search,
    Shared,
    Profile,
}

impl PatientSection {
    pub fn all() -> &'static [PatientSection] {
        &[
            PatientSection::Overview,
            PatientSection::Records,
            PatientSection::Search,
            PatientSection::Shared,
            PatientSection::Profile,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PatientSection::Overview => "Overview",
            PatientSection::Records => "My Records",
            PatientSection::Search => "Search",
            PatientSection::Shared => "Share Access",
            PatientSection::Profile => "Profile",
        }
    }
}

/// Editable profile form. Focus cycles through the five fields.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub gender: TextField,
    pub date_of_birth: TextField,
    pub blood_group: TextField,
    pub address: TextField,
    pub emergency_contact: TextField,
    pub focus: usize,
}

impl ProfileForm {
    pub const FIELD_COUNT: usize = 5;

    pub fn from_profile(profile: &Profile) -> Self {
        let mut form = Self::default();
        form.gender.set(profile.gender.as_deref().unwrap_or(""));
        form.date_of_birth
            .set(profile.date_of_birth.as_deref().unwrap_or(""));
        form.blood_group
            .set(profile.blood_group.as_deref().unwrap_or(""));
        form.address.set(profile.address.as_deref().unwrap_or(""));
        form.emergency_contact
            .set(profile.emergency_contact.as_deref().unwrap_or(""));
        form
    }

    pub fn to_profile(&self) -> Profile {
        fn opt(field: &TextField) -> Option<String> {
            let trimmed = field.value().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Profile {
            gender: opt(&self.gender),
            date_of_birth: opt(&self.date_of_birth),
            blood_group: opt(&self.blood_group),
            address: opt(&self.address),
            emergency_contact: opt(&self.emergency_contact),
        }
    }

    pub fn field_mut(&mut self, index: usize) -> &mut TextField {
        match index {
            0 => &mut self.gender,
            1 => &mut self.date_of_birth,
            2 => &mut self.blood_group,
            3 => &mut self.address,
            _ => &mut self.emergency_contact,
        }
    }
}

/// Patient dashboard state.
#[derive(Debug, Default)]
pub struct PatientState {
    pub section: PatientSection,

    pub stats: Option<PatientStats>,
    pub stats_error: Option<String>,

    pub records: Vec<RecordSummary>,
    pub records_error: Option<String>,
    pub selected: usize,

    pub search_query: TextField,
    pub search_results: Vec<RecordSummary>,
    pub search_selected: usize,
    pub search_error: Option<String>,
    pub searched: bool,

    pub share_code: Option<String>,
    pub share_error: Option<String>,

    pub profile: Option<Profile>,
    pub profile_form: ProfileForm,
    pub profile_error: Option<String>,

    /// Transient inline notice (downloads, profile saves).
    pub notice: Option<String>,
}

impl PatientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches section, resetting the per-section derived state.
    pub fn set_section(&mut self, section: PatientSection) {
        if self.section == section {
            return;
        }
        self.section = section;
        self.selected = 0;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected = 0;
        self.search_error = None;
        self.searched = false;
        self.notice = None;
    }

    /// The record list the current section is looking at.
    pub fn visible_records(&self) -> &[RecordSummary] {
        match self.section {
            PatientSection::Search => &self.search_results,
            _ => &self.records,
        }
    }

    /// The record currently under the cursor, if any.
    pub fn selected_record(&self) -> Option<&RecordSummary> {
        match self.section {
            PatientSection::Search => self.search_results.get(self.search_selected),
            _ => self.records.get(self.selected),
        }
    }
}
