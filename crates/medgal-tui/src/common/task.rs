//! Async task lifecycle state.
//!
//! Every async operation runs as a task with a uniform lifecycle: the
//! runtime emits `TaskStarted` when it spawns, `TaskCompleted` (wrapping the
//! result event) when it resolves, and the reducer is the only place that
//! mutates `TaskState`. A completion whose id is no longer the active one
//! for its kind is discarded, which is what keeps late results from being
//! applied to views that have moved on.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SessionRestore,
    HealthCheck,
    SendCode,
    VerifyCode,
    CredentialAuth,
    FederatedAuth,
    StatsFetch,
    RecordsFetch,
    PatientsFetch,
    Search,
    Upload,
    PatientLookup,
    ShareCode,
    ProfileFetch,
    ProfileSave,
    Preview,
    Download,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub session_restore: TaskState,
    pub health_check: TaskState,
    pub send_code: TaskState,
    pub verify_code: TaskState,
    pub credential_auth: TaskState,
    pub federated_auth: TaskState,
    pub stats_fetch: TaskState,
    pub records_fetch: TaskState,
    pub patients_fetch: TaskState,
    pub search: TaskState,
    pub upload: TaskState,
    pub patient_lookup: TaskState,
    pub share_code: TaskState,
    pub profile_fetch: TaskState,
    pub profile_save: TaskState,
    pub preview: TaskState,
    pub download: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SessionRestore => &self.session_restore,
            TaskKind::HealthCheck => &self.health_check,
            TaskKind::SendCode => &self.send_code,
            TaskKind::VerifyCode => &self.verify_code,
            TaskKind::CredentialAuth => &self.credential_auth,
            TaskKind::FederatedAuth => &self.federated_auth,
            TaskKind::StatsFetch => &self.stats_fetch,
            TaskKind::RecordsFetch => &self.records_fetch,
            TaskKind::PatientsFetch => &self.patients_fetch,
            TaskKind::Search => &self.search,
            TaskKind::Upload => &self.upload,
            TaskKind::PatientLookup => &self.patient_lookup,
            TaskKind::ShareCode => &self.share_code,
            TaskKind::ProfileFetch => &self.profile_fetch,
            TaskKind::ProfileSave => &self.profile_save,
            TaskKind::Preview => &self.preview,
            TaskKind::Download => &self.download,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SessionRestore => &mut self.session_restore,
            TaskKind::HealthCheck => &mut self.health_check,
            TaskKind::SendCode => &mut self.send_code,
            TaskKind::VerifyCode => &mut self.verify_code,
            TaskKind::CredentialAuth => &mut self.credential_auth,
            TaskKind::FederatedAuth => &mut self.federated_auth,
            TaskKind::StatsFetch => &mut self.stats_fetch,
            TaskKind::RecordsFetch => &mut self.records_fetch,
            TaskKind::PatientsFetch => &mut self.patients_fetch,
            TaskKind::Search => &mut self.search,
            TaskKind::Upload => &mut self.upload,
            TaskKind::PatientLookup => &mut self.patient_lookup,
            TaskKind::ShareCode => &mut self.share_code,
            TaskKind::ProfileFetch => &mut self.profile_fetch,
            TaskKind::ProfileSave => &mut self.profile_save,
            TaskKind::Preview => &mut self.preview,
            TaskKind::Download => &mut self.download,
        }
    }

    pub fn is_any_running(&self) -> bool {
        [
            TaskKind::SessionRestore,
            TaskKind::HealthCheck,
            TaskKind::SendCode,
            TaskKind::VerifyCode,
            TaskKind::CredentialAuth,
            TaskKind::FederatedAuth,
            TaskKind::StatsFetch,
            TaskKind::RecordsFetch,
            TaskKind::PatientsFetch,
            TaskKind::Search,
            TaskKind::Upload,
            TaskKind::PatientLookup,
            TaskKind::ShareCode,
            TaskKind::ProfileFetch,
            TaskKind::ProfileSave,
            TaskKind::Preview,
            TaskKind::Download,
        ]
        .iter()
        .any(|kind| self.state(*kind).is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_rejected() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();

        let old = seq.next_id();
        state.on_started(&TaskStarted {
            id: old,
            cancel: None,
        });
        let new = seq.next_id();
        state.on_started(&TaskStarted {
            id: new,
            cancel: None,
        });

        // The superseded task's completion no longer matches.
        assert!(!state.finish_if_active(old));
        assert!(state.is_running());
        assert!(state.finish_if_active(new));
        assert!(!state.is_running());
    }
}
