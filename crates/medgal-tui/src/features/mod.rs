//! Feature modules: one per portal view, each split into state / update /
//! render in the reducer architecture.

pub mod hospital;
pub mod login;
pub mod patient;
