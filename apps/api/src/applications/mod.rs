// Companion backend: users, per-user resumes and the application history.

pub mod handlers;
pub mod repository;
