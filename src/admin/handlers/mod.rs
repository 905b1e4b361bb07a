// src/admin/handlers/mod.rs
pub mod dashboard;
pub mod settings;
pub mod users;
