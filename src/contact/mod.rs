//! Contact module

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

pub use routes::contact_routes;
