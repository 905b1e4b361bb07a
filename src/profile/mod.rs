//! Profile module
//!
//! Portfolio profile plus its sub-resources: experience, qualifications,
//! and testimonials.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::profile_routes;
