// Profile module handlers

pub mod experience;
pub mod profile;
pub mod qualifications;
pub mod testimonials;
