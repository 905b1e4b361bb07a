//! Profile routes

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{experience, profile, qualifications, testimonials};

/// Creates and returns the profile router
///
/// Authenticated routes operate on the caller's own rows; the `/api/public/*`
/// routes serve the portfolio owner's content to the public site.
pub fn profile_routes() -> Router {
    Router::new()
        // Profile
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/public/profile", get(profile::public_profile))
        // Experience
        .route(
            "/api/profile/experience",
            get(experience::get_experiences).post(experience::create_experience),
        )
        .route(
            "/api/profile/experience/:id",
            put(experience::update_experience).delete(experience::delete_experience),
        )
        .route("/api/public/experience", get(experience::public_experiences))
        // Qualifications
        .route(
            "/api/profile/qualifications",
            get(qualifications::get_qualifications).post(qualifications::create_qualification),
        )
        .route(
            "/api/profile/qualifications/:id",
            put(qualifications::update_qualification)
                .delete(qualifications::delete_qualification),
        )
        .route(
            "/api/public/qualifications",
            get(qualifications::public_qualifications),
        )
        // Testimonials
        .route(
            "/api/profile/testimonials",
            get(testimonials::get_testimonials).post(testimonials::create_testimonial),
        )
        .route(
            "/api/profile/testimonials/:id",
            put(testimonials::update_testimonial).delete(testimonials::delete_testimonial),
        )
        .route(
            "/api/public/testimonials",
            get(testimonials::public_testimonials),
        )
}
