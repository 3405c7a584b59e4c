//! Server-rendered HTML for the public site and the admin panel.
//!
//! Pages read through the same repositories as the JSON API. Browser-side
//! interactions (contact form, dynamic forms, login, replies) post JSON to
//! the API with a small shared script.

pub mod admin;
pub mod layout;
pub mod public;
pub mod widgets;

pub use layout::PageError;
