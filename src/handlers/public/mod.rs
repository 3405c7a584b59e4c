// Endpoints reachable without an admin session: login/logout, the public
// catalog, contact and form submissions, and the inbound reply callback.
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod forms;
pub mod uploads;
pub mod webhooks;
