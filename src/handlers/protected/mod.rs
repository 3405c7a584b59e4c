// Admin JSON API. Every route here sits behind `require_admin_api`.
pub mod forms;
pub mod projects;
pub mod requests;
pub mod session;
pub mod team;
