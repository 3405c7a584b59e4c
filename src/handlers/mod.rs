// Handlers are split by security tier:
// public (no session) and protected (admin session cookie required).
pub mod health;
pub mod protected;
pub mod public;
