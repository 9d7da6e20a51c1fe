pub mod auth;
pub mod chat;
pub mod dose_logs;
pub mod email;
pub mod oauth;
pub mod profile;
pub mod supplements;
