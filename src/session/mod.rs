pub(crate) mod config;
pub(crate) mod race_session;
