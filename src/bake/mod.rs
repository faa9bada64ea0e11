pub(crate) mod config;
pub(crate) mod orchestrator;
pub(crate) mod preferences;
pub(crate) mod progress;
