pub(crate) mod config;
pub(crate) mod dump_log;
pub(crate) mod generate;
