pub mod account;
pub mod ad;
pub mod analytics;
pub mod chat;
pub mod execution_log;
pub mod schedule;
pub mod time_slot;
