pub mod ad;
pub mod analytics;
pub mod availability;
pub mod chat;
pub mod health;
pub mod schedule;
