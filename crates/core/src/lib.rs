pub mod errors;
pub mod models;
pub mod notify;
pub mod principal;
pub mod scheduling;
pub mod validate;
