pub mod dedupe;
pub mod label;
pub mod layout;
pub mod models;
pub mod status;
pub mod window;
