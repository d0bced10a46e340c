pub mod config;
pub mod error;
pub mod event_cache;
pub mod event_mapper;
pub mod lookup;
