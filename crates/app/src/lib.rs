#![warn(clippy::pedantic)]

pub mod log;

mod ongoing_session;
mod service;
mod settings;

pub use ongoing_session::*;
pub use service::*;
pub use settings::*;
