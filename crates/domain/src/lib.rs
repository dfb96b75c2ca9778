#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;

mod error;
mod exercise;
mod grouping;
mod history;
mod plan;
mod progress;
mod registry;
mod rest_timer;
mod service;
mod session;
mod statistics;

pub use error::*;
pub use exercise::*;
pub use grouping::*;
pub use history::*;
pub use plan::*;
pub use progress::*;
pub use registry::*;
pub use rest_timer::*;
pub use service::*;
pub use session::*;
pub use statistics::*;
