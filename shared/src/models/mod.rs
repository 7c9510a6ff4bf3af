//! Domain models for the Laundry Advisor platform

mod analysis;
mod notification;
mod weather;

pub use analysis::*;
pub use notification::*;
pub use weather::*;
