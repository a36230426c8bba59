//! Interactive button pagination (previous / stop / next).

pub mod collector;
pub mod controller;
pub mod cursor;
pub mod page;
pub mod port;
pub mod types;

pub use controller::{Paginator, SessionHandle};
pub use types::{ButtonEvent, CloseReason, Control, Controls, PagePosition, SessionOutcome};
