//! Quiz client module.
//!
//! Terminal front end over a [`Session`](crate::session::Session).

mod client;
mod input;
mod state;
mod ui;

pub use client::run;
pub use input::{Command, InputMode, map_key};
pub use state::{ClientApp, Notice, NoticeLevel};
