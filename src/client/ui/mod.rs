//! Terminal rendering for the quiz client.

mod grid;
mod quiz;
mod render;

pub use render::render;
