pub mod config;
pub mod font;
pub mod generator;
pub mod render;

pub use config::Config;
pub use font::LabelFont;
pub use generator::{IconError, IconGenerator};
pub use render::{render, render_with};
