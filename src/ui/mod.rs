mod app;
mod components;
mod inbox;
mod persona;
mod popups;
mod status_bar;
pub mod theme;
mod widgets;
mod workspace;

pub use app::render;
