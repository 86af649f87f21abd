mod actions;
mod app;
mod dom;
mod error;
mod geometry;
mod net;
mod render;
mod state;

pub use app::run;
