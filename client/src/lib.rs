pub mod actions;
pub mod export;
pub mod geometry;
pub mod history;
pub mod net;
pub mod remote;
pub mod render;
pub mod state;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod ws;

#[cfg(target_arch = "wasm32")]
pub use app::run;
