pub mod capture;
pub mod color_cycle;
pub mod config;
pub mod controller;
pub mod event_bus;
pub mod frame;
pub mod mode;
pub mod tools;

pub use capture::*;
pub use color_cycle::*;
pub use config::*;
pub use controller::*;
pub use event_bus::*;
pub use frame::*;
pub use mode::*;
