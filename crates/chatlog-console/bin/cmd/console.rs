//! Interactive viewer: a virtualized log table fed by background page loads.

pub(crate) mod app;
pub(crate) mod http;
pub(crate) mod state;
pub(crate) mod views;
pub(crate) mod widgets;

pub use app::ConsoleArgs;
