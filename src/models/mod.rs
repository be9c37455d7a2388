pub mod event;
pub mod state;
