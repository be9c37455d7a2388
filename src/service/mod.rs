pub mod event_source;
pub mod notifier;
pub mod popup;
pub mod renderer;
pub mod status_format;
