mod events_handler;

pub use events_handler::{configure_routes, ApiDoc, AppState};
