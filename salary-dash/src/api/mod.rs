//! HTTP API handlers for salary-dash

pub mod fx;
pub mod health;
pub mod options;
pub mod records;
pub mod submissions;
pub mod summary;
pub mod ui;

pub use fx::get_exchange_rate;
pub use health::health_routes;
pub use options::{get_filter_options, get_form_choices};
pub use records::list_records;
pub use submissions::create_submission;
pub use summary::get_summary;
pub use ui::{serve_app_js, serve_index};
