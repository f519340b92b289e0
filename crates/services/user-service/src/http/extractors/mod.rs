//! Request extractors.

mod form_json;

pub use form_json::FormJson;
