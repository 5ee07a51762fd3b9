/// Application-level constants
pub const APP_NAME: &str = "Magda";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum characters for single-line provider fields.
pub const MAX_SHORT_FIELD_LEN: usize = 200;

/// Maximum characters for provider notes.
pub const MAX_NOTES_LEN: usize = 2000;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "magda_lib=info"
}
