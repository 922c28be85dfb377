pub mod env;
pub mod settings;
pub mod tracing_init;

pub use env::AppConfig;
pub use settings::{resolve_log_level, to_filter_directive};
pub use tracing_init::init_tracing;
