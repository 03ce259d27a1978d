pub mod config;
pub mod library;
pub mod logging;
pub mod models;
pub mod paths;
pub mod redact;
pub mod secrets;

pub use config::{Config, ConfigError, HearthisConfig, LogLevel, LoggingConfig, ValidationError};
pub use library::{MediaLibrary, PlaybackTranslator, SearchQuery, SearchResult, TranslateError};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use paths::{AppDirs, DirsError};

pub const APP_NAME: &str = "hearthis";
pub const APP_AUTHOR: &str = "Hearthis";
pub const APP_QUALIFIER: &str = "io";
