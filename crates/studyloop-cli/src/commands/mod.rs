pub mod config;
pub mod status;
pub mod study;
pub mod sync;

use studyloop_core::{Config, CoreError, FileStore, ReviewClient, SessionEngine};

pub type CliEngine = SessionEngine<FileStore, ReviewClient>;

/// Build the engine every command runs against: file-backed store under
/// the data directory, HTTP client from the TOML config.
pub fn open_engine() -> Result<CliEngine, CoreError> {
    let config = Config::load()?;
    let client = ReviewClient::from_config(&config.api)?;
    let store = FileStore::open()?;
    Ok(SessionEngine::new(store, client))
}

/// Single-threaded runtime for the async engine operations.
pub fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
