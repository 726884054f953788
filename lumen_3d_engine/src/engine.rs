/// Lumen3D Engine - Singleton manager for global engine settings
///
/// This module provides the global configuration and logger. It uses
/// thread-safe static storage with RwLock for safe concurrent access.
/// Per-frame state (scenes, caches, queues) is owned by the caller and
/// never stored here.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::EngineConfig;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(0);

/// Internal state structure holding engine-wide settings
struct EngineState {
    /// Active configuration (None until initialized)
    config: RwLock<Option<EngineConfig>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            config: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use lumen_3d_engine::lumen3d::{Engine, EngineConfig};
///
/// Engine::initialize_with_config(EngineConfig::default())?;
/// let config = Engine::config()?;
/// Engine::shutdown();
/// # Ok::<(), lumen_3d_engine::lumen3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Initialize the engine with the default configuration
    pub fn initialize() -> Result<()> {
        Self::initialize_with_config(EngineConfig::default())
    }

    /// Initialize the engine with an explicit configuration
    ///
    /// Re-initializing replaces the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the configuration does not validate
    /// or the state lock is poisoned.
    pub fn initialize_with_config(config: EngineConfig) -> Result<()> {
        if let Err(error) = config.validate() {
            crate::engine_error!("lumen3d::Engine", "Invalid configuration: {}", error);
            return Err(error);
        }
        let state = ENGINE_STATE.get_or_init(EngineState::new);
        let mut lock = state.config.write().map_err(|_| {
            Error::InitializationFailed("Engine config lock poisoned".to_string())
        })?;
        Self::set_min_severity(config.log_level);
        *lock = Some(config);
        drop(lock);
        crate::engine_info!("lumen3d::Engine", "Engine initialized");
        Ok(())
    }

    /// Shutdown the engine and forget the configuration
    ///
    /// After calling this, `config()` fails until `initialize()` is called again.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut config) = state.config.write() {
                *config = None;
            }
        }
    }

    /// Whether `initialize()` has been called since the last `shutdown()`
    pub fn is_initialized() -> bool {
        ENGINE_STATE
            .get()
            .and_then(|state| state.config.read().ok().map(|config| config.is_some()))
            .unwrap_or(false)
    }

    /// Copy of the active configuration
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the engine is not initialized.
    pub fn config() -> Result<EngineConfig> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Error::InitializationFailed("Engine not initialized".to_string())
        })?;
        let lock = state.config.read().map_err(|_| {
            Error::InitializationFailed("Engine config lock poisoned".to_string())
        })?;
        lock.clone().ok_or_else(|| {
            Error::InitializationFailed("Engine not initialized".to_string())
        })
    }

    /// Set the minimum severity forwarded to the logger
    pub fn set_min_severity(severity: LogSeverity) {
        MIN_SEVERITY.store(severity.as_u8(), Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Install a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lumen_3d_engine::lumen3d::Engine;
    /// use lumen_3d_engine::lumen3d::log::DefaultLogger;
    ///
    /// Engine::set_logger(DefaultLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source component (e.g., "lumen3d::Scene")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level (typically Error)
    /// * `source` - Source component (e.g., "lumen3d::Geometry")
    /// * `message` - Log message
    /// * `file` - Source file path
    /// * `line` - Source line number
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::min_severity() {
            return;
        }
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
