//! Session management
//!
//! Every run of an executable gets a session directory under the software root holding its log
//! file, its archives and a copy of the parameters it ran with. The session also fixes the epoch
//! that log and telemetry timestamps are measured from.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::{host, time};

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// strftime format of the timestamp in session directory names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive directory inside a session.
const ARCH_DIR_NAME: &str = "arch";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Paths belonging to the current session.
#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable ({}) is not set", host::SW_ROOT_ENV_VAR)]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process")]
    AlreadyStarted,

    #[error("Cannot serialise {0} for saving: {1}")]
    SerialiseError(String, toml::ser::Error),

    #[error("Cannot save {0} to the session: {1}")]
    SaveError(String, std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session in `{sw_root}/{sessions_dir}/{exec_name}_{timestamp}`.
    ///
    /// Only one session may be started per process since it sets the global epoch.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(|_| SessionError::AlreadyStarted)?;
        let epoch = get_epoch();

        let session_root = root
            .join(sessions_dir)
            .join(format!("{}_{}", exec_name, epoch.format(TIMESTAMP_FORMAT)));
        let arch_root = session_root.join(ARCH_DIR_NAME);

        // Creating the archive directory also creates the session root
        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            arch_root,
        })
    }

    /// Save a copy of `item` as TOML at `rel_path` inside the session directory.
    pub fn save<T, P>(&self, rel_path: P, item: &T) -> Result<PathBuf, SessionError>
    where
        T: Serialize,
        P: AsRef<Path>,
    {
        let name = rel_path.as_ref().to_string_lossy().to_string();
        let path = self.session_root.join(rel_path);

        let contents =
            toml::to_string(item).map_err(|e| SessionError::SerialiseError(name.clone(), e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::SaveError(name.clone(), e))?;
        }
        fs::write(&path, contents).map_err(|e| SessionError::SaveError(name, e))?;

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns zero before a session has been started.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => 0.0,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Calib {
        counts_per_rev: f32,
        points: Vec<(f32, f32)>,
    }

    #[test]
    fn test_save() {
        let root = std::env::temp_dir().join(format!("session_test_{}", std::process::id()));
        let session = Session {
            arch_root: root.join(ARCH_DIR_NAME),
            log_file_path: root.join("test.log"),
            session_root: root.clone(),
        };

        let path = session
            .save(
                "params/calib.toml",
                &Calib {
                    counts_per_rev: 1320.0,
                    points: vec![(0.0, 0.0), (68.0, 100.0)],
                },
            )
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("counts_per_rev = 1320.0"));
        assert!(contents.contains("points"));

        fs::remove_dir_all(&root).ok();
    }
}
