//! Test utilities for the registro crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Adapters never touch `std::fs` directly, and neither do the suites
    //! that check what they wrote.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};
    use tempfile::TempDir;

    /// Fresh temporary directory removed on drop.
    pub fn scratch_dir() -> TempDir {
        match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("temporary directory: {error}"),
        }
    }

    /// Read a whole file through `cap_std`.
    pub fn read_file_bytes(path: &Path) -> io::Result<Vec<u8>> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`, creating missing parents.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use registro::test_support::cap_fs::{read_file_bytes, scratch_dir, write_file};
    ///
    /// let dir = scratch_dir();
    /// let path = dir.path().join("nested/firma.png");
    /// write_file(&path, b"png")?;
    /// assert_eq!(read_file_bytes(&path)?, b"png");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        Dir::create_ambient_dir_all(parent, ambient_authority())?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use serde_json::json;

use crate::domain::Session;
use crate::domain::ports::{TokenStore, TokenStoreError};

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Build an unsigned JWT carrying the claims the client reads.
///
/// # Examples
/// ```
/// use registro::domain::AuthToken;
/// use registro::test_support::unsigned_token;
///
/// let token = AuthToken::decode(&unsigned_token(7, "admin", 4_102_444_800)).unwrap();
/// assert_eq!(token.user().user_id, 7);
/// ```
pub fn unsigned_token(user_id: i64, rol: &str, exp: i64) -> String {
    let payload = json!({
        "userId": user_id,
        "userName": "operador",
        "firstName": "Ana",
        "lastName": "Paz",
        "rol": rol,
        "exp": exp,
    });
    format!(
        "{}.{}.firma",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

/// Token store that keeps the token in memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore(Mutex<Option<String>>);

impl MemoryTokenStore {
    /// Currently stored token.
    pub fn stored(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("token store mutex"),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.lock().clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.lock() = Some(token.to_owned());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.lock() = None;
        Ok(())
    }
}

/// A session already logged in as `user_id` with role `rol`, valid for one
/// hour past the clock's current time.
pub async fn logged_in_session(clock: Arc<dyn Clock>, user_id: i64, rol: &str) -> Arc<Session> {
    let exp = clock.utc().timestamp() + 3_600;
    let session = Session::new(Arc::new(MemoryTokenStore::default()), clock);
    if let Err(error) = session
        .establish(&unsigned_token(user_id, rol, exp))
        .await
    {
        panic!("fixture session should log in: {error}");
    }
    Arc::new(session)
}
