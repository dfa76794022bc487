use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

const VALID_USERNAME: &str = "Admin";
const VALID_PASSWORD: &str = "Aa123456";

/// Session record persisted for the life of the console session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub is_authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            username: String::new(),
            is_authenticated: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("session store I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The gate reports nothing beyond "invalid"; there is no user enumeration
/// to protect against on a single-credential console, but the habit stays.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Key-value persistence for the session record, serialized as JSON text.
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self);
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> Option<Session> {
        (**self).load()
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        (**self).save(session)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Keeps the serialized record in memory; the session dies with the
/// process, like a browser session store.
#[derive(Default)]
pub struct MemorySessionStore {
    entry: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        let entry = self.entry.lock().ok()?;
        entry.as_deref().and_then(|raw| serde_json::from_str(raw).ok())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let raw = serde_json::to_string(session)?;
        if let Ok(mut entry) = self.entry.lock() {
            *entry = Some(raw);
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = None;
        }
    }
}

/// Writes the record to a file so a restarted driver resumes its session.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let raw = serde_json::to_string(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Login gate plus session lifecycle.
///
/// Construction reads the store once; a previously saved session survives
/// until logout clears it.
pub struct Authenticator<S: SessionStore> {
    store: S,
    session: Session,
}

impl<S: SessionStore> Authenticator<S> {
    pub fn restore(store: S) -> Self {
        let session = store.load().unwrap_or_else(Session::anonymous);
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    /// Checks the fixed credential pair. Failure leaves no session entry
    /// behind and the live session untouched.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&Session, AuthError> {
        if username != VALID_USERNAME || password != VALID_PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }
        self.session = Session {
            username: username.to_string(),
            is_authenticated: true,
        };
        if let Err(err) = self.store.save(&self.session) {
            log::warn!("session not persisted: {err}");
        }
        Ok(&self.session)
    }

    pub fn logout(&mut self) {
        self.session = Session::anonymous();
        self.store.clear();
    }
}
