//! Session cookie settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning so a fresh
//! checkout runs without secrets. Release builds refuse to start unless
//! every toggle is present and valid.

use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub const KEY_FILE_ENV: &str = "CASEWORK_SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "CASEWORK_SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "CASEWORK_SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "CASEWORK_SESSION_ALLOW_EPHEMERAL";
pub const TTL_HOURS_ENV: &str = "CASEWORK_SESSION_TTL_HOURS";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/casework_session_key";
pub const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_TTL_HOURS: u64 = 8;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const HOURS_EXPECTED: &str = "a whole number of hours between 1 and 168";

/// Build profile the settings are validated against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    /// Lifetime of an idle session cookie.
    pub ttl: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("CASEWORK_SESSION_SAMESITE=None requires CASEWORK_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("CASEWORK_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// One environment toggle, read and parsed.
struct Toggle<'a, E> {
    env: &'a E,
    mode: BuildMode,
    name: &'static str,
    expected: &'static str,
}

impl<E: Env> Toggle<'_, E> {
    /// Parse the variable, falling back to `default` in debug builds when it
    /// is missing or malformed.
    fn read<T>(
        &self,
        default: T,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        let Some(raw) = self.env.string(self.name) else {
            if self.mode == BuildMode::Debug {
                warn!(variable = self.name, "session toggle not set; using default");
                return Ok(default);
            }
            return Err(SessionConfigError::MissingEnv { name: self.name });
        };
        if let Some(value) = parse(raw.trim()) {
            return Ok(value);
        }
        if self.mode == BuildMode::Debug {
            warn!(variable = self.name, value = %raw, "invalid session toggle; using default");
            return Ok(default);
        }
        Err(SessionConfigError::InvalidEnv {
            name: self.name,
            value: raw,
            expected: self.expected,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_hours(value: &str) -> Option<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|hours| (1..=168).contains(hours))
}

/// Read and validate every session toggle.
///
/// # Errors
///
/// Any [`SessionConfigError`] in release builds; in debug builds only an
/// unreadable key file with nothing else to fall back on is fatal, and even
/// that is replaced by an ephemeral key.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let toggle = |name, expected| Toggle {
        env,
        mode,
        name,
        expected,
    };
    let cookie_secure = toggle(COOKIE_SECURE_ENV, BOOL_EXPECTED).read(true, parse_bool)?;
    let default_same_site = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let same_site =
        toggle(SAMESITE_ENV, SAMESITE_EXPECTED).read(default_same_site, parse_same_site)?;
    if same_site == SameSite::None && !cookie_secure {
        if mode == BuildMode::Release {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SameSite=None without a secure cookie; browsers may drop the session");
    }
    let allow_ephemeral = toggle(ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED).read(false, parse_bool)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl_hours = match env.string(TTL_HOURS_ENV) {
        None => DEFAULT_TTL_HOURS,
        Some(_) => toggle(TTL_HOURS_ENV, HOURS_EXPECTED).read(DEFAULT_TTL_HOURS, parse_hours)?,
    };
    let key_path = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH), PathBuf::from);
    let key = load_key(key_path, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl: Duration::from_secs(ttl_hours * 3600),
    })
}

fn load_key(path: PathBuf, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            if mode == BuildMode::Release && bytes.len() < SESSION_KEY_MIN_LEN {
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length: bytes.len(),
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using an ephemeral session key; sessions will not survive a restart");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mockable::MockEnv;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    struct TempKeyFile {
        path: PathBuf,
    }

    impl TempKeyFile {
        fn new(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("casework-session-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self { path }
        }

        fn path_str(&self) -> String {
            self.path.to_string_lossy().into_owned()
        }
    }

    impl Drop for TempKeyFile {
        fn drop(&mut self) {
            drop(std::fs::remove_file(&self.path));
        }
    }

    fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_vars(key: &TempKeyFile) -> HashMap<&'static str, String> {
        HashMap::from([
            (KEY_FILE_ENV, key.path_str()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
        ])
    }

    #[test]
    fn release_accepts_complete_configuration() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let settings = session_settings_from_env(&mock_env(release_vars(&key)), BuildMode::Release)
            .expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
        assert_eq!(settings.ttl, Duration::from_secs(8 * 3600));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV)]
    #[case(SAMESITE_ENV)]
    #[case(ALLOW_EPHEMERAL_ENV)]
    fn release_requires_every_toggle(#[case] missing: &'static str) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.remove(missing);
        let Err(error) = session_settings_from_env(&mock_env(vars), BuildMode::Release) else {
            panic!("missing {missing} accepted");
        };
        assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "sideways")]
    #[case(TTL_HOURS_ENV, "0")]
    #[case(TTL_HOURS_ENV, "forever")]
    fn release_rejects_malformed_values(#[case] name: &'static str, #[case] value: &str) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.insert(name, value.to_owned());
        let Err(error) = session_settings_from_env(&mock_env(vars), BuildMode::Release) else {
            panic!("{name}={value} accepted");
        };
        assert!(matches!(error, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
    }

    #[test]
    fn release_rejects_short_keys() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1);
        let Err(error) = session_settings_from_env(&mock_env(release_vars(&key)), BuildMode::Release)
        else {
            panic!("short key accepted");
        };
        assert!(matches!(error, SessionConfigError::KeyTooShort { .. }));
    }

    #[test]
    fn release_rejects_insecure_same_site_none() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
        vars.insert(SAMESITE_ENV, "None".to_owned());
        let Err(error) = session_settings_from_env(&mock_env(vars), BuildMode::Release) else {
            panic!("insecure SameSite=None accepted");
        };
        assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
    }

    #[test]
    fn release_refuses_ephemeral_keys() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());
        let Err(error) = session_settings_from_env(&mock_env(vars), BuildMode::Release) else {
            panic!("ephemeral key accepted");
        };
        assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
    }

    #[test]
    fn debug_falls_back_to_defaults() {
        let vars = HashMap::from([
            (KEY_FILE_ENV, "/nonexistent/casework-key".to_owned()),
            (COOKIE_SECURE_ENV, "perhaps".to_owned()),
        ]);
        let settings =
            session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[test]
    fn custom_ttl_is_honoured() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.insert(TTL_HOURS_ENV, "2".to_owned());
        let settings = session_settings_from_env(&mock_env(vars), BuildMode::Release)
            .expect("valid settings");
        assert_eq!(settings.ttl, Duration::from_secs(2 * 3600));
    }
}
