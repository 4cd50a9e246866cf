//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from raw payload strings before any
//! store lookup happens, so blank or malformed input never reaches a port.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like an address.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Normalise an email address for lookups and uniqueness checks.
pub fn normalise_email(raw: &str) -> Result<String, LoginValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LoginValidationError::EmptyEmail);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(trimmed.to_ascii_lowercase())
        }
        _ => Err(LoginValidationError::MalformedEmail),
    }
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and contains a domain part.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use casework::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Council.gov.uk ", "pw").unwrap();
/// assert_eq!(creds.email(), "admin@council.gov.uk");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the user lookup.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
