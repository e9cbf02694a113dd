//! Error types for Eventmart.

/// Top-level error type for the session SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Profile store error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the identity provider during sign-in/sign-up.
///
/// These are surfaced verbatim to the user as actionable messages; they
/// never feed into routing, since no identity was established.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("No account exists for this email")]
    UserNotFound,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Too many attempts, try again later")]
    TooManyRequests,

    #[error("An account already exists for this email")]
    EmailAlreadyInUse,

    #[error("Password is too weak")]
    WeakPassword,

    #[error("Could not reach the identity provider: {0}")]
    Network(String),

    #[error("Identity provider rejected the request: {code}")]
    Unexpected { code: String },
}

/// Profile store failures, discriminated by kind rather than inferred from
/// message text. `NotFound` is the expected outcome for brand-new accounts
/// and drives onboarding routing; the other kinds trigger degraded routing.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("No profile record exists for this account")]
    NotFound,

    #[error("Unable to connect to the profile service: {reason}")]
    Network { reason: String },

    #[error("Profile service returned an unexpected response (status {status}): {reason}")]
    Unexpected { status: u16, reason: String },
}

/// Local session-cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to open cache: {0}")]
    Open(String),

    #[error("Cache query failed: {0}")]
    Query(String),

    #[error("Cache migration failed: {0}")]
    Migration(String),
}

/// Result type alias for the SDK.
pub type Result<T> = std::result::Result<T, Error>;
