//! Authentication configuration.

/// Configuration for the identity services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Number of digits in a login code (default: 6).
    pub otp_code_length: usize,
    /// Login code lifetime in seconds (default: 600 = 10 minutes).
    pub otp_lifetime_secs: u64,
    /// Max failed verification attempts per code (default: 5).
    pub otp_max_attempts: i32,
    /// Session lifetime in seconds (default: 604_800 = 7 days).
    pub session_lifetime_secs: u64,
    /// Refresh token lifetime in seconds (default: 2_592_000 = 30 days).
    pub refresh_token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_code_length: 6,
            otp_lifetime_secs: 600,
            otp_max_attempts: 5,
            session_lifetime_secs: 604_800,
            refresh_token_lifetime_secs: 2_592_000,
        }
    }
}
