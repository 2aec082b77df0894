//! One-time code types.

use chrono::{DateTime, Utc};

use super::OtpId;

/// One-time code record. At most one row exists per email at any time.
#[derive(Clone, Debug)]
pub struct Otp {
    pub id: OtpId,
    pub email: String, // Lowercased; the row key
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32, // Failed verification attempts
    pub created_at: DateTime<Utc>,
}

/// Parameters for storing a one-time code.
///
/// `put_otp` is an insert-or-replace keyed by email: any previous code for
/// the address is superseded in the same write and `attempts` restarts at 0.
#[derive(Clone, Debug)]
pub struct PutOtpParams {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
