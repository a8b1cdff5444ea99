//! Helpers for transports that sit in front of the engine
//!
//! The engine itself accepts any non-empty share code and returns a typed
//! `Result`. Upload handlers validate the share code shape first and turn
//! the result into the JSON payload the web front end expects.

use serde::Serialize;
use thiserror::Error;

use crate::error::{ErrorKind, ExtractionError};
use crate::xml::IdentityRecord;

/// Number of digits in a share code
pub const SHARE_CODE_LENGTH: usize = 4;

/// Rejected share code input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareCodeError {
    #[error("Please enter your share code")]
    Empty,

    #[error("Share code must be exactly 4 digits")]
    WrongLength(usize),

    #[error("Share code must contain only digits (0-9)")]
    NotNumeric,
}

/// Validate a share code as typed by the user and return it trimmed.
pub fn validate_share_code(code: &str) -> Result<&str, ShareCodeError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ShareCodeError::Empty);
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ShareCodeError::NotNumeric);
    }

    if code.len() != SHARE_CODE_LENGTH {
        return Err(ShareCodeError::WrongLength(code.len()));
    }

    Ok(code)
}

/// How a transport should present an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    ClientError,
    ServerError,
}

impl ResponseClass {
    /// HTTP status code for this class
    pub fn status_code(&self) -> u16 {
        match self {
            ResponseClass::Success => 200,
            ResponseClass::ClientError => 400,
            ResponseClass::ServerError => 500,
        }
    }
}

impl From<ErrorKind> for ResponseClass {
    fn from(kind: ErrorKind) -> Self {
        if kind.is_client_error() {
            ResponseClass::ClientError
        } else {
            ResponseClass::ServerError
        }
    }
}

/// JSON body returned to the upload page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VerificationResponse {
    Verified {
        success: bool,
        name: String,
        dob: String,
        gender: String,
        address: String,
        #[serde(rename = "referenceId")]
        reference_id: String,
        photo: Option<String>,
    },
    Failed {
        success: bool,
        error: String,
        code: ErrorKind,
    },
}

impl VerificationResponse {
    pub fn from_record(record: IdentityRecord) -> Self {
        VerificationResponse::Verified {
            success: true,
            name: record.name,
            dob: record.date_of_birth,
            gender: record.gender,
            address: record.address,
            reference_id: record.reference_id,
            photo: record.photograph,
        }
    }

    pub fn from_error(err: &ExtractionError) -> Self {
        let kind = err.kind();
        VerificationResponse::Failed {
            success: false,
            error: kind.user_message().to_string(),
            code: kind,
        }
    }

    pub fn from_result(result: crate::error::Result<IdentityRecord>) -> Self {
        match result {
            Ok(record) => Self::from_record(record),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn class(&self) -> ResponseClass {
        match self {
            VerificationResponse::Verified { .. } => ResponseClass::Success,
            VerificationResponse::Failed { code, .. } => ResponseClass::from(*code),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.class().status_code()
    }
}
