pub mod gateway;
pub mod service;
pub mod state;
pub mod token;

pub use gateway::{AuthApi, AuthGateway, AuthResponse, LoginRequest, SignupRequest, VerifyResponse};
pub use service::AuthService;
pub use state::{AuthContext, AuthState, UserDetails};
pub use token::{TokenStore, ACCESS_TOKEN_KEY};

use std::collections::HashMap;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        field_errors: HashMap<String, String>,
    },
    #[error("Auth request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid auth API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid form: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),
    #[error("Token storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Per-field messages suitable for showing next to form inputs.
    pub fn field_errors(&self) -> HashMap<String, String> {
        match self {
            AuthError::Rejected { field_errors, .. } => field_errors.clone(),
            AuthError::InvalidForm(errors) => errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, errs)| {
                    errs.first().map(|e| {
                        let message = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string());
                        (field.to_string(), message)
                    })
                })
                .collect(),
            _ => HashMap::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
