use std::collections::HashMap;

use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use super::state::UserDetails;
use super::{AuthError, Result};

const AUTH_PATH: &str = "users/auth/";
pub const LOGIN_ERROR_MESSAGE: &str = "An error occurred during login.";
pub const SIGNUP_ERROR_MESSAGE: &str = "An error occurred during signup.";
pub const VERIFY_ERROR_MESSAGE: &str = "something went wrong";

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub account: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDetails>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct VerifyResponse {
    #[serde(default)]
    pub user: Option<UserDetails>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<HashMap<String, String>>,
}

/// The remote authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse>;
    async fn verify_token(&self, token: &str) -> Result<VerifyResponse>;
}

#[derive(Clone)]
pub struct AuthGateway {
    client: Client,
    base_url: Url,
}

impl AuthGateway {
    /// `api_url` is the API root, e.g. `http://localhost:5000/api/`.
    pub fn new(api_url: &str) -> Result<Self> {
        let root = if api_url.ends_with('/') {
            Url::parse(api_url)?
        } else {
            Url::parse(&format!("{}/", api_url))?
        };

        Ok(Self {
            client: Client::new(),
            base_url: root.join(AUTH_PATH)?,
        })
    }

    pub fn endpoint(&self, name: &str) -> Result<Url> {
        Ok(self.base_url.join(name)?)
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        map_error: impl FnOnce(StatusCode, &str) -> AuthError,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        error!("❌ Auth gateway returned {}: {}", status, body);
        Err(map_error(status, &body))
    }
}

#[async_trait]
impl AuthApi for AuthGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        info!("🔐 Logging in as {}", request.account);
        let response = self
            .client
            .post(self.endpoint("login")?)
            .json(request)
            .send()
            .await?;
        Self::read_json(response, |status, body| error_from_response(status, body, LOGIN_ERROR_MESSAGE)).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        info!("🔐 Signing up {}", request.email);
        let response = self
            .client
            .post(self.endpoint("signup")?)
            .json(request)
            .send()
            .await?;
        Self::read_json(response, |status, body| error_from_response(status, body, SIGNUP_ERROR_MESSAGE)).await
    }

    async fn verify_token(&self, token: &str) -> Result<VerifyResponse> {
        let response = self
            .client
            .post(self.endpoint("verify-token")?)
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::read_json(response, verify_error_from_response).await
    }
}

/// Maps a failed login or signup reply onto [`AuthError::Rejected`],
/// whatever the status.
///
/// The body's `errors` map becomes the field errors. When the body has none,
/// its message (or `default_message`) is reported against `email`.
pub fn error_from_response(status: StatusCode, body: &str, default_message: &str) -> AuthError {
    let parsed = parse_error_body(body);
    let message = error_message(&parsed, default_message);

    let field_errors = parsed
        .errors
        .filter(|errors| !errors.is_empty())
        .unwrap_or_else(|| HashMap::from([("email".to_string(), message.clone())]));

    AuthError::Rejected {
        status: status.as_u16(),
        message,
        field_errors,
    }
}

/// Token verification: 401 and 403 mean the token is no good and become
/// `Unauthorized`. Everything else maps as [`error_from_response`] does.
pub fn verify_error_from_response(status: StatusCode, body: &str) -> AuthError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AuthError::Unauthorized {
            status: status.as_u16(),
            message: error_message(&parse_error_body(body), VERIFY_ERROR_MESSAGE),
        };
    }
    error_from_response(status, body, VERIFY_ERROR_MESSAGE)
}

fn parse_error_body(body: &str) -> ErrorBody {
    serde_json::from_str(body).unwrap_or_default()
}

fn error_message(parsed: &ErrorBody, default_message: &str) -> String {
    parsed
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(default_message)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_under_auth_path() {
        let gateway = AuthGateway::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            gateway.endpoint("verify-token").unwrap().as_str(),
            "http://localhost:5000/api/users/auth/verify-token"
        );

        let gateway = AuthGateway::new("https://example.com/api/").unwrap();
        assert_eq!(
            gateway.endpoint("login").unwrap().as_str(),
            "https://example.com/api/users/auth/login"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(AuthGateway::new("not a url"), Err(AuthError::InvalidUrl(_))));
    }

    #[test]
    fn test_unauthorized_statuses() {
        let err = verify_error_from_response(StatusCode::FORBIDDEN, r#"{"message":"Token expired"}"#);
        match err {
            AuthError::Unauthorized { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Token expired");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_verify_server_error_is_rejected() {
        match verify_error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "") {
            AuthError::Rejected { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, VERIFY_ERROR_MESSAGE);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized_login_keeps_field_errors() {
        let body = r#"{"message":"Invalid credentials","errors":{"password":"Wrong password"}}"#;
        let err = error_from_response(StatusCode::UNAUTHORIZED, body, LOGIN_ERROR_MESSAGE);

        assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
        let fields = err.field_errors();
        assert_eq!(fields.get("password").map(String::as_str), Some("Wrong password"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_forbidden_signup_reports_message_on_email() {
        let err = error_from_response(StatusCode::FORBIDDEN, r#"{"message":"Email already registered"}"#, SIGNUP_ERROR_MESSAGE);
        assert_eq!(
            err.field_errors().get("email").map(String::as_str),
            Some("Email already registered")
        );
    }

    #[test]
    fn test_field_errors_are_kept() {
        let body = r#"{"message":"Validation failed","errors":{"password":"Too short"}}"#;
        match error_from_response(StatusCode::BAD_REQUEST, body, SIGNUP_ERROR_MESSAGE) {
            AuthError::Rejected { field_errors, message, .. } => {
                assert_eq!(message, "Validation failed");
                assert_eq!(field_errors.get("password").map(String::as_str), Some("Too short"));
                assert!(!field_errors.contains_key("email"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_message_falls_back_to_email_field() {
        match error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>", LOGIN_ERROR_MESSAGE) {
            AuthError::Rejected { status, field_errors, .. } => {
                assert_eq!(status, 500);
                assert_eq!(field_errors.get("email").map(String::as_str), Some(LOGIN_ERROR_MESSAGE));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_request_validation() {
        let signup = SignupRequest {
            name: "Sam".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = signup.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));

        let login = LoginRequest {
            account: "sam@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(login.validate().is_ok());
    }
}
