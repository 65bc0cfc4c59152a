use log::{error, info, warn};
use validator::Validate;

use crate::storage::KeyValueStore;

use super::gateway::{AuthApi, AuthResponse, LoginRequest, SignupRequest};
use super::state::{AuthContext, UserDetails};
use super::token::TokenStore;
use super::{AuthError, Result};

/// Sign-in flows: talks to the gateway, keeps the token store and the
/// shared [`AuthContext`] in step.
pub struct AuthService<A, S> {
    api: A,
    tokens: TokenStore<S>,
    context: AuthContext,
}

impl<A: AuthApi, S: KeyValueStore> AuthService<A, S> {
    pub fn new(api: A, storage: S, context: AuthContext) -> Self {
        Self {
            api,
            tokens: TokenStore::new(storage),
            context,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Option<UserDetails>> {
        request.validate()?;
        let response = self.api.login(&request).await?;
        info!("✅ Login successful");
        self.accept(response)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<Option<UserDetails>> {
        request.validate()?;
        let response = self.api.signup(&request).await?;
        info!("✅ Account created successfully");
        self.accept(response)
    }

    /// Checks the stored token with the gateway.
    ///
    /// `Ok(None)` means signed out: there was no token, or the gateway
    /// answered 401/403 (the token is then discarded). Other failures mark
    /// the state unauthenticated and are returned.
    pub async fn verify(&self) -> Result<Option<UserDetails>> {
        let Some(token) = self.tokens.get() else {
            info!("No stored access token");
            self.context.set_authenticated(false);
            return Ok(None);
        };

        match self.api.verify_token(&token).await {
            Ok(response) => {
                self.context.set_token(Some(token));
                self.context.set_user_details(response.user.clone());
                self.context.set_authenticated(true);
                info!("✅ Access token verified");
                Ok(response.user)
            }
            Err(AuthError::Unauthorized { status, message }) => {
                warn!("⚠️ Access token rejected ({}): {}", status, message);
                self.sign_out();
                Ok(None)
            }
            Err(e) => {
                error!("❌ Token verification failed: {}", e);
                self.context.set_authenticated(false);
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        info!("Logging out, clearing auth state");
        self.sign_out();
    }

    fn accept(&self, response: AuthResponse) -> Result<Option<UserDetails>> {
        if let Some(token) = response.token.filter(|t| !t.is_empty()) {
            self.tokens.set(&token)?;
            self.context.set_token(Some(token));
        }
        self.context.set_user_details(response.user.clone());
        self.context.set_authenticated(true);
        Ok(response.user)
    }

    fn sign_out(&self) {
        self.context.set_authenticated(false);
        self.context.set_token(None);
        self.context.set_user_details(None);
        if let Err(e) = self.tokens.clear() {
            error!("❌ Failed to remove access token: {}", e);
        }
    }
}
