//! Auth sub-client — login, signup, password flows, logout, profile.

use tracing::{info, warn};

use crate::auth::{
    ChangePasswordRequest, EmailRequest, GoogleLoginRequest, GoogleLoginResponse, LoginRequest,
    LoginResponse, MessageResponse, ResetPasswordRequest, SignupRequest,
};
use crate::client::StoreClient;
use crate::domain::cart::CartState;
use crate::error::{AuthError, HttpError, SdkError};
use crate::http::RetryPolicy;
use crate::session::Customer;
use crate::shared::validation::{
    validate_email, validate_name, validate_password, validate_phone, validate_required,
    MIN_NAME_LEN, MIN_PASSWORD_LEN,
};

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a StoreClient,
}

impl<'a> Auth<'a> {
    /// Sign in with email and password and persist the session.
    ///
    /// A refusal from the server (unknown user, wrong password) is
    /// [`AuthError::LoginFailed`] carrying its message.
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, SdkError> {
        let email = email.trim();
        validate_email(email).into_result()?;
        validate_required(password, "Password").into_result()?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .client
            .http
            .post("/login", &request, RetryPolicy::None)
            .await
            .map_err(login_failure)?;

        let customer = resp.customer();
        self.client
            .session
            .persist_login(&customer, resp.token.as_deref())?;
        info!(customer_id = %customer.id, admin = customer.is_admin(), "Signed in");
        Ok(customer)
    }

    /// Sign in with a Google ID-token credential.
    pub async fn google_login(&self, credential: &str) -> Result<Customer, SdkError> {
        validate_required(credential, "Google credential").into_result()?;

        let resp: GoogleLoginResponse = self
            .client
            .http
            .post(
                "/auth/google",
                &GoogleLoginRequest { token: credential },
                RetryPolicy::None,
            )
            .await
            .map_err(login_failure)?;

        self.client
            .session
            .persist_login(&resp.customer, resp.token.as_deref())?;
        info!(customer_id = %resp.customer.id, "Signed in with Google");
        Ok(resp.customer)
    }

    /// Create an account. Returns the server's confirmation message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String, SdkError> {
        validate_name(&request.name, MIN_NAME_LEN).into_result()?;
        validate_email(&request.email).into_result()?;
        validate_password(&request.password, MIN_PASSWORD_LEN).into_result()?;
        if let Some(phone) = &request.phone {
            validate_phone(phone).into_result()?;
        }

        self.acknowledge("/signup", request, "Signup successful!")
            .await
    }

    /// Ask for a password-reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<String, SdkError> {
        let email = email.trim();
        validate_email(email).into_result()?;
        self.acknowledge(
            "/forgot-password",
            &EmailRequest { email },
            "If that email is registered, a reset link is on its way.",
        )
        .await
    }

    /// Set a new password using the token from the reset email.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<String, SdkError> {
        validate_required(token, "Reset token").into_result()?;
        validate_password(new_password, MIN_PASSWORD_LEN).into_result()?;
        self.acknowledge(
            "/reset-password",
            &ResetPasswordRequest {
                token,
                new_password,
            },
            "Password has been reset.",
        )
        .await
    }

    /// Change the signed-in customer's password.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, SdkError> {
        self.client.session.require_customer()?;
        validate_required(old_password, "Current password").into_result()?;
        validate_password(new_password, MIN_PASSWORD_LEN).into_result()?;
        if old_password == new_password {
            return Err(SdkError::InvalidArgument(
                "New password must be different from the current one".to_string(),
            ));
        }

        self.acknowledge(
            "/customers/change-password",
            &ChangePasswordRequest {
                old_password,
                new_password,
            },
            "Password changed successfully.",
        )
        .await
    }

    /// Clear every identity key plus the in-memory cart and wishlist.
    /// Browsing history survives.
    pub async fn logout(&self) {
        self.client.session.clear_auth();
        self.client.cart().replace(CartState::new()).await;
        self.client.wishlist().replace(Vec::new()).await;
        info!("Signed out");
    }

    pub fn current_customer(&self) -> Option<Customer> {
        self.client.session.customer()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.current_customer().is_some_and(|c| c.is_admin())
    }

    /// POST expecting a `{message}` body. A 400 is the server refusing with
    /// a reason.
    async fn acknowledge<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<String, SdkError> {
        let resp: Option<MessageResponse> = self
            .client
            .http
            .post(path, body, RetryPolicy::None)
            .await
            .map_err(|e| match e {
                HttpError::BadRequest { message, .. } => {
                    warn!(path, "Request refused");
                    SdkError::Rejected(message.unwrap_or_else(|| fallback_refusal(path)))
                }
                other => other.into(),
            })?;
        Ok(resp
            .and_then(|r| r.message)
            .unwrap_or_else(|| fallback.to_string()))
    }
}

fn login_failure(e: HttpError) -> SdkError {
    match e {
        HttpError::BadRequest { message, .. } | HttpError::Unauthorized(message) => {
            SdkError::Auth(AuthError::LoginFailed(
                message.unwrap_or_else(|| "Login failed".to_string()),
            ))
        }
        other => other.into(),
    }
}

fn fallback_refusal(path: &str) -> String {
    match path {
        "/signup" => "Signup failed".to_string(),
        _ => "Request failed. Please try again.".to_string(),
    }
}
