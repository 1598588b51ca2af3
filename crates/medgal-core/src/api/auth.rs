//! Auth endpoints.

use serde::Serialize;

use super::{ApiClient, ApiResult};
use crate::types::{Identity, UserType};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpRequest<'a> {
    contact: &'a str,
    user_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpRequest<'a> {
    contact: &'a str,
    otp_code: &'a str,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    user_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSignInRequest<'a> {
    id_token: &'a str,
    user_type: &'a str,
    email: &'a str,
    name: &'a str,
    google_id: &'a str,
}

impl ApiClient {
    /// Checks whether the backend is reachable and healthy.
    ///
    /// The health endpoint is the one route outside the envelope contract;
    /// only the status matters.
    pub async fn health(&self) -> bool {
        match self.raw_get_status("/auth/health").await {
            Ok(status) => status.is_success(),
            Err(_) => false,
        }
    }

    /// Requests a one-time code for the given contact.
    /// Returns the server's acknowledgement message, if any.
    pub async fn send_otp(
        &self,
        contact: &str,
        role: UserType,
    ) -> ApiResult<Option<String>> {
        self.post_ack(
            "/auth/send-otp",
            &SendOtpRequest {
                contact,
                user_type: role.id(),
            },
        )
        .await
    }

    /// Verifies a one-time code; success yields the authenticated identity.
    pub async fn verify_otp(&self, contact: &str, code: &str) -> ApiResult<Identity> {
        self.post_json(
            "/auth/verify-otp",
            &VerifyOtpRequest {
                contact,
                otp_code: code,
            },
        )
        .await
    }

    /// Email/password sign-in.
    pub async fn email_signin(&self, email: &str, password: &str) -> ApiResult<Identity> {
        self.post_json("/auth/email-signin", &SignInRequest { email, password })
            .await
    }

    /// Email/password registration.
    pub async fn email_signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserType,
    ) -> ApiResult<Identity> {
        self.post_json(
            "/auth/email-signup",
            &SignUpRequest {
                name,
                email,
                password,
                user_type: role.id(),
            },
        )
        .await
    }

    /// Exchanges a provider token (plus the chosen role) for an identity.
    pub async fn google_signin(
        &self,
        provider_token: &str,
        role: UserType,
        email: &str,
        name: &str,
        provider_id: &str,
    ) -> ApiResult<Identity> {
        self.post_json(
            "/auth/google-signin",
            &GoogleSignInRequest {
                id_token: provider_token,
                user_type: role.id(),
                email,
                name,
                google_id: provider_id,
            },
        )
        .await
    }

    /// Looks up the identity behind a sharing access code.
    pub async fn user_by_access_code(&self, access_code: &str) -> ApiResult<Identity> {
        self.get_json(&format!("/auth/user/{access_code}")).await
    }
}
