//! Auth gateway: drives the three login flows against the API.
//!
//! Each flow has the same shape: local preconditions are checked before any
//! network call (reported as validation errors), the network leg runs
//! through [`ApiClient`], and success hands one [`Identity`] back to the
//! caller. The caller commits it to the session store exactly once per
//! attempt; a failed attempt leaves the store untouched.

use serde::Deserialize;

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::types::{Identity, UserType};

/// Fixed length of a one-time code.
pub const OTP_LEN: usize = 6;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Google's userinfo endpoint, queried with the provider access token.
const PROVIDER_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Profile fields returned by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Provider-side subject identifier.
    pub sub: String,
}

/// Drives login/registration flows and hands identities to the caller.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    api: ApiClient,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ========================================================================
    // OTP flow
    // ========================================================================

    /// Requests a one-time code. Empty contact is rejected locally.
    pub async fn send_code(&self, contact: &str, role: UserType) -> ApiResult<Option<String>> {
        let contact = contact.trim();
        if contact.is_empty() {
            return Err(ApiError::validation("Enter your email or phone number."));
        }
        self.api.send_otp(contact, role).await
    }

    /// Verifies a one-time code. The code must be exactly [`OTP_LEN`]
    /// digits; anything else is rejected without a network call so a
    /// half-typed code never burns a verification attempt.
    pub async fn verify_code(&self, contact: &str, code: &str) -> ApiResult<Identity> {
        if code.len() != OTP_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::validation(format!(
                "Enter the full {OTP_LEN}-digit code."
            )));
        }
        self.api.verify_otp(contact.trim(), code).await
    }

    // ========================================================================
    // Credential flow
    // ========================================================================

    /// Email/password sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Identity> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required."));
        }
        self.api.email_signin(email, password).await
    }

    /// Email/password registration.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: UserType,
    ) -> ApiResult<Identity> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Name, email and password are required."));
        }
        if password != confirm_password {
            return Err(ApiError::validation("Passwords do not match."));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long."
            )));
        }
        self.api.email_signup(name, email, password, role).await
    }

    // ========================================================================
    // Federated flow
    // ========================================================================

    /// Builds the provider authorize URL for the implicit grant. The state
    /// nonce comes back in the fragment and lets the UI reject mismatched
    /// callbacks.
    pub fn build_authorize_url(client_id: &str, state: &str) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", client_id)
            .append_pair("response_type", "token")
            .append_pair("scope", "openid email profile")
            .append_pair("redirect_uri", "urn:ietf:wg:oauth:2.0:oob")
            .append_pair("state", state)
            .finish();
        format!("https://accounts.google.com/o/oauth2/v2/auth?{query}")
    }

    /// Fetches the signed-in user's profile from the identity provider.
    pub async fn fetch_provider_profile(&self, access_token: &str) -> ApiResult<ProviderProfile> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(ApiError::validation("Paste the provider access token."));
        }
        let response = self
            .api
            .http()
            .get(PROVIDER_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "identity provider unreachable");
                ApiError::new(
                    crate::api::ApiErrorKind::Transport,
                    "Cannot reach the identity provider.",
                )
            })?;
        if !response.status().is_success() {
            return Err(ApiError::rejected(Some(
                "The identity provider rejected the token.".to_string(),
            )));
        }
        response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "userinfo response did not parse");
            ApiError::decode()
        })
    }

    /// Exchanges the provider token (plus the chosen role) for an identity.
    pub async fn exchange(
        &self,
        provider_token: &str,
        role: UserType,
        profile: &ProviderProfile,
    ) -> ApiResult<Identity> {
        self.api
            .google_signin(
                provider_token,
                role,
                &profile.email,
                &profile.name,
                &profile.sub,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiErrorKind;
    use crate::session::SessionStore;

    fn gateway(server: &MockServer) -> AuthGateway {
        AuthGateway::new(ApiClient::new(&server.uri()).unwrap())
    }

    fn identity_envelope() -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "message": "OTP verified",
            "data": {
                "userId": 11,
                "name": "Ada",
                "email": "user@example.com",
                "userType": "PATIENT",
                "accessCode": "AC-11"
            }
        })
    }

    #[tokio::test]
    async fn test_otp_flow_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/send-otp"))
            .and(body_json(serde_json::json!({
                "contact": "user@example.com",
                "userType": "PATIENT"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "OTP sent"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-otp"))
            .and(body_json(serde_json::json!({
                "contact": "user@example.com",
                "otpCode": "123456"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(identity_envelope()))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let ack = gateway
            .send_code("user@example.com", UserType::Patient)
            .await
            .unwrap();
        assert_eq!(ack.as_deref(), Some("OTP sent"));

        let identity = gateway
            .verify_code("user@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(identity.user_type, UserType::Patient);

        // One successful attempt commits the identity exactly once.
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().join("session.json"));
        store.initialize();
        let commits = std::rc::Rc::new(std::cell::RefCell::new(0u32));
        let counter = std::rc::Rc::clone(&commits);
        store.subscribe(move |_| *counter.borrow_mut() += 1);
        store.set_identity(identity);
        assert_eq!(*commits.borrow(), 1);
        assert_eq!(store.current().unwrap().user_type, UserType::Patient);
    }

    #[tokio::test]
    async fn test_otp_rejection_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-otp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid OTP"
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let err = gateway
            .verify_code("user@example.com", "000000")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message, "Invalid OTP");
    }

    #[tokio::test]
    async fn test_empty_contact_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/send-otp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let err = gateway.send_code("   ", UserType::Patient).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_incomplete_code_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-otp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        for code in ["123", "12345", "12a456", ""] {
            let err = gateway.verify_code("user@example.com", code).await.unwrap_err();
            assert!(err.is_validation(), "code {code:?} should fail locally");
        }
    }

    #[tokio::test]
    async fn test_signin_against_unreachable_host_is_transport() {
        let gateway = AuthGateway::new(ApiClient::new("http://127.0.0.1:9/api").unwrap());
        let err = gateway
            .sign_in("user@example.com", "hunter22")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(err.message.contains("Cannot reach the server"));
    }

    #[tokio::test]
    async fn test_signup_password_rules_are_local() {
        let server = MockServer::start().await;
        let gateway = gateway(&server);

        let err = gateway
            .sign_up("Ada", "ada@example.com", "abc12", "abc12", UserType::Patient)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.message.contains("at least 6"));

        let err = gateway
            .sign_up("Ada", "ada@example.com", "abc123", "abc124", UserType::Patient)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.message.contains("do not match"));
    }

    #[test]
    fn test_authorize_url_carries_client_and_state() {
        let url = AuthGateway::build_authorize_url("client-1", "nonce-9");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("state=nonce-9"));
        assert!(url.contains("response_type=token"));
    }
}
