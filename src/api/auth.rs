use serde_json::json;
use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::models::{Registration, User};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::wire::{decode_user, unwrap_object, LoginBody, LoginResponse, RegisterBody};

use super::ApiClient;

impl ApiClient {
    /// Log in and persist the resulting session to `store`.
    ///
    /// When the login response carries no user, it is fetched from `/auth/me`
    /// with the new token.
    pub async fn login(
        &self,
        store: &dyn KeyValueStore,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let body = self
            .post_json(&Session::anonymous(), "/auth/login", &LoginBody { email, password })
            .await?;
        let session = self.open_session(store, body).await?;

        if let Some(user) = session.user() {
            info!("Logged in as {} ({})", user.email, user.role);
        }
        Ok(session)
    }

    /// Create an account and log straight into it.
    ///
    /// The form is checked locally first: names of at least two characters,
    /// an address shaped like `a@b.c` and a password of six or more characters.
    pub async fn register(&self, store: &dyn KeyValueStore, form: &Registration) -> Result<Session> {
        validate_registration(form)?;

        let body = self
            .post_json(&Session::anonymous(), "/auth/register", &RegisterBody::from(form))
            .await?;
        let session = self.open_session(store, body).await?;

        if let Some(user) = session.user() {
            info!("Registered {} ({})", user.email, user.role);
        }
        Ok(session)
    }

    /// Persist the session carried by a token response
    async fn open_session(&self, store: &dyn KeyValueStore, body: serde_json::Value) -> Result<Session> {
        let login: LoginResponse = serde_json::from_value(unwrap_object(body))?;

        let user = if login.user.is_object() {
            decode_user(&login.user)
        } else {
            self.me(&Session::with_token(login.access_token.clone()))
                .await?
        };

        Session::establish(store, login.access_token, user).await
    }

    /// The user behind the session's token
    pub async fn me(&self, session: &Session) -> Result<User> {
        if !session.is_authenticated() {
            return Err(ApiError::NotPermitted("login required".to_string()));
        }
        let body = self.get_json(session, "/auth/me").await?;
        Ok(decode_user(&unwrap_object(body)))
    }

    /// End the session locally; the server-side logout is best effort
    pub async fn logout(&self, session: &Session, store: &dyn KeyValueStore) -> Result<Session> {
        if session.is_authenticated() {
            if let Err(e) = self.post_json(session, "/auth/logout", &json!({})).await {
                warn!("Server logout failed, clearing local session anyway: {}", e);
            }
        }
        Session::clear(store).await
    }
}

fn validate_registration(form: &Registration) -> Result<()> {
    if form.name.trim().chars().count() < 2 {
        return Err(ApiError::Validation("name must have at least 2 characters".to_string()));
    }
    if form.last_name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "last name must have at least 2 characters".to_string(),
        ));
    }
    if !looks_like_email(form.email.trim()) {
        return Err(ApiError::Validation(format!("invalid email: {}", form.email.trim())));
    }
    if form.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "password must have at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
