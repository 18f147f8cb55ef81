use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::User;
use crate::store::KeyValueStore;
use crate::wire::decode_user;

/// Keys a bearer token may have been saved under, in lookup order
const TOKEN_KEYS: [&str; 4] = ["token", "accessToken", "jwt", "access_token"];
const USER_KEY: &str = "user";

/// Authentication context passed explicitly to every request.
///
/// Created by [`Session::hydrate`] at start-up, replaced by
/// [`Session::establish`] on login and reset by [`Session::clear`] on logout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// A session with no credentials; requests go out without Authorization
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    /// Load the persisted token and user, if any
    pub async fn hydrate(store: &dyn KeyValueStore) -> Result<Self> {
        let mut token = None;
        for key in TOKEN_KEYS {
            if let Some(value) = store.get(key).await? {
                if !value.trim().is_empty() {
                    debug!("Session token found under '{}'", key);
                    token = Some(value.trim().to_string());
                    break;
                }
            }
        }

        let user = match store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(decode_user(&value)),
                Err(e) => {
                    warn!("Ignoring unreadable stored user: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self { token, user })
    }

    /// Persist a fresh login and return the matching session
    pub async fn establish(store: &dyn KeyValueStore, token: String, user: User) -> Result<Self> {
        store.put(TOKEN_KEYS[0], &token).await?;
        store.put(USER_KEY, &serde_json::to_string(&user)?).await?;
        Ok(Self {
            token: Some(token),
            user: Some(user),
        })
    }

    /// Forget every persisted credential
    pub async fn clear(store: &dyn KeyValueStore) -> Result<Self> {
        for key in TOKEN_KEYS {
            store.delete(key).await?;
        }
        store.delete(USER_KEY).await?;
        Ok(Self::anonymous())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin_like(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin_like)
    }
}
