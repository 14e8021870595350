//! Session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the authenticated user between a successful `/auth/self` fetch and
//! logout. Route guards and user-aware views read it or subscribe to it.
//!
//! ERROR HANDLING
//! ==============
//! `fetch_user` folds every failure into the logged-out state: a non-2xx
//! answer also redirects to `/`, and transport failures are swallowed after
//! the request helper has logged them. `logout` only changes state on
//! success; a transport failure is handed back to the caller.
//!
//! TRADE-OFFS
//! ==========
//! Calls are not serialized. Two overlapping `fetch_user` calls race and the
//! last one to complete wins.

use std::sync::Arc;

use tokio::sync::watch;

use crate::net::error::TransportError;
use crate::net::http::{ApiClient, RequestOptions};
use crate::net::types::SessionUser;
use crate::ui::{Navigator, Notifier, Toast};

pub const SELF_ENDPOINT: &str = "/auth/self";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
/// Where an unauthenticated self-fetch sends the user.
pub const ROOT_PATH: &str = "/";
pub const LOGOUT_SUCCESS_MESSAGE: &str = "Déconnexion réussie";

/// Owner of the current session user.
pub struct SessionStore {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    user: watch::Sender<Option<SessionUser>>,
}

impl SessionStore {
    /// A store with no user.
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        let (user, _) = watch::channel(None);
        Self { client, navigator, notifier, user }
    }

    /// Snapshot of the current user.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Receive every change to the current user.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.user.subscribe()
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Load the current user from `/auth/self`.
    pub async fn fetch_user(&self) {
        let response = match self.client.fetch(SELF_ENDPOINT, RequestOptions::new()).await {
            Ok(response) => response,
            Err(_) => {
                self.set_user(None);
                return;
            }
        };

        if !response.ok() {
            tracing::info!(status = response.status().as_u16(), "session fetch rejected; redirecting");
            self.navigator.navigate(ROOT_PATH);
            self.set_user(None);
            return;
        }

        match response.json::<SessionUser>() {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "session user loaded");
                self.set_user(Some(user));
            }
            Err(e) => {
                tracing::warn!(error = %e, "session user decode failed");
                self.set_user(None);
            }
        }
    }

    /// End the session via `/auth/logout`.
    ///
    /// On a 2xx answer the user is cleared and a success toast is shown. Any
    /// other status leaves the state untouched and shows nothing.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the request never got a response.
    pub async fn logout(&self) -> Result<(), TransportError> {
        let response = self.client.fetch(LOGOUT_ENDPOINT, RequestOptions::new()).await?;
        if response.ok() {
            self.set_user(None);
            self.notifier.notify(Toast::success(LOGOUT_SUCCESS_MESSAGE));
            tracing::debug!("session closed");
        } else {
            tracing::warn!(status = response.status().as_u16(), "logout rejected");
        }
        Ok(())
    }

    fn set_user(&self, user: Option<SessionUser>) {
        self.user.send_replace(user);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
