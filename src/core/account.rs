//! Session and account registrar: login, logout and "remember me".

use regex::Regex;
use serde_json::Value;

use super::client::ContentClient;
use super::present::Presenter;
use crate::config::keys;
use crate::core::error::ContentError;
use crate::models::{ModeOptions, NavOptions, VisitFailure, VisitOutcome};
use crate::utils::{
    SettingsStore, Transport, error_alert_message, error_detail_message, is_absolute, origin,
};

/// Login replies name either another login URL or the storage location.
const LOGIN_REPLY_PATTERN: &str = r"(?m)^(login|location):([^\r\n]+)\r?$";

/// Parsed reply of the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginReply {
    /// Retry the login at this URL (absolute or host-relative)
    Login(String),
    /// Logged in; the account's storage web location
    Location(String),
}

impl LoginReply {
    /// Parse the first `login:` or `location:` line of `body`.
    pub fn parse(body: &str) -> Result<Option<Self>, ContentError> {
        let pattern = Regex::new(LOGIN_REPLY_PATTERN)
            .map_err(|e| ContentError::Configuration(e.to_string()))?;
        Ok(pattern.captures(body).map(|caps| {
            let value = caps[2].trim().to_string();
            match &caps[1] {
                "login" => Self::Login(value),
                _ => Self::Location(value),
            }
        }))
    }
}

impl<T, S, P> ContentClient<T, S, P>
where
    T: Transport,
    S: SettingsStore,
    P: Presenter,
{
    // =========================================================================
    // Account Registration
    // =========================================================================

    /// Register the storage account, returning the dashboard URL.
    pub fn set_storage_account(
        &mut self,
        username: &str,
        host: &str,
        storage_web_url: &str,
    ) -> Result<String, ContentError> {
        // Free the previous account here so its pages reach the presenter.
        if self.tree.would_replace_account(username, host, storage_web_url) {
            self.clear_storage_account();
        }
        let dashboard_url = self
            .tree
            .register_storage_account(username, host, storage_web_url)?;
        if self.remember_me() {
            self.persist_credentials()?;
        }
        Ok(dashboard_url)
    }

    /// Free the account's subtrees and blank the account fields.
    pub fn clear_storage_account(&mut self) {
        let released = self.tree.clear_account();
        self.release_all(released);
    }

    /// Register a public share room and navigate to it.
    pub fn visit_public_share_room(
        &mut self,
        share_id: &str,
        password: &str,
    ) -> Result<String, ContentError> {
        let url = self.tree.add_public_share_room(share_id, password)?;
        self.presenter.navigate_to(&url);
        Ok(url)
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Log in to the storage service and navigate to the dashboard.
    ///
    /// Follows at most `max_login_redirects` `login:` replies.
    pub async fn storage_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<String, ContentError> {
        let mut host = self.tree.deployment().starting_host_url.clone();
        let mut login_url = self.tree.deployment().login_url();
        let max_hops = self.tree.deployment().max_login_redirects;
        let mut hops = 0;

        loop {
            log::debug!("storage login via {login_url}");
            let body = match self
                .transport
                .post_form(&login_url, &[("username", username), ("password", password)])
                .await
            {
                Ok(body) => body,
                Err(err) => {
                    log::warn!("storage login failed: {err}");
                    let failure = VisitFailure::from(&err);
                    self.presenter
                        .alert(&error_alert_message("Storage login", failure.status));
                    return Err(ContentError::from_failure(&login_url, &failure));
                }
            };

            match LoginReply::parse(&body)? {
                None => {
                    self.presenter.alert(&error_detail_message(
                        "Temporary server failure",
                        "Please try again later.",
                    ));
                    return Err(ContentError::MalformedServerResponse(
                        body.trim().to_string(),
                    ));
                }
                Some(LoginReply::Login(target)) => {
                    hops += 1;
                    if hops > max_hops {
                        let err = ContentError::LoginRedirectLimit(max_hops);
                        self.presenter
                            .alert(&error_detail_message("Storage login", &err.to_string()));
                        return Err(err);
                    }
                    if target.starts_with('/') {
                        login_url = format!("{host}{target}");
                    } else {
                        if is_absolute(&target)
                            && let Some(target_host) = origin(&target)
                        {
                            host = target_host.to_string();
                        }
                        login_url = target;
                    }
                }
                Some(LoginReply::Location(location)) => {
                    let dashboard_url = self.set_storage_account(username, &host, &location)?;
                    log::info!("storage login succeeded for {username}");
                    self.presenter.navigate_to(&dashboard_url);
                    return Ok(dashboard_url);
                }
            }
        }
    }

    /// End the storage session and return to the dashboard.
    ///
    /// The remote logout is best-effort. `forget_host` drops the persisted
    /// storage host, so a remembered username no longer logs in silently.
    pub async fn logout(&mut self, forget_host: bool) -> Result<(), ContentError> {
        if let Some(root) = self.tree.session().storage_root_url() {
            let logout_url = format!("{root}{}", self.tree.deployment().logout_suffix);
            if let Err(err) = self.transport.get_text(&logout_url).await {
                log::warn!("remote logout failed, continuing: {err}");
            }
        }
        self.clear_storage_account();
        if forget_host {
            self.store.remove(keys::STORAGE_HOST)?;
        }
        let dashboard_url = self.tree.dashboard_url().to_string();
        self.presenter.navigate_to(&dashboard_url);
        Ok(())
    }

    // =========================================================================
    // Remember Me
    // =========================================================================

    pub fn remember_me(&self) -> bool {
        self.store.get_flag(keys::REMEMBER_ME)
    }

    /// Persist the flag; turning it off forgets persisted credentials.
    pub fn set_remember_me(&mut self, remember: bool) -> Result<(), ContentError> {
        self.store.set(keys::REMEMBER_ME, &Value::Bool(remember))?;
        if remember {
            if self.tree.session().has_login_identity() {
                self.persist_credentials()?;
            }
        } else {
            for key in [keys::USERNAME, keys::STORAGE_HOST, keys::STORAGE_WEB_URL] {
                self.store.remove(key)?;
            }
        }
        Ok(())
    }

    /// Save the account fields for [`Self::restore_remembered`].
    pub(crate) fn persist_credentials(&mut self) -> Result<(), ContentError> {
        let session = self.tree.session();
        let fields = [
            (keys::USERNAME, session.username.clone()),
            (keys::STORAGE_HOST, session.storage_host.clone()),
            (keys::STORAGE_WEB_URL, session.storage_web_url.clone()),
        ];
        for (key, value) in fields {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                self.store.set(key, &Value::String(value))?;
            }
        }
        Ok(())
    }

    /// Re-register a remembered account. Returns the dashboard URL if one
    /// was restored.
    pub fn restore_remembered(&mut self) -> Result<Option<String>, ContentError> {
        if !self.remember_me() {
            return Ok(None);
        }
        let (Some(username), Some(host), Some(web_url)) = (
            self.store.get_string(keys::USERNAME),
            self.store.get_string(keys::STORAGE_HOST),
            self.store.get_string(keys::STORAGE_WEB_URL),
        ) else {
            return Ok(None);
        };
        log::info!("restoring remembered account {username}");
        self.set_storage_account(&username, &host, &web_url).map(Some)
    }

    /// Restore any remembered account, then visit the dashboard.
    pub async fn start(&mut self, nav: &NavOptions) -> Result<VisitOutcome, ContentError> {
        self.restore_remembered()?;
        let dashboard_url = self.tree.dashboard_url().to_string();
        self.visit(&dashboard_url, nav, &ModeOptions::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            LoginReply::parse("location:/storage/ABCDEFG/\n").unwrap(),
            Some(LoginReply::Location("/storage/ABCDEFG/".into()))
        );
    }

    #[test]
    fn test_parse_login_on_later_line() {
        assert_eq!(
            LoginReply::parse("ok\r\nlogin:https://other.test/browse/login\r\n").unwrap(),
            Some(LoginReply::Login("https://other.test/browse/login".into()))
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(LoginReply::parse("<html>oops</html>").unwrap(), None);
        assert_eq!(LoginReply::parse("location:").unwrap(), None);
    }
}
