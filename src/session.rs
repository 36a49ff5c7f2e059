//! Process-wide session state: who is signed in, with which token, and the
//! display preferences. Populated by [`Session::initialize`] on cold start or
//! [`Session::sign_in`] on login, cleared by [`Session::teardown`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::User;
use crate::storage::{keys, KeyValueStore};

/// Default accent colour, used until the user picks one.
pub const DEFAULT_ACCENT: &str = "#4F46E5";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreferences {
    pub mode: ThemeMode,
    pub accent_color: String,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            mode: ThemeMode::default(),
            accent_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    theme: ThemePreferences,
}

/// Explicit application context handed to every screen by reference.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Rehydrate token, user and theme from persistent storage.
    /// A stored user that no longer parses is dropped with a warning.
    pub async fn initialize(&self) -> Result<()> {
        let token = self.store.get(keys::TOKEN).await?;
        let user = match self.store.get(keys::USER).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable cached user: {e}");
                    None
                }
            },
            None => None,
        };
        let mode = self
            .store
            .get(keys::THEME_MODE)
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let accent_color = self
            .store
            .get(keys::ACCENT_COLOR)
            .await?
            .unwrap_or_else(|| DEFAULT_ACCENT.to_string());

        info!(
            "Session initialised ({})",
            if token.is_some() { "signed in" } else { "signed out" }
        );
        let mut state = self.write();
        state.token = token;
        state.user = user;
        state.theme = ThemePreferences { mode, accent_color };
        Ok(())
    }

    /// Sign out: clear memory and the persisted session keys. Theme
    /// preferences outlive the session.
    pub async fn teardown(&self) -> Result<()> {
        {
            let mut state = self.write();
            state.token = None;
            state.user = None;
        }
        for key in [
            keys::TOKEN,
            keys::USER,
            keys::PROFILE_COMPLETED,
            keys::SECRET_CODE_VERIFIED,
        ] {
            self.store.remove(key).await?;
        }
        info!("Session torn down");
        Ok(())
    }

    /// Record a successful login. Token and user are persisted as two
    /// separate writes.
    pub async fn sign_in(&self, token: String, user: User) -> Result<()> {
        let raw_user = serde_json::to_string(&user)?;
        let profile_complete = user.profile_complete();
        {
            let mut state = self.write();
            state.token = Some(token.clone());
            state.user = Some(user);
        }
        self.store.set(keys::TOKEN, &token).await?;
        self.store.set(keys::USER, &raw_user).await?;
        self.store
            .set_flag(keys::PROFILE_COMPLETED, profile_complete)
            .await?;
        Ok(())
    }

    /// Replace the cached user after a profile edit or a fresh `/auth/me`.
    pub async fn update_user(&self, user: User) -> Result<()> {
        let raw_user = serde_json::to_string(&user)?;
        let profile_complete = user.profile_complete();
        self.write().user = Some(user);
        self.store.set(keys::USER, &raw_user).await?;
        self.store
            .set_flag(keys::PROFILE_COMPLETED, profile_complete)
            .await
    }

    /// The token to send with requests: memory first, then the store.
    /// Storage failures are logged and treated as "no token".
    pub async fn bearer_token(&self) -> Option<String> {
        if let Some(token) = self.read().token.clone() {
            return Some(token);
        }
        match self.store.get(keys::TOKEN).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read stored token: {e}");
                None
            }
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn theme(&self) -> ThemePreferences {
        self.read().theme.clone()
    }

    /// Change the theme mode. Persisting it is best-effort.
    pub async fn set_theme_mode(&self, mode: ThemeMode) {
        self.write().theme.mode = mode;
        if let Err(e) = self.store.set(keys::THEME_MODE, &mode.to_string()).await {
            error!("Failed to persist theme mode: {e}");
        }
    }

    /// Change the accent colour. Persisting it is best-effort.
    pub async fn set_accent_color(&self, color: &str) {
        self.write().theme.accent_color = color.to_string();
        if let Err(e) = self.store.set(keys::ACCENT_COLOR, color).await {
            error!("Failed to persist accent colour: {e}");
        }
    }

    pub async fn profile_completed(&self) -> Result<bool> {
        self.store.get_flag(keys::PROFILE_COMPLETED).await
    }

    pub async fn set_profile_completed(&self, value: bool) -> Result<()> {
        self.store.set_flag(keys::PROFILE_COMPLETED, value).await
    }

    pub async fn secret_code_verified(&self) -> Result<bool> {
        self.store.get_flag(keys::SECRET_CODE_VERIFIED).await
    }

    pub async fn set_secret_code_verified(&self, value: bool) -> Result<()> {
        self.store.set_flag(keys::SECRET_CODE_VERIFIED, value).await
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
