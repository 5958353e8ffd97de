//! Username/password gate in front of the dashboard.
//!
//! This is a plain comparison against configured values and offers no
//! protection beyond keeping casual users out. Anything that needs real
//! access control must replace it with a proper credential or session
//! mechanism.

use std::env;

use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    users: Vec<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(users: Vec<String>, password: Option<String>) -> Self {
        Self { users, password }
    }

    /// Builds the gate from configuration, reading the password from the
    /// configured environment variable.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let password = match &config.password_env {
            Some(name) => {
                let password = env::var(name)
                    .map_err(|_| ToolError::MissingPasswordEnv { name: name.clone() })?;
                Some(password)
            }
            None => None,
        };
        Ok(Self::new(config.users.clone(), password))
    }

    /// Lets `user` in when the name is configured (ignoring case and
    /// surrounding whitespace) and, if a password is configured, `password`
    /// equals it. Returns the configured spelling of the name.
    pub fn authorize(&self, user: &str, password: Option<&str>) -> Result<String> {
        let wanted = user.trim().to_lowercase();
        let known = self
            .users
            .iter()
            .find(|candidate| candidate.trim().to_lowercase() == wanted);

        let password_ok = match &self.password {
            Some(expected) => password == Some(expected.as_str()),
            None => true,
        };

        match known {
            Some(name) if password_ok => {
                info!(user = %name, "dashboard access granted");
                Ok(name.trim().to_string())
            }
            _ => {
                warn!(user = %user.trim(), "dashboard access denied");
                Err(ToolError::AccessDenied {
                    user: user.trim().to_string(),
                })
            }
        }
    }
}
