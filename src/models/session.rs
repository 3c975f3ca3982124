//! Credentials and the authenticated session.

/// Environment variable holding the login name
pub const USERNAME_ENV: &str = "SPLUNK_USERNAME";
/// Environment variable holding the password
pub const PASSWORD_ENV: &str = "SPLUNK_PASSWORD";

/// Login credentials exchanged for a session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read credentials from `SPLUNK_USERNAME` and `SPLUNK_PASSWORD`
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(USERNAME_ENV).ok()?;
        let password = std::env::var(PASSWORD_ENV).ok()?;
        Some(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server address plus the token obtained from the login exchange.
///
/// The session is authenticated iff the token is non-empty. Tokens are never
/// refreshed locally; expiry is the server's concern.
#[derive(Clone, Default)]
pub struct Session {
    server: String,
    token: String,
}

impl Session {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: String::new(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub(crate) fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Value of the `Authorization` header for this session
    pub fn authorization(&self) -> String {
        format!("Splunk {}", self.token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.server)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
