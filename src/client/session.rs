//! Session token acquisition.

use super::parse::unique_element_text;
use crate::config::EndpointConfig;
use crate::error::{Result, SearchError};
use crate::models::{Credentials, Session};
use crate::transport::{HttpRequest, Transport};

/// Exchange credentials for a session token and store it in `session`.
///
/// Posts `username` and `password` to the login endpoint without an
/// authorization header and reads the `sessionKey` element from the XML
/// response. On any failure the session is left as it was.
pub async fn acquire_token(
    transport: &dyn Transport,
    session: &mut Session,
    endpoints: &EndpointConfig,
    credentials: &Credentials,
) -> Result<String> {
    let url = endpoints.login_url(session.server());
    let request = HttpRequest::post(url).form(&[
        ("username", credentials.username()),
        ("password", credentials.password()),
    ]);

    tracing::debug!("Requesting session token for {}", credentials.username());

    let body = transport
        .request(request)
        .await
        .map_err(|e| SearchError::Authentication {
            message: "login request failed".to_string(),
            source: Some(e),
        })?;

    let token = unique_element_text(&body, "sessionKey").map_err(|e| {
        tracing::warn!("Unusable login response: {}", e);
        SearchError::authentication(e.to_string())
    })?;

    session.set_token(token.clone());
    tracing::info!("Authenticated to {} as {}", session.server(), credentials.username());

    Ok(token)
}
