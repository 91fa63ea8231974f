use std::{net::SocketAddr, time::Duration};

use chrono::Utc;
use reqwest::Client;

use crate::{
    Error, Res,
    config::{self, GoogleEndpoints, OAuthConfig},
    info,
    management::TokenStore,
    server::CallbackServer,
    types::{Token, TokenResponse},
    utils, warning,
};

/// Obtains access tokens for the Photos Library API.
///
/// The authorizer owns the [`TokenStore`] for the whole authorization phase.
/// With a stored refresh token it performs a single token-endpoint exchange;
/// otherwise it walks the operator through the consent page and captures the
/// redirect on a local listener.
pub struct Authorizer {
    credentials: OAuthConfig,
    endpoints: GoogleEndpoints,
    store: TokenStore,
    http: Client,
    callback_addr: SocketAddr,
    callback_timeout: Duration,
    open_browser: bool,
}

impl Authorizer {
    pub fn new(
        credentials: OAuthConfig,
        endpoints: GoogleEndpoints,
        store: TokenStore,
        callback_addr: SocketAddr,
        callback_timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            endpoints,
            store,
            http: Client::new(),
            callback_addr,
            callback_timeout,
            open_browser: true,
        }
    }

    pub fn with_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    /// Returns a usable access token, taking the refresh path when possible.
    ///
    /// The expiry of the returned token is informational only; nothing
    /// refreshes it during a run.
    pub async fn get_access_token(&self) -> Res<Token> {
        let refresh_token = self.store.load_refresh_token().await?;
        if !refresh_token.is_empty() {
            info!("Using stored refresh token");
            return self.refresh(&refresh_token).await;
        }

        info!("New authorization required");
        let server = CallbackServer::bind(self.callback_addr).await?;
        self.authorize_via(server).await
    }

    /// Runs the consent flow against an already bound callback listener.
    pub async fn authorize_via(&self, server: CallbackServer) -> Res<Token> {
        let verifier = utils::generate_code_verifier();
        let challenge = utils::generate_code_challenge(&verifier);
        let redirect_uri = config::redirect_uri(server.local_addr().port());
        let auth_url = self.authorization_url(&redirect_uri, &challenge);

        // forget any code left over from an interrupted run
        self.store.save_oauth_code("").await?;

        info!("Authorize albumdav in your browser:\n{}", auth_url);
        if self.open_browser && webbrowser::open(&auth_url).is_err() {
            warning!("Failed to open browser. Please open the URL above manually.");
        }

        let code = server.wait_for_code(self.callback_timeout).await?;
        self.store.save_oauth_code(&code).await?;

        let token = self.exchange_code(&code, &verifier, &redirect_uri).await?;
        if token.refresh_token.is_empty() {
            return Err(Error::Auth(
                "token endpoint did not return a refresh token".to_string(),
            ));
        }
        self.store.save_refresh_token(&token.refresh_token).await?;

        Ok(token)
    }

    pub fn authorization_url(&self, redirect_uri: &str, code_challenge: &str) -> String {
        format!(
            "{auth_url}?response_type=code&scope={scope}&client_id={client_id}&redirect_uri={redirect_uri}&access_type=offline&prompt=consent&code_challenge={code_challenge}&code_challenge_method=S256",
            auth_url = self.endpoints.auth_url,
            scope = urlencoding::encode(config::PHOTOS_READONLY_SCOPE),
            client_id = urlencoding::encode(&self.credentials.client_id),
            redirect_uri = urlencoding::encode(redirect_uri),
            code_challenge = code_challenge,
        )
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// If Google rotates the refresh token, the new one is persisted.
    pub async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        let res = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .await?;

        let rotated = res
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty() && t != refresh_token);
        if let Some(new_token) = &rotated {
            self.store.save_refresh_token(new_token).await?;
        }

        Ok(into_token(res, refresh_token))
    }

    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Res<Token> {
        let res = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("code_verifier", verifier),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
            ])
            .await?;

        Ok(into_token(res, ""))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Res<TokenResponse> {
        let res = self
            .http
            .post(&self.endpoints.token_url)
            .form(params)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Api {
                endpoint: self.endpoints.token_url.clone(),
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }

        Ok(res.json::<TokenResponse>().await?)
    }
}

fn into_token(res: TokenResponse, fallback_refresh: &str) -> Token {
    Token {
        access_token: res.access_token,
        refresh_token: res
            .refresh_token
            .unwrap_or_else(|| fallback_refresh.to_string()),
        scope: res.scope.unwrap_or_default(),
        expires_in: res.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}
