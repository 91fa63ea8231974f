use crate::{
    Res,
    config::{self, GoogleEndpoints, OAuthConfig},
    google::auth::Authorizer,
    management::TokenStore,
    success,
    types::Token,
};

use super::Context;

/// Builds an authorizer from the operator's files and obtains a token.
pub async fn access_token(ctx: &Context) -> Res<Token> {
    let credentials = OAuthConfig::load(&ctx.oauth_config).await?;
    let authorizer = Authorizer::new(
        credentials,
        GoogleEndpoints::from_env(),
        TokenStore::new(&ctx.token),
        config::callback_addr()?,
        config::callback_timeout(),
    );
    authorizer.get_access_token().await
}

pub async fn auth(ctx: &Context) -> Res<()> {
    let token = access_token(ctx).await?;
    match token.expires_at() {
        Some(at) => success!(
            "Authorization successful, access token valid until {}",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => success!("Authorization successful"),
    }
    Ok(())
}
