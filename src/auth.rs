// ABOUTME: Token discovery with precedence chain
// ABOUTME: CLI flag → CLICKUP_API_TOKEN env var

use crate::{Error, Result};
use std::env;

pub const TOKEN_ENV: &str = "CLICKUP_API_TOKEN";

pub fn resolve_token(cli_token: Option<String>) -> Result<String> {
    resolve_from(cli_token, env::var(TOKEN_ENV).ok())
}

fn resolve_from(cli_token: Option<String>, env_token: Option<String>) -> Result<String> {
    cli_token
        .into_iter()
        .chain(env_token)
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .ok_or_else(|| {
            Error::Auth(format!(
                "No API token found. Provide one via --token or the {} env var",
                TOKEN_ENV
            ))
        })
}
