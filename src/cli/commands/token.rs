use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, validate_user_credentials, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, default_value = "demo", help = "User name to put in the token")]
    pub user_name: String,

    #[arg(long, help = "City claim (defaults to SECURITY_DEMO_CITY)")]
    pub city: Option<String>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let city = args.city.as_deref().unwrap_or(&security.demo_city);

    let user = validate_user_credentials(Some(&args.user_name), Some("cli"), city)?;
    let token = generate_jwt(&Claims::new(&user, security), security)?;

    output_success(
        &output_format,
        &format!("Token issued for {} in {}", user.user_name, user.city),
        Some(json!({ "token": token, "city": user.city })),
    )
}
