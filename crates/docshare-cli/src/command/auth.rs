//! `login`, `register`, `logout` and `whoami`.

use anyhow::Context;
use docshare_client::ApiClient;
use docshare_core::types::{Credentials, Registration};

use super::prompt::secret_or_prompt;
use super::{RegisterArgs, output};
use crate::TRACING_TARGET_COMMAND;

pub async fn login(
    client: &ApiClient,
    username: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = secret_or_prompt(password, "Password")?;
    let identity = client
        .login(&Credentials::new(username, password))
        .await
        .context("login failed")?;

    println!(
        "Logged in as {} ({})",
        identity.username,
        identity.role_label()
    );
    Ok(())
}

pub async fn register(client: &ApiClient, args: RegisterArgs) -> anyhow::Result<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    let confirm = secret_or_prompt(args.confirm_password, "Confirm password")?;

    let registration = Registration {
        username: args.username,
        email: args.email,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
    };

    client
        .register(&registration, &confirm)
        .await
        .context("registration failed")?;

    println!(
        "Account '{}' created. You can now log in.",
        registration.username
    );
    Ok(())
}

pub async fn logout(client: &ApiClient) -> anyhow::Result<()> {
    let was_logged_in = client.session().is_authenticated().await;
    client.logout().await;

    tracing::debug!(target: TRACING_TARGET_COMMAND, was_logged_in, "Logged out");
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(client: &ApiClient) -> anyhow::Result<()> {
    match client.session().identity().await {
        Some(identity) => print!("{}", output::identity(&identity)),
        None => println!("Not logged in."),
    }
    Ok(())
}
