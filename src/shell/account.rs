use anyhow::{Result, anyhow, bail};

use crate::services::auth::validate::signup_errors;
use crate::services::auth::{AuthError, AuthUser, ProfileUpdate};

use super::Context;
use super::prompt::Prompt;

fn shown(err: AuthError) -> anyhow::Error {
    anyhow!(err.message().to_string())
}

fn print_user(user: &AuthUser) {
    println!("{} <{}>", user.name, user.email);
    println!("  id:      {}", user.id);
    println!("  method:  {}", user.method);
    if !user.created_at.is_empty() {
        println!("  created: {}", user.created_at);
    }
}

pub(crate) async fn login(ctx: &Context, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Prompt::new().require("Password: ").await?,
    };
    let user = ctx.auth.login(email, &password).await.map_err(shown)?;
    println!("Welcome back, {}.", user.name);
    Ok(())
}

pub(crate) async fn signup(ctx: &Context, name: &str, email: &str) -> Result<()> {
    let mut prompt = Prompt::new();
    let password = prompt.require("Password: ").await?;
    let confirm = prompt.require("Confirm password: ").await?;

    let errors = signup_errors(name, email, &password, &confirm);
    if !errors.is_empty() {
        for err in &errors {
            if let AuthError::Validation { field, message } = err {
                eprintln!("  {field}: {message}");
            }
        }
        bail!("Signup form has {} error(s)", errors.len());
    }

    let user = ctx
        .auth
        .signup(name, email, &password, &confirm)
        .await
        .map_err(shown)?;
    println!("Account created for {}.", user.email);
    Ok(())
}

pub(crate) async fn whoami(ctx: &Context) -> Result<()> {
    match ctx.auth.restore().await {
        Some(user) => print_user(&user),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub(crate) async fn profile(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
    change_password: bool,
) -> Result<()> {
    if ctx.auth.restore().await.is_none() {
        bail!("Not logged in. Run `ifa login` first.");
    }

    let mut patch = ProfileUpdate {
        name,
        email,
        ..ProfileUpdate::default()
    };
    let mut confirm = None;
    if change_password {
        let mut prompt = Prompt::new();
        patch.current_password = Some(prompt.require("Current password: ").await?);
        patch.new_password = Some(prompt.require("New password: ").await?);
        confirm = Some(prompt.require("Confirm new password: ").await?);
    }
    if patch == ProfileUpdate::default() {
        bail!("Nothing to update; pass --name, --email or --change-password");
    }

    let user = ctx
        .auth
        .update_profile(patch, confirm.as_deref())
        .await
        .map_err(shown)?;
    println!("Profile updated.");
    print_user(&user);
    Ok(())
}
