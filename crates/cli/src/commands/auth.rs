//! Session commands

use crate::context::{AppContext, ClientResultExt};
use ancla_core::{home_route, LoginCredentials};
use ancla_reports::detail_report;
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(password)
}

pub async fn login(ctx: &AppContext, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let credentials = LoginCredentials {
        email: email.trim().to_string(),
        password,
        remember_me: true,
    };

    let user = ctx.api.auth().login(&credentials).await.or_describe()?;
    println!(
        "✅ Signed in as {} ({}), home {}",
        user.email,
        user.role().label(),
        home_route(user.role())
    );
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    if !ctx.api.auth().bootstrap().await.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    ctx.api.auth().logout().await.or_describe()?;
    println!("✅ Signed out");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    ctx.require_session().await?;
    let Some(user) = ctx.api.session().user() else {
        bail!("Session has no user");
    };

    let mut fields = vec![
        ("Email", user.email.clone()),
        ("Name", user.full_name.clone()),
        ("Role", user.role().label().to_string()),
        ("Home", home_route(user.role()).to_string()),
        ("Verified", if user.is_verified { "yes" } else { "no" }.to_string()),
    ];
    for (resource, actions) in &user.role.permissions {
        fields.push(("Permission", format!("{}: {}", resource, actions.join(", "))));
    }
    ctx.print(&detail_report(format!("User {}", user.id), fields));
    Ok(())
}
