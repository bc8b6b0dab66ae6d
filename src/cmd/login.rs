use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;
use singalong::api::user::LoginRequest;

use super::{AppContext, RunCommand};

/// Sign in to the karaoke service. The session is kept until `logout`.
#[derive(Args)]
pub struct LoginArgs {
    /// Email of the account.
    pub email: String,

    /// Password of the account. Read from stdin when omitted.
    #[arg(short, long)]
    pub password: Option<String>,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self, ctx: &AppContext) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            bail!("email cannot be empty");
        }
        let password = match self.password {
            Some(ref password) => password.clone(),
            None => read_password()?,
        };
        if password.is_empty() {
            bail!("password cannot be empty");
        }

        let req = LoginRequest {
            email: email.to_string(),
            password,
        };
        let resp = ctx.api.login(&req).await.context("login request")?;
        info!("Login accepted for '{}'", resp.user.email);

        let name = resp.user.display_name();
        ctx.auth
            .login(&resp.token, resp.user)
            .context("server answered with an unusable session")?;
        println!("Welcome, {name}!");
        Ok(())
    }
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
