use clap::Subcommand;
use timepilot_core::api::RegisterRequest;

use super::{block_on, connect, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in and store tokens in the OS keyring
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Remove stored tokens
    Logout,
    /// Check authentication status
    Status,
    /// Exchange the refresh token for a new token pair
    Refresh,
    /// Create an account (request a code with `send-code` first)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Verification code received by email
        #[arg(long)]
        code: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Email a verification code
    SendCode {
        #[arg(long)]
        email: String,
    },
}

pub fn run(action: AuthAction) -> CliResult {
    let client = connect()?;
    match action {
        AuthAction::Login { username, password } => {
            let resp = block_on(client.login(&username, &password))??;
            if resp.message.is_empty() {
                println!("logged in as {username}");
            } else {
                println!("{}", resp.message);
            }
        }
        AuthAction::Logout => {
            client.logout()?;
            println!("logged out");
        }
        AuthAction::Status => {
            let state = if client.is_logged_in()? {
                "authenticated"
            } else {
                "not authenticated"
            };
            println!("{state}");
            println!("server: {}", client.base_url());
            println!("device: {}", client.device_id());
        }
        AuthAction::Refresh => {
            block_on(client.refresh_tokens())??;
            println!("tokens refreshed");
        }
        AuthAction::Register {
            username,
            email,
            code,
            password,
            confirm_password,
        } => {
            let form =
                RegisterRequest::new(&username, &email, &code, &password, &confirm_password)?;
            let message = block_on(client.register(&form))??;
            println!("{}", if message.is_empty() { "registered" } else { message.as_str() });
        }
        AuthAction::SendCode { email } => {
            let message = block_on(client.send_email_code(&email))??;
            println!("{}", if message.is_empty() { "code sent" } else { message.as_str() });
        }
    }
    Ok(())
}
