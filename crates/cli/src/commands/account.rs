//! Account commands: register, login, logout, whoami.

use clap::Subcommand;

use ecom_market_core::Email;
use ecom_market_storefront::api::types::RegisterRequest;
use ecom_market_storefront::session::{AuthState, StoreSession};

use super::CliError;

/// Account subcommands.
#[derive(Subcommand)]
pub enum AccountAction {
    /// Register a new account
    Register {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// First name
        #[arg(long)]
        first_name: String,
        /// Contact phone (+7XXXXXXXXXX)
        #[arg(long)]
        phone: String,
    },
    /// Log in (guest favorites migrate to the account)
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Log out and clear local state
    Logout,
    /// Show the signed-in user
    Whoami,
}

/// Run an account subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails or an argument is invalid.
pub async fn run(session: &StoreSession, action: AccountAction) -> Result<(), CliError> {
    match action {
        AccountAction::Register {
            email,
            password,
            first_name,
            phone,
        } => {
            let user = session
                .register(&RegisterRequest {
                    email: Email::parse(&email)?,
                    password,
                    first_name,
                    phone,
                })
                .await?;
            print_line(&format!("зарегистрирован: {}", user.email));
        }
        AccountAction::Login { email, password } => {
            let user = session.login(&Email::parse(&email)?, &password).await?;
            print_line(&format!("вход выполнен: {}", user.email));
            let favorites = session.favorites();
            if favorites.count() > 0 {
                print_line(&format!("в избранном: {}", favorites.count()));
            }
        }
        AccountAction::Logout => {
            session.logout().await?;
            print_line("выход выполнен");
        }
        AccountAction::Whoami => match session.auth() {
            AuthState::Authenticated(user) => {
                print_line(&format!("{} <{}>", user.first_name, user.email));
            }
            _ => print_line("(не авторизован)"),
        },
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
