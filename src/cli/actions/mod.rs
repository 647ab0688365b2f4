pub mod login;
pub mod logout;
pub mod pubkey;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Logout(logout::Args),
    Pubkey(pubkey::Args),
}

impl Action {
    /// Run the selected subcommand.
    ///
    /// # Errors
    /// Returns an error if the subcommand fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Login(args) => login::execute(args).await,
            Self::Logout(args) => logout::execute(args).await,
            Self::Pubkey(args) => pubkey::execute(&args),
        }
    }
}
