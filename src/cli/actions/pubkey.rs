use crate::login::LocalKeySigner;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub secret_key: SecretString,
}

/// Print the x-only public key the server must know as the admin key.
///
/// # Errors
/// Returns an error if the secret key is invalid.
pub fn execute(args: &Args) -> Result<()> {
    let signer = LocalKeySigner::from_hex(&args.secret_key)?;

    println!("{}", signer.pubkey());

    Ok(())
}
