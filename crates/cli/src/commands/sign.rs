//! Offline signing command.
//!
//! Prints the `X-PS-LSR-SIGNATURE` value the server would send for a body,
//! for checking a rate service's verification.
//!
//! # Usage
//!
//! ```bash
//! lsr-cli sign --secret <secret> --file request.json
//! echo -n '{"packages":[]}' | lsr-cli sign --secret <secret>
//! ```

use std::io::Read;
use std::path::Path;

use live_rates_server::rates::signer;
use secrecy::SecretString;

use super::CliError;

/// Sign the file at `path`, or stdin when no path is given.
///
/// The bytes are signed exactly as read.
///
/// # Errors
///
/// Returns `CliError` if the input cannot be read or signed.
pub fn run(secret: &str, path: Option<&Path>) -> Result<(), CliError> {
    let body = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let signature = signer::sign(&body, &SecretString::from(secret))
        .map_err(|e| CliError::Signing(e.to_string()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{signature}");
    }

    Ok(())
}
