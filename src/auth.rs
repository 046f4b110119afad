use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use zeroize::Zeroizing;

pub const SECRET_ENV: &str = "CRYPTER_SECRET";

/// Resolves the engine secret.
///
/// Stdin is reserved for the payload, so the secret comes from the
/// environment, a file, or an interactive prompt, in that order.
pub fn read_secret(secret_file: Option<&Path>) -> Result<Zeroizing<Vec<u8>>> {
    //  Environment Variable
    //  CRYPTER_SECRET="supersecret" crypter encrypt -i notes.txt
    if let Ok(secret) = std::env::var(SECRET_ENV) {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret.into_bytes()));
        }
    }

    //  Secret file, trailing newline ignored
    if let Some(path) = secret_file {
        let mut secret = Zeroizing::new(
            fs::read(path)
                .with_context(|| format!("failed to read secret file {}", path.display()))?,
        );
        trim_newline(&mut secret);

        if secret.is_empty() {
            bail!("secret file {} is empty", path.display());
        }
        return Ok(secret);
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let secret = Zeroizing::new(rpassword::prompt_password("Secret: ")?);
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
        }
    }

    bail!("No secret provided")
}

fn trim_newline(buf: &mut Vec<u8>) {
    while buf.ends_with(b"\n") || buf.ends_with(b"\r") {
        buf.pop();
    }
}
