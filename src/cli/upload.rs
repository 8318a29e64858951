//! Upload command logic
//!
//! Drives one run of the tool: log in (falling back from cookie to password
//! once), upload every target, optionally log out, and turn the results into
//! an exit status.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::client::{Client, LoginOutcome};
use crate::transport::Transport;
use crate::types::{CategoryId, UploadReport, category_names};
use crate::{Error, Result as CoreResult};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Arguments for an upload run
#[derive(Debug, Clone, Default)]
pub struct UploadArgs {
    pub targets: Vec<PathBuf>,
    pub category: CategoryId,
    pub logout: bool,
}

/// Asks the user for the password of the given username. `None` when no
/// password can be obtained.
pub type PasswordPrompt<'a> = dyn FnMut(&str) -> Option<String> + 'a;

/// Run a full upload session against `client`.
///
/// Progress goes to `out`, problems to `err`. Returns the process exit
/// status.
pub fn run_upload<T: Transport>(
    client: &mut Client<T>,
    args: &UploadArgs,
    prompt: &mut PasswordPrompt<'_>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    if args.targets.is_empty() && args.logout {
        debug!("nothing to upload, ending any stored session");
        return match client.logout() {
            Ok(()) => Ok(EXIT_SUCCESS),
            Err(e) => {
                writeln!(err, "error: failed to log out: {}", e)?;
                Ok(EXIT_FAILURE)
            }
        };
    }

    let outcome = match login_with_fallback(client, prompt, err)? {
        Ok(outcome) => outcome,
        Err(e) => {
            writeln!(err, "error: {}", login_error_message(&e))?;
            return Ok(EXIT_FAILURE);
        }
    };

    if let Some(e) = &outcome.persist_error {
        writeln!(err, "warning: failed to save login cookie: {}", e)?;
    }

    let report = client.upload_all(&args.targets, args.category);
    print_report(&report, out, err)?;

    let mut status = if report.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    };

    if args.logout
        && let Err(e) = client.logout()
    {
        writeln!(err, "error: failed to log out: {}", e)?;
        status = EXIT_FAILURE;
    }

    Ok(status)
}

/// Log in from the stored cookie, and on [`Error::NoKey`] or
/// [`Error::KeyExpired`] retry exactly once with the password.
///
/// The outer `Result` is for failures writing to `err`; the inner one is the
/// login result.
pub fn login_with_fallback<T: Transport>(
    client: &mut Client<T>,
    prompt: &mut PasswordPrompt<'_>,
    err: &mut impl Write,
) -> std::io::Result<CoreResult<LoginOutcome>> {
    let first = attempt_login(client, false, prompt);
    match first {
        Err(e) if e.is_retryable_login() => {
            if matches!(e, Error::KeyExpired) {
                writeln!(
                    err,
                    "warning: Your cookie has expired -- using password login"
                )?;
            }
            debug!("cookie login failed ({}), retrying with password", e);
            Ok(attempt_login(client, true, prompt))
        }
        other => Ok(other),
    }
}

fn attempt_login<T: Transport>(
    client: &mut Client<T>,
    force_password: bool,
    prompt: &mut PasswordPrompt<'_>,
) -> CoreResult<LoginOutcome> {
    if client.will_use_password(force_password)
        && !client.has_password()
        && let Some(username) = client.username().map(str::to_string)
        && let Some(password) = prompt(&username)
    {
        client.set_password(password);
    }
    client.login(force_password)
}

/// One-line description of a login failure
pub fn login_error_message(error: &Error) -> String {
    match error {
        Error::InsufficientCredentials
        | Error::BadCredentials { .. }
        | Error::KeyExpired
        | Error::KeyRejected => error.to_string(),
        other => format!("failed to login to AUR: {}", other),
    }
}

fn print_report(report: &UploadReport, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    for outcome in report.outcomes() {
        match outcome.message() {
            None => writeln!(out, "success: uploaded {}", outcome.path.display())?,
            Some(message) => writeln!(
                err,
                "failed to upload {}: {}",
                outcome.path.display(),
                message
            )?,
        }
    }
    Ok(())
}

/// Write the list of valid category names
pub fn write_categories(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Valid categories:")?;
    for name in category_names() {
        writeln!(out, "\t{}", name)?;
    }
    Ok(())
}
