//! users, add-user and drop-user commands
//!
//! # Example
//!
//! ```bash
//! git-all add-user alice
//! git-all users
//! git-all drop-user _
//! ```

use std::io;

use anyhow::{bail, Result};

use super::{list_or_all, open_store, save};
use crate::cli::Context;
use crate::directory::bitbucket::encode_credential;
use crate::store::Store;
use crate::ui::{output, prompts};

/// List stored users, marking the default.
pub fn users(ctx: &Context) -> Result<()> {
    let store = open_store(ctx);
    let default = store.default_user();

    for user in store.users() {
        println!(
            "{}",
            output::format_user(&user, default.as_deref() == Some(user.as_str()))
        );
    }
    Ok(())
}

/// Store credentials for a user.
///
/// The first user stored becomes the default.
pub fn add_user(ctx: &Context, user: Option<&str>, password_stdin: bool) -> Result<()> {
    let user = match user {
        Some(user) => user.to_string(),
        None => prompts::input("Username: ", ctx.interactive)?,
    };
    let user = user.trim();
    if user.is_empty() || user.contains(':') {
        bail!("invalid user name '{}'", user);
    }

    let password = if password_stdin {
        prompts::read_line(&mut io::stdin().lock())?
    } else {
        prompts::password("Password: ", ctx.interactive)?
    };

    let mut store = open_store(ctx);
    store.set_credentials(user, &encode_credential(user, &password));
    if store.default_user().is_none() {
        store.set_default_user(Some(user));
    }
    save(&mut store)?;

    output::print(format!("Stored credentials for {}", user), ctx.verbosity);
    Ok(())
}

/// Remove stored credentials.
///
/// `users` is a comma list, `_` for everyone; `None` means the default user.
pub fn drop_user(ctx: &Context, users: Option<&str>) -> Result<()> {
    let mut store = open_store(ctx);

    let targets = match users {
        Some(spec) => list_or_all(spec, || store.users()),
        None => match store.default_user() {
            Some(user) => vec![user],
            None => bail!("no user given and no default user set"),
        },
    };

    for user in &targets {
        if store.credentials(user).is_some() {
            store.remove_credentials(user);
        } else {
            output::warn(format!("no such user: {}", user), ctx.verbosity);
        }
    }

    save(&mut store)
}
