//! groups, add-repo, list-group and drop-group commands

use anyhow::Result;

use super::{group_names, open_store, resolve, runtime, save};
use crate::cli::Context;
use crate::store::Store;
use crate::ui::output;

/// List stored groups.
pub fn groups(ctx: &Context) -> Result<()> {
    for group in open_store(ctx).groups() {
        println!("{}", group);
    }
    Ok(())
}

/// Resolve `repos` and union them into each group in `groups`.
pub fn add_repo(ctx: &Context, repos: &str, groups: &str) -> Result<()> {
    let rt = runtime()?;
    let mut store = open_store(ctx);

    let repos = resolve(ctx, &rt, &store, repos);
    if repos.is_empty() {
        output::warn("no repositories to add", ctx.verbosity);
        return Ok(());
    }

    for group in group_names(groups, &store) {
        store.add_to_group(&group, &repos);
    }
    save(&mut store)
}

/// Print the members of each group.
pub fn list_group(ctx: &Context, groups: &str) -> Result<()> {
    let store = open_store(ctx);

    for group in group_names(groups, &store) {
        let members: Vec<_> = store.group(&group).into_iter().collect();
        if members.is_empty() {
            output::notice(format!("Group \"{}\" doesn't exist", group), ctx.verbosity);
            continue;
        }
        println!("{}", output::format_section(&group, &members));
    }
    Ok(())
}

/// Delete each group.
pub fn drop_group(ctx: &Context, groups: &str) -> Result<()> {
    let mut store = open_store(ctx);
    let existing = store.groups();

    for group in group_names(groups, &store) {
        if existing.contains(&group) {
            store.remove_group(&group);
        } else {
            output::notice(format!("Group \"{}\" doesn't exist", group), ctx.verbosity);
        }
    }
    save(&mut store)
}
