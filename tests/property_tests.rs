//! Property-based tests for the store and the resolver.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::path::PathBuf;

use proptest::prelude::*;

use git_all::core::types::RepoId;
use git_all::directory::mock::MockDirectory;
use git_all::resolve::Resolver;
use git_all::store::{State, Store};

/// Strategy for generating valid repository identifiers.
fn repo_id() -> impl Strategy<Value = RepoId> {
    "[a-z]{1,6}/[a-z0-9][a-z0-9-]{0,8}".prop_map(|s| RepoId::new(s).unwrap())
}

fn repo_set() -> impl Strategy<Value = Vec<RepoId>> {
    prop::collection::vec(repo_id(), 0..12)
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Operations on users, for the default-user invariant.
#[derive(Debug, Clone)]
enum UserOp {
    Add(String),
    Remove(String),
    SetDefault(Option<String>),
}

fn user_op() -> impl Strategy<Value = UserOp> {
    let name = prop::sample::select(vec!["alice", "bob", "carol"]).prop_map(String::from);
    prop_oneof![
        name.clone().prop_map(UserOp::Add),
        name.clone().prop_map(UserOp::Remove),
        prop::option::of(name).prop_map(UserOp::SetDefault),
    ]
}

proptest! {
    #[test]
    fn group_additions_union(s1 in repo_set(), s2 in repo_set()) {
        let mut state = State::new();
        state.add_to_group("g", &s1);
        state.add_to_group("g", &s2);

        let expected: BTreeSet<RepoId> = s1.iter().chain(s2.iter()).cloned().collect();
        prop_assert_eq!(state.group("g"), expected.clone());

        // Re-adding is idempotent.
        state.add_to_group("g", &s2);
        prop_assert_eq!(state.group("g"), expected);
    }

    #[test]
    fn default_user_never_dangles(ops in prop::collection::vec(user_op(), 0..30)) {
        let mut state = State::new();
        for op in ops {
            match op {
                UserOp::Add(user) => state.set_credentials(&user, "c2VjcmV0"),
                UserOp::Remove(user) => state.remove_credentials(&user),
                UserOp::SetDefault(user) => state.set_default_user(user.as_deref()),
            }
            if let Some(default) = state.default_user() {
                prop_assert!(state.users().contains(&default));
            }
        }
    }

    #[test]
    fn bindings_and_locations_stay_inverse(
        bindings in prop::collection::vec((repo_id(), 0usize..3), 0..20)
    ) {
        let parents = [PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")];
        let mut state = State::new();
        for (repo, parent) in &bindings {
            state.record_binding(repo, &parents[*parent]);
        }

        prop_assert!(state.is_consistent());
        for (repo, _) in &bindings {
            let parent = state.repo_path(repo).unwrap();
            prop_assert!(state.repos_at(&parent).contains(repo));
        }
    }

    #[test]
    fn resolution_is_deduplicated(repos in repo_set()) {
        prop_assume!(!repos.is_empty());
        let state = State::new();
        let directory = MockDirectory::new();

        // Every repository twice.
        let expression = repos
            .iter()
            .chain(repos.iter())
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let resolution = block_on(Resolver::new(&state, &directory).resolve(&expression, None));

        let unique: HashSet<_> = resolution.repos.iter().collect();
        prop_assert_eq!(unique.len(), resolution.repos.len());

        let expected: HashSet<_> = repos.iter().collect();
        prop_assert_eq!(unique, expected);

        // First occurrence order.
        let mut seen = HashSet::new();
        let first: Vec<_> = repos.iter().filter(|r| seen.insert(*r)).collect();
        let resolved: Vec<_> = resolution.repos.iter().collect();
        prop_assert_eq!(resolved, first);
    }

    #[test]
    fn double_dash_is_default_group(default in repo_set(), other in repo_set()) {
        let mut state = State::new();
        state.add_to_group("default", &default);
        state.add_to_group("other", &other);
        let directory = MockDirectory::new();
        let resolver = Resolver::new(&state, &directory);

        let dashes = block_on(resolver.resolve("--", None));
        let named = block_on(resolver.resolve("/default", None));
        prop_assert_eq!(dashes.repos, named.repos);
    }
}
