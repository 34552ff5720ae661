// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{breadcrumbs, Breadcrumb, DirectoryNavigator, NavigatorPhase, PendingSelection};
use crate::api::{OperationKind, RequestError};
use crate::model::{DirectoryEntry, DirectoryListing, EntryKind};

fn dir(path: &str) -> DirectoryEntry {
    DirectoryEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_owned(),
        kind: EntryKind::Directory,
        path: path.to_owned(),
    }
}

fn file(path: &str) -> DirectoryEntry {
    DirectoryEntry { kind: EntryKind::File, ..dir(path) }
}

fn listing(path: &str, parent: Option<&str>, entries: Vec<DirectoryEntry>) -> DirectoryListing {
    DirectoryListing { path: path.to_owned(), parent: parent.map(str::to_owned), entries }
}

fn failure() -> RequestError {
    RequestError::Rejected {
        op: OperationKind::ListDirectory,
        template: "failed to list directory".to_owned(),
        status: 500,
    }
}

fn crumb(name: &str, path: &str) -> Breadcrumb {
    Breadcrumb { name: name.to_owned(), path: path.to_owned() }
}

/// Navigator opened for ingest and showing `/a/b`.
#[fixture]
fn at_a_b() -> DirectoryNavigator {
    let mut nav = DirectoryNavigator::new();
    let request = nav.open(PendingSelection::Ingest, "/a/b");
    assert!(nav.apply_listing(
        request.token,
        Ok(listing("/a/b", Some("/a"), vec![dir("/a/b/c"), file("/a/b/readme.md")])),
    ));
    nav
}

#[rstest]
#[case("/a/b/c", vec![crumb("ROOT", "/"), crumb("a", "/a"), crumb("b", "/a/b"), crumb("c", "/a/b/c")])]
#[case("/", vec![crumb("ROOT", "/")])]
#[case("docs/notes", vec![crumb("docs", "docs"), crumb("notes", "docs/notes")])]
#[case(r"C:\Users\k9", vec![crumb("C:", "C:"), crumb("Users", "C:/Users"), crumb("k9", "C:/Users/k9")])]
#[case("//srv//share/", vec![crumb("ROOT", "/"), crumb("srv", "/srv"), crumb("share", "/srv/share")])]
#[case("", vec![])]
fn breadcrumbs_rebuild_each_prefix(#[case] path: &str, #[case] expected: Vec<Breadcrumb>) {
    assert_eq!(breadcrumbs(path), expected);
}

#[test]
fn open_is_loading_until_the_first_listing_arrives() {
    let mut nav = DirectoryNavigator::new();
    assert_eq!(nav.phase(), NavigatorPhase::Closed);

    let request = nav.open(PendingSelection::CreateFolder, ".");
    assert_eq!(request.path, ".");
    assert_eq!(nav.phase(), NavigatorPhase::Loading);
    assert!(nav.state().is_none());

    nav.apply_listing(request.token, Ok(listing("/home/k9", Some("/home"), Vec::new())));
    assert_eq!(nav.phase(), NavigatorPhase::Ready);
    assert_eq!(nav.state().map(|state| state.current_path.as_str()), Some("/home/k9"));
}

#[rstest]
fn ascend_goes_to_the_reported_parent(mut at_a_b: DirectoryNavigator) {
    let request = at_a_b.ascend().expect("parent listing");
    assert_eq!(request.path, "/a");
    assert!(at_a_b.state().is_some_and(|state| state.loading));

    at_a_b.apply_listing(request.token, Ok(listing("/a", Some("/"), vec![dir("/a/b")])));
    let state = at_a_b.state().expect("state");
    assert_eq!(state.current_path, "/a");
    assert_eq!(state.parent_path.as_deref(), Some("/"));
    assert!(!state.loading);
}

#[test]
fn ascend_at_root_is_a_no_op() {
    let mut nav = DirectoryNavigator::new();
    let request = nav.open(PendingSelection::Ingest, "/");
    nav.apply_listing(request.token, Ok(listing("/", None, vec![dir("/a")])));

    let before = nav.state().cloned();
    let rev = nav.rev();
    assert_eq!(nav.ascend(), None);
    assert_eq!(nav.state().cloned(), before);
    assert_eq!(nav.rev(), rev);
    assert_eq!(nav.phase(), NavigatorPhase::Ready);
}

#[rstest]
fn descend_ignores_files(mut at_a_b: DirectoryNavigator) {
    assert_eq!(at_a_b.descend(&file("/a/b/readme.md")), None);
    assert!(!at_a_b.is_loading());

    let request = at_a_b.descend(&dir("/a/b/c")).expect("descend");
    assert_eq!(request.path, "/a/b/c");
}

#[rstest]
fn failed_fetch_keeps_the_previous_listing(mut at_a_b: DirectoryNavigator) {
    let before = at_a_b.state().cloned().expect("state");
    let request = at_a_b.descend(&dir("/a/b/c")).expect("descend");

    assert!(at_a_b.apply_listing(request.token, Err(failure())));

    assert_eq!(at_a_b.state().cloned(), Some(before));
    assert_eq!(at_a_b.phase(), NavigatorPhase::Ready);
}

#[test]
fn failed_first_fetch_stays_loading_without_state() {
    let mut nav = DirectoryNavigator::new();
    let request = nav.open(PendingSelection::Ingest, "/nope");
    assert!(nav.apply_listing(request.token, Err(failure())));

    assert!(nav.state().is_none());
    assert!(!nav.is_loading());
    assert_eq!(nav.phase(), NavigatorPhase::Loading);
    assert_eq!(nav.confirm(), None);
    assert!(nav.is_open());
}

#[rstest]
fn superseded_listing_is_dropped(mut at_a_b: DirectoryNavigator) {
    let slow = at_a_b.descend(&dir("/a/b/c")).expect("descend");
    let fast = at_a_b.ascend().expect("ascend");

    assert!(at_a_b.apply_listing(fast.token, Ok(listing("/a", Some("/"), Vec::new()))));
    assert!(!at_a_b.apply_listing(slow.token, Ok(listing("/a/b/c", Some("/a/b"), Vec::new()))));

    assert_eq!(at_a_b.state().map(|state| state.current_path.as_str()), Some("/a"));
}

#[rstest]
fn breadcrumb_jump_discards_deeper_segments(mut at_a_b: DirectoryNavigator) {
    let request = at_a_b.descend(&dir("/a/b/c")).expect("descend");
    at_a_b.apply_listing(request.token, Ok(listing("/a/b/c", Some("/a/b"), Vec::new())));

    let crumbs = at_a_b.crumbs();
    let b = crumbs.iter().find(|crumb| crumb.name == "b").expect("b crumb");
    let request = at_a_b.jump_to_breadcrumb(&b.path).expect("jump");
    assert_eq!(request.path, "/a/b");

    at_a_b.apply_listing(request.token, Ok(listing("/a/b", Some("/a"), vec![dir("/a/b/c")])));
    let names = at_a_b.crumbs().into_iter().map(|crumb| crumb.name).collect::<Vec<_>>();
    assert_eq!(names, vec!["ROOT", "a", "b"]);
}

#[rstest]
fn confirm_emits_the_current_path_once(mut at_a_b: DirectoryNavigator) {
    assert_eq!(at_a_b.confirm(), Some((PendingSelection::Ingest, "/a/b".to_owned())));
    assert_eq!(at_a_b.phase(), NavigatorPhase::Closed);
    assert_eq!(at_a_b.pending(), None);
    assert_eq!(at_a_b.confirm(), None);
}

#[rstest]
fn cancel_closes_without_emitting_and_drops_late_listings(mut at_a_b: DirectoryNavigator) {
    let request = at_a_b.descend(&dir("/a/b/c")).expect("descend");
    at_a_b.cancel_picker();

    assert_eq!(at_a_b.phase(), NavigatorPhase::Closed);
    assert_eq!(at_a_b.pending(), None);
    assert!(!at_a_b.apply_listing(request.token, Ok(listing("/a/b/c", None, Vec::new()))));
    assert!(at_a_b.state().is_none());
}

#[test]
fn navigation_requires_an_open_picker() {
    let mut nav = DirectoryNavigator::new();
    assert_eq!(nav.descend(&dir("/a")), None);
    assert_eq!(nav.ascend(), None);
    assert_eq!(nav.jump_to_breadcrumb("/"), None);
}

#[rstest]
fn reopening_forgets_the_previous_listing(mut at_a_b: DirectoryNavigator) {
    at_a_b.cancel_picker();
    let request = at_a_b.open(PendingSelection::CreateFile, ".");

    assert!(at_a_b.state().is_none());
    assert_eq!(at_a_b.pending(), Some(PendingSelection::CreateFile));
    assert_eq!(request.path, ".");
}
