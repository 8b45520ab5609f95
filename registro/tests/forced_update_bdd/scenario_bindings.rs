//! Scenario bindings for forced update BDD tests.

use super::*;
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/forced_update.feature",
    name = "A current build keeps running"
)]
fn a_current_build_keeps_running(world: ForcedUpdateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/forced_update.feature",
    name = "A newer release is downloaded and installed"
)]
fn a_newer_release_is_downloaded_and_installed(world: ForcedUpdateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/forced_update.feature",
    name = "An unreachable feed ends the application"
)]
fn an_unreachable_feed_ends_the_application(world: ForcedUpdateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/forced_update.feature",
    name = "A corrupted installer is never launched"
)]
fn a_corrupted_installer_is_never_launched(world: ForcedUpdateWorld) {
    drop(world);
}
