//! Step definitions for forced update BDD tests.

use super::*;
use registro::domain::FATAL_EXIT_CODE;
use rstest_bdd_macros::{given, then, when};
use semver::Version;

#[given("an update feed advertising the running version")]
fn an_update_feed_advertising_the_running_version(world: &ForcedUpdateWorld) {
    world.publish_running_version();
}

#[given("an update feed advertising a newer release with a verified installer")]
fn an_update_feed_advertising_a_newer_release_with_a_verified_installer(
    world: &ForcedUpdateWorld,
) {
    world.publish_newer_release(false);
}

#[given("an update feed advertising a newer release with a corrupted installer")]
fn an_update_feed_advertising_a_newer_release_with_a_corrupted_installer(
    world: &ForcedUpdateWorld,
) {
    world.publish_newer_release(true);
}

#[given("an update feed that answers with a server error")]
fn an_update_feed_that_answers_with_a_server_error(world: &ForcedUpdateWorld) {
    world.publish_server_error();
}

#[when("the coordinator checks for updates")]
fn the_coordinator_checks_for_updates(world: &ForcedUpdateWorld) {
    world.check_once();
}

#[then("the check reports the build is up to date")]
fn the_check_reports_the_build_is_up_to_date(world: &ForcedUpdateWorld) {
    let outcome = world.outcome.get().expect("outcome should be set");
    assert_eq!(outcome, CycleOutcome::UpToDate);
}

#[then("no notice was shown")]
fn no_notice_was_shown(world: &ForcedUpdateWorld) {
    assert!(world.surface().notices().is_empty());
    assert!(world.process().exit_codes().is_empty());
}

#[then("the surface was locked")]
fn the_surface_was_locked(world: &ForcedUpdateWorld) {
    assert_eq!(world.surface().locks(), vec![true]);
}

#[then("the download reached 100 percent")]
fn the_download_reached_100_percent(world: &ForcedUpdateWorld) {
    let last = world
        .surface()
        .last_progress()
        .expect("at least one progress report");
    assert_eq!(last.percent(), 100);
}

#[then("the installer was launched for version {version}")]
fn the_installer_was_launched_for_version(world: &ForcedUpdateWorld, version: String) {
    let expected = Version::parse(&version).expect("scenario version");
    let outcome = world.outcome.get().expect("outcome should be set");
    assert_eq!(
        outcome,
        CycleOutcome::Installing {
            version: expected.clone()
        }
    );
    assert_eq!(
        world.surface().notices(),
        vec![
            UpdateNotice::Available { version: expected },
            UpdateNotice::ReadyToInstall,
        ]
    );
    let installers = world.process().installers();
    assert_eq!(installers.len(), 1);
    assert!(
        registro::test_support::cap_fs::path_exists(&installers[0]),
        "installer should be staged at {}",
        installers[0].display()
    );
}

#[then("a fatal notice was shown")]
fn a_fatal_notice_was_shown(world: &ForcedUpdateWorld) {
    let notices = world.surface().notices();
    assert_eq!(notices.last(), Some(&UpdateNotice::Fatal));
    let outcome = world.outcome.get().expect("outcome should be set");
    assert!(matches!(outcome, CycleOutcome::Failed { .. }));
}

#[then("the process exited with the fatal code")]
fn the_process_exited_with_the_fatal_code(world: &ForcedUpdateWorld) {
    assert_eq!(world.process().exit_codes(), vec![FATAL_EXIT_CODE]);
}

#[then("no installer was launched")]
fn no_installer_was_launched(world: &ForcedUpdateWorld) {
    assert!(world.process().installers().is_empty());
}
