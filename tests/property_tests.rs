//! Property-based tests for path rewriting and version handling
//!
//! These tests verify:
//! - Paths without a placeholder or version folder pass through untouched
//! - Placeholders are always replaced by the current version
//! - Version parsing and ordering agree with the numeric parts
//! - Unsafe member paths never resolve outside the game directory

use proptest::prelude::*;
use std::path::Path;

use wotmods::archive::resolve_target;
use wotmods::rewrite::{rewrite, RewriteRule};
use wotmods::version::GameVersion;

/// Strategy for four-part versions
fn version_strategy() -> impl Strategy<Value = GameVersion> {
    (0u64..50, 0u64..50, 0u64..50, 0u64..500)
        .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}").parse().expect("valid version"))
}

/// Path segments that can never form `version` or `a.b.c.d`
fn plain_segment() -> impl Strategy<Value = String> {
    "[a-z_]{1,8}(\\.[a-z]{1,4})?".prop_filter("not the placeholder", |s| s != "version")
}

fn plain_path() -> impl Strategy<Value = String> {
    prop::collection::vec(plain_segment(), 1..6).prop_map(|segments| segments.join("/"))
}

// =============================================================================
// Rewriting
// =============================================================================

proptest! {
    /// Paths with nothing to rewrite are returned unchanged
    #[test]
    fn plain_paths_are_unchanged(path in plain_path(), version in version_strategy()) {
        let result = rewrite(&path, &version);
        prop_assert_eq!(result.rule, RewriteRule::Unchanged);
        prop_assert_eq!(result.path, path);
    }

    /// A placeholder segment ends up as the current version folder
    #[test]
    fn placeholder_becomes_version(
        root in prop_oneof![Just("mods"), Just("res_mods")],
        rest in plain_path(),
        version in version_strategy(),
    ) {
        let path = format!("{root}/version/{rest}");
        let result = rewrite(&path, &version);
        prop_assert_eq!(result.rule, RewriteRule::Placeholder);
        prop_assert_eq!(&result.path, &format!("{root}/{version}/{rest}"));
        prop_assert!(!result.path.contains("/version/"));
    }

    /// Any old version folder under mods/ is moved to the current one
    #[test]
    fn old_version_folder_is_replaced(
        old in version_strategy(),
        current in version_strategy(),
        rest in plain_path(),
    ) {
        let path = format!("mods/{old}/{rest}");
        let result = rewrite(&path, &current);
        let expected_rule = if old == current {
            RewriteRule::Unchanged
        } else {
            RewriteRule::VersionFolder
        };
        prop_assert_eq!(result.rule, expected_rule);
        prop_assert_eq!(result.changed(), result.path != path);
        prop_assert_eq!(result.path, format!("mods/{current}/{rest}"));
    }

    /// Rewriting is idempotent once the current version is in place
    #[test]
    fn rewrite_is_idempotent(rest in plain_path(), version in version_strategy()) {
        let once = rewrite(&format!("mods/version/{rest}"), &version).path;
        let twice = rewrite(&once, &version).path;
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Versions
// =============================================================================

proptest! {
    /// Display → parse round-trip is identity
    #[test]
    fn version_roundtrip(version in version_strategy()) {
        let parsed: GameVersion = version.to_string().parse().expect("should parse");
        prop_assert_eq!(parsed, version);
    }

    /// Ordering follows the numeric parts, not the string
    #[test]
    fn version_order_is_numeric(a in version_strategy(), b in version_strategy()) {
        prop_assert_eq!(a.cmp(&b), a.parts().cmp(&b.parts()));
    }

    /// Anything other than four dot-separated numbers is rejected
    #[test]
    fn three_part_versions_are_rejected(a in 0u64..100, b in 0u64..100, c in 0u64..100) {
        let s = format!("{a}.{b}.{c}");
        prop_assert!(s.parse::<GameVersion>().is_err());
    }
}

// =============================================================================
// Path safety
// =============================================================================

proptest! {
    /// Paths containing `..` are always refused
    #[test]
    fn parent_references_are_refused(prefix in plain_path(), suffix in plain_path()) {
        let path = format!("{prefix}/../{suffix}");
        prop_assert!(resolve_target(Path::new("/games/wot"), &path).is_err());
    }

    /// A drive letter is refused wherever it sits in the path
    #[test]
    fn drive_prefixes_are_refused(
        lead in prop_oneof![Just(""), Just("./"), Just(".\\"), Just(".//")],
        prefix in prop::collection::vec(plain_segment(), 0..3),
        drive in "[A-Za-z]",
        suffix in plain_path(),
        sep in prop_oneof![Just("/"), Just("\\")],
    ) {
        let mut parts = prefix;
        parts.push(format!("{drive}:"));
        parts.push(suffix);
        let path = format!("{lead}{}", parts.join(sep));
        prop_assert!(resolve_target(Path::new("/games/wot"), &path).is_err());
    }

    /// Accepted paths always stay below the game directory
    #[test]
    fn accepted_paths_stay_inside(path in plain_path()) {
        let game = Path::new("/games/wot");
        let target = resolve_target(game, &path).expect("plain path is safe");
        prop_assert!(target.starts_with(game));
    }
}
