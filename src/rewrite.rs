//! Archive member path rewriting
//!
//! Mod authors ship archives laid out like the game folder. Version-specific
//! files live either under a literal `version` placeholder segment or under
//! a concrete (usually outdated) `mods/a.b.c.d/` folder. Both are redirected
//! to the currently installed version; everything else is copied as-is.
//!
//! Rules are tried in order and the first one that matches wins:
//!
//! 1. `/version/` or `\version\` anywhere in the path
//! 2. `mods/<a.b.c.d>/`, then its backslash twin `mods\<a.b.c.d>\`
//! 3. no change

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use strum::Display;

use crate::version::GameVersion;

static MODS_VERSION_FORWARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mods/[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+/").expect("forward pattern is valid")
});

static MODS_VERSION_BACKSLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mods\\[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+\\").expect("backslash pattern is valid")
});

/// Which rewrite rule produced a target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RewriteRule {
    /// A literal `version` segment was replaced
    #[strum(serialize = "placeholder")]
    Placeholder,
    /// A numeric `mods/a.b.c.d/` segment was replaced by a different one
    #[strum(serialize = "version folder")]
    VersionFolder,
    /// The path is copied unchanged
    #[strum(serialize = "unchanged")]
    Unchanged,
}

/// Result of rewriting one archive member path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub path: String,
    pub rule: RewriteRule,
}

impl Rewrite {
    /// True when the target differs from the member name.
    pub fn changed(&self) -> bool {
        self.rule != RewriteRule::Unchanged
    }
}

/// Rewrite an archive member path for the given game version.
///
/// Pure string transformation; separators are left as they are.
pub fn rewrite(path: &str, version: &GameVersion) -> Rewrite {
    let v = version.as_str();

    if path.contains("/version/") || path.contains("\\version\\") {
        let path = path
            .replace("/version/", &format!("/{v}/"))
            .replace("\\version\\", &format!("\\{v}\\"));
        return Rewrite {
            path,
            rule: RewriteRule::Placeholder,
        };
    }

    if path.contains("mods/") && MODS_VERSION_FORWARD.is_match(path) {
        let target = format!("mods/{v}/");
        let rewritten = MODS_VERSION_FORWARD.replace_all(path, NoExpand(&target));
        return version_folder(path, rewritten.into_owned());
    }

    if path.contains("mods\\") && MODS_VERSION_BACKSLASH.is_match(path) {
        let target = format!("mods\\{v}\\");
        let rewritten = MODS_VERSION_BACKSLASH.replace_all(path, NoExpand(&target));
        return version_folder(path, rewritten.into_owned());
    }

    Rewrite {
        path: path.to_string(),
        rule: RewriteRule::Unchanged,
    }
}

// A member already below the current version folder matches the pattern but
// keeps its path; that counts as unchanged.
fn version_folder(source: &str, path: String) -> Rewrite {
    let rule = if path == source {
        RewriteRule::Unchanged
    } else {
        RewriteRule::VersionFolder
    };
    Rewrite { path, rule }
}
