// clean.rs — Remove artifacts left by a previous run
//
// Deletes `<tests>/<name>`, `<tests>/<name>.ll` and `<tests>/<name>.o` for
// every component. Errors are swallowed: a missing artifact is the common
// case, and nothing downstream depends on deletion succeeding.
//
// Preconditions: none.
// Postconditions: every artifact path that was a removable file is gone.
// Failure modes: none surfaced.
// Side effects: file removal under the tests directory.

use std::fs;
use std::path::PathBuf;

use crate::component::{ComponentList, Layout};

/// Root-relative paths that were actually removed, in the order visited.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: Vec<PathBuf>,
}

/// Delete prior artifacts for every component, ignoring failures.
pub fn clean_artifacts(components: &ComponentList, layout: &Layout) -> CleanSummary {
    let mut summary = CleanSummary::default();
    for component in components {
        let paths = layout.paths(component);
        for artifact in paths.artifacts() {
            // remove_file refuses directories, which keeps a stray
            // `tests/<name>/` intact.
            if fs::remove_file(layout.resolve(artifact)).is_ok() {
                summary.removed.push(artifact.to_path_buf());
            }
        }
    }
    summary
}
