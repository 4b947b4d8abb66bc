// check.rs — Existence check for component sources
//
// Preconditions: none.
// Postconditions: on Ok, every `<tests>/<name>.ly` was a regular file when
//   inspected.
// Failure modes: the first missing source (in list order) is returned as
//   `HarnessError::MissingSource`; later components are not inspected.
// Side effects: none (metadata reads only).

use std::fs;
use std::path::Path;

use crate::component::{ComponentList, Layout};
use crate::error::HarnessError;

/// True if `path` exists and, after following symlinks, is a regular file.
///
/// Directories, dangling symlinks and unreadable paths all count as absent.
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Confirm every component has a source file, stopping at the first gap.
pub fn check_sources(components: &ComponentList, layout: &Layout) -> Result<(), HarnessError> {
    for component in components {
        let source = layout.resolve(&layout.paths(component).source);
        if !is_regular_file(&source) {
            return Err(HarnessError::MissingSource {
                component: component.name().to_string(),
            });
        }
    }
    Ok(())
}
