// component.rs — Test components and the filesystem layout derived from them
//
// A component is one named test case backed by `<tests_dir>/<name>.ly`.
// Every other path the harness touches (output binary, `.ll`, `.o`) is
// derived from the name, so names are restricted to characters that are
// safe as a single path segment.
//
// Preconditions: none.
// Postconditions: a `ComponentList` is non-empty, duplicate-free, and keeps
//   declaration order.
// Failure modes: invalid or duplicate names produce `HarnessError`.
// Side effects: none (paths are computed, never touched).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::HarnessError;

/// The built-in components, in report order.
pub const DEFAULT_COMPONENTS: [&str; 6] = [
    "match",
    "member_fn",
    "for_loop",
    "init_list",
    "macro",
    "trait",
];

/// Source file extension for ly programs.
pub const SOURCE_EXT: &str = "ly";

// ── Component ───────────────────────────────────────────────────────────────

/// A validated component name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Component(String);

impl Component {
    /// Validate `name` as a component identifier.
    ///
    /// Accepts non-empty ASCII alphanumerics and `_`.
    pub fn new(name: impl Into<String>) -> Result<Self, HarnessError> {
        let name = name.into();
        if name.is_empty() {
            return Err(HarnessError::InvalidComponent {
                name,
                reason: "name is empty",
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(HarnessError::InvalidComponent {
                name,
                reason: "only ASCII letters, digits and '_' are allowed",
            });
        }
        Ok(Component(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Paths for this component, relative to the harness root.
    pub fn paths(&self, tests_dir: &Path) -> ComponentPaths {
        let output = tests_dir.join(&self.0);
        ComponentPaths {
            source: tests_dir.join(format!("{}.{}", self.0, SOURCE_EXT)),
            llvm_ir: tests_dir.join(format!("{}.ll", self.0)),
            object: tests_dir.join(format!("{}.o", self.0)),
            output,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All paths derived from one component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPaths {
    /// `<tests>/<name>.ly`
    pub source: PathBuf,
    /// `<tests>/<name>` (the `-o` target)
    pub output: PathBuf,
    /// `<tests>/<name>.ll`
    pub llvm_ir: PathBuf,
    /// `<tests>/<name>.o`
    pub object: PathBuf,
}

impl ComponentPaths {
    /// Artifacts the compiler may leave behind, in cleanup order.
    pub fn artifacts(&self) -> [&Path; 3] {
        [&self.output, &self.llvm_ir, &self.object]
    }
}

// ── Component list ──────────────────────────────────────────────────────────

/// Immutable, ordered set of components for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentList {
    components: Vec<Component>,
}

impl ComponentList {
    pub fn new<I, S>(names: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut components: Vec<Component> = Vec::new();
        for name in names {
            let component = Component::new(name)?;
            if components.contains(&component) {
                return Err(HarnessError::DuplicateComponent(component.0));
            }
            components.push(component);
        }
        if components.is_empty() {
            return Err(HarnessError::EmptyComponentList);
        }
        Ok(Self { components })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for ComponentList {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS
                .iter()
                .map(|name| Component((*name).to_string()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComponentList {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

/// Where the harness runs: a root directory and the tests directory under it.
///
/// Paths handed to the compiler stay relative to `root` (the compiler runs
/// with `root` as its working directory); filesystem checks go through
/// [`Layout::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub tests_dir: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, tests_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tests_dir: tests_dir.into(),
        }
    }

    pub fn paths(&self, component: &Component) -> ComponentPaths {
        component.paths(&self.tests_dir)
    }

    /// Anchor a root-relative path at the root. Absolute paths pass through.
    pub fn resolve(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".", "tests")
    }
}

/// Render names the way the failure summary lists them: `['a', 'b']`.
pub fn format_name_list<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a Component>,
{
    let quoted: Vec<String> = names
        .into_iter()
        .map(|c| format!("'{}'", c.name()))
        .collect();
    format!("[{}]", quoted.join(", "))
}
