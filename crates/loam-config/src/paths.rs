//! Resolved absolute filesystem roots

use crate::manifest::PathsSection;
use loam_fs::SitePath;

/// Named absolute filesystem roots for the site.
///
/// After [`PathSet::resolve`] every entry is absolute: `source` is
/// anchored at the project root, and every other entry is anchored at
/// the resolved `source` (not at the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub source: SitePath,
    pub destination: SitePath,
    pub templates: SitePath,
    pub data: SitePath,
}

impl PathSet {
    /// Resolve the declared path section into absolute roots.
    pub fn resolve(root: &SitePath, section: &PathsSection) -> PathSet {
        let source = SitePath::new(&section.source).absolutize(root);
        PathSet {
            destination: SitePath::new(&section.destination).absolutize(&source),
            templates: SitePath::new(&section.templates).absolutize(&source),
            data: SitePath::new(&section.data).absolutize(&source),
            source,
        }
    }
}
