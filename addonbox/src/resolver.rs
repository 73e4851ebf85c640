//! Package/revision resolution.
//!
//! Translates an (identifier, optional revision) request into a concrete
//! snapshot. An omitted revision, or one below 1, means the latest. The
//! resolver issues no writes and performs no filtering.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CoreResult;
use crate::package::Package;
use crate::store::PackageStore;

/// Resolves package snapshots through a [`PackageStore`].
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn PackageStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn PackageStore>) -> Self {
        Self { store }
    }

    /// The concrete revision a request refers to.
    pub fn resolve_revision(&self, id: u32, rev: Option<u32>) -> CoreResult<u32> {
        match rev {
            Some(rev) if rev >= 1 => Ok(rev),
            _ => {
                let latest = self.store.latest_revision(id)?;
                debug!(id, latest, "Resolved latest revision");
                Ok(latest)
            }
        }
    }

    /// Resolve the snapshot with its content and include lists.
    pub fn resolve(&self, id: u32, rev: Option<u32>) -> CoreResult<Package> {
        let rev = self.resolve_revision(id, rev)?;
        let package = self.store.fetch_snapshot(id, rev)?;
        debug!(
            id,
            rev,
            content = package.content.len(),
            includes = package.includes.len(),
            "Resolved snapshot"
        );
        Ok(package)
    }

    /// All snapshots reachable through pinned includes, breadth-first.
    ///
    /// The root is not part of the result. Each (id, rev) is visited once;
    /// an edge back to an already visited snapshot is logged and skipped, so
    /// include cycles terminate.
    pub fn dependency_closure(&self, root: &Package) -> CoreResult<Vec<Package>> {
        let mut visited = HashSet::from([(root.id, root.revision)]);
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
        let mut closure = Vec::new();

        enqueue(root, &mut visited, &mut queue);

        while let Some((id, rev)) = queue.pop_front() {
            let package = self.store.fetch_snapshot(id, rev)?;
            enqueue(&package, &mut visited, &mut queue);
            closure.push(package);
        }

        debug!(
            id = root.id,
            rev = root.revision,
            dependencies = closure.len(),
            "Walked include closure"
        );
        Ok(closure)
    }
}

fn enqueue(from: &Package, visited: &mut HashSet<(u32, u32)>, queue: &mut VecDeque<(u32, u32)>) {
    for include in &from.includes {
        let key = (include.id, include.revision);
        if visited.insert(key) {
            queue.push_back(key);
        } else {
            warn!(
                id = from.id,
                rev = from.revision,
                include_id = include.id,
                include_rev = include.revision,
                "Include points at an already visited snapshot, skipping"
            );
        }
    }
}
