//! Rebuilding [`ReadableNode`]s from a container.

use h5tree::{AccessProps, Container, Group};
use tracing::{debug, error};

use crate::error::PersistError;
use crate::locator;
use crate::node::ReadableNode;
use crate::uri;

/// Opens a container read-only and feeds its groups to a [`ReadableNode`].
#[derive(Debug, Clone, Default)]
pub struct Reader {
    access: AccessProps,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access(access: AccessProps) -> Self {
        Self { access }
    }

    /// Populate `node` from the first child group of `/` (name order).
    pub fn read(&self, node: &mut dyn ReadableNode, source: &str) -> bool {
        self.read_root(node, source, |top| locator::child_group_at(Some(top), 0))
    }

    /// Populate `node` from the child group of `/` called `name`.
    pub fn read_named(&self, node: &mut dyn ReadableNode, source: &str, name: &str) -> bool {
        self.read_root(node, source, |top| locator::child_group(Some(top), name))
    }

    /// Attributes, then datasets, then every child group in name order.
    /// The first `false` stops the walk.
    pub fn read_group(node: &mut dyn ReadableNode, group: &Group<'_>) -> bool {
        if !node.read_attributes(group) {
            error!(group = group.full_name(), "failed to read attributes");
            return false;
        }
        if !node.read_datasets(group) {
            error!(group = group.full_name(), "failed to read datasets");
            return false;
        }
        for child in locator::child_groups(Some(group)) {
            if !node.read_child(&child) {
                error!(group = child.full_name(), "failed to read child group");
                return false;
            }
        }
        true
    }

    fn read_root<F>(&self, node: &mut dyn ReadableNode, source: &str, select: F) -> bool
    where
        F: for<'c> FnOnce(&Group<'c>) -> Option<Group<'c>>,
    {
        let container = match self.open(source) {
            Ok(c) => c,
            Err(e) => {
                error!(source, error = %e, "cannot open source container");
                return false;
            }
        };

        let ok = {
            let top = container.root();
            match select(&top) {
                Some(group) => Self::read_group(node, &group),
                None => {
                    debug!(source, "container holds no matching root group");
                    false
                }
            }
        };

        if let Err(e) = container.close() {
            error!(source, error = %e, "failed to close container");
            return false;
        }
        ok
    }

    fn open(&self, source: &str) -> Result<Container, PersistError> {
        let path = uri::resolve(source)?;
        Ok(Container::open(&path, self.access.clone())?)
    }
}
