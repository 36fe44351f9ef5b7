//! Contracts domain objects implement to take part in persistence.

use h5tree::{Container, Group};

use crate::writing;

/// A domain object that can write itself as one container group.
///
/// The [`Writer`](crate::Writer) calls, for each node in pre-order:
/// [`create_group`](Self::create_group), then
/// [`write_attributes`](Self::write_attributes), then
/// [`write_datasets`](Self::write_datasets), then recurses into
/// [`children`](Self::children). A `None` or `false` from any of them aborts
/// the whole write.
pub trait WriteableNode {
    /// Name of this node's group.
    fn name(&self) -> &str;

    /// Create this node's group under `parent`.
    ///
    /// Returns `None` when the container cannot be written or the group
    /// cannot be created; the cause is logged, never raised.
    fn create_group<'c>(&self, container: &'c Container, parent: &Group<'c>) -> Option<Group<'c>> {
        writing::create_group(container, self.name(), parent)
    }

    /// Owned children, in write order. Empty for leaves.
    fn children(&self) -> Vec<&dyn WriteableNode> {
        Vec::new()
    }

    /// Write this node's scalar attributes onto `group`.
    /// `true` only if every attribute was written.
    fn write_attributes(&self, container: &Container, group: &Group<'_>) -> bool;

    /// Write this node's datasets onto `group`. Nothing to write by default.
    fn write_datasets(&self, _container: &Container, _group: &Group<'_>) -> bool {
        true
    }
}

/// A domain object that can populate itself from a container group.
///
/// [`Reader::read_group`](crate::Reader::read_group) calls
/// [`read_attributes`](Self::read_attributes), then
/// [`read_datasets`](Self::read_datasets), then
/// [`read_child`](Self::read_child) once per child group in name order.
pub trait ReadableNode {
    /// Load scalar attributes from `group`.
    fn read_attributes(&mut self, group: &Group<'_>) -> bool;

    /// Load datasets from `group`.
    fn read_datasets(&mut self, _group: &Group<'_>) -> bool {
        true
    }

    /// Handle one child group. Children are ignored by default.
    fn read_child(&mut self, _child: &Group<'_>) -> bool {
        true
    }
}
