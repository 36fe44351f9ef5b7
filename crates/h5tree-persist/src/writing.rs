//! Write helpers for [`WriteableNode`](crate::WriteableNode) implementors.
//!
//! Every helper logs failures and reports them as `None` / `false`.

use h5tree::{AttrValue, Container, DatasetData, DatasetProps, Group};
use tracing::error;

/// Create a child group, rejecting blank names.
pub fn create_group<'c>(container: &'c Container, name: &str, parent: &Group<'c>) -> Option<Group<'c>> {
    if name.trim().is_empty() {
        error!(parent = parent.full_name(), "refusing to create group with a blank name");
        return None;
    }
    match container.create_group(name, parent) {
        Ok(group) => Some(group),
        Err(e) => {
            error!(parent = parent.full_name(), name, error = %e, "failed to create group");
            None
        }
    }
}

/// Write (or replace) a scalar attribute, rejecting blank names.
pub fn write_attribute(
    container: &Container,
    group: &Group<'_>,
    name: &str,
    value: impl Into<AttrValue>,
) -> bool {
    if name.trim().is_empty() {
        error!(group = group.full_name(), "refusing to write attribute with a blank name");
        return false;
    }
    match container.write_attribute(group, name, value) {
        Ok(()) => true,
        Err(e) => {
            error!(group = group.full_name(), name, error = %e, "failed to write attribute");
            false
        }
    }
}

pub fn write_f64_attribute(container: &Container, group: &Group<'_>, name: &str, value: f64) -> bool {
    write_attribute(container, group, name, value)
}

pub fn write_i32_attribute(container: &Container, group: &Group<'_>, name: &str, value: i32) -> bool {
    write_attribute(container, group, name, value)
}

pub fn write_string_attribute(
    container: &Container,
    group: &Group<'_>,
    name: &str,
    value: &str,
) -> bool {
    write_attribute(container, group, name, value)
}

/// Write a one-dimensional, uncompressed dataset.
pub fn write_dataset(
    container: &Container,
    group: &Group<'_>,
    name: &str,
    data: impl Into<DatasetData>,
) -> bool {
    write_dataset_with(container, group, name, data, &DatasetProps::default())
}

/// Write a dataset with explicit shape and compression.
pub fn write_dataset_with(
    container: &Container,
    group: &Group<'_>,
    name: &str,
    data: impl Into<DatasetData>,
    props: &DatasetProps,
) -> bool {
    match container.create_dataset_with(group, name, data, props) {
        Ok(_) => true,
        Err(e) => {
            error!(group = group.full_name(), name, error = %e, "failed to write dataset");
            false
        }
    }
}
