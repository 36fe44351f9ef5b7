//! Read-side lookups: child groups, members, datasets and typed attributes.
//!
//! Every function is a pure query that answers with `None` or an empty `Vec`
//! instead of an error. A plain miss is logged at debug level; a failure
//! inside the container library is logged as an error.
//!
//! Enumeration always goes through the container's indexed API
//! ([`Container::member_count`](h5tree::Container::member_count) and
//! [`Container::member_info_all`](h5tree::Container::member_info_all)).
//! [`Group::member_list`] is capped and under-reports large groups, so it is
//! never consulted here.

use h5tree::{AttrScalar, Dataset, Error, Group, Member};
use tracing::{debug, error, warn};

/// Child group `name` of `parent`.
pub fn child_group<'c>(parent: Option<&Group<'c>>, name: &str) -> Option<Group<'c>> {
    let parent = present(parent, "child_group")?;
    if name.trim().is_empty() {
        debug!(group = parent.full_name(), "child_group: blank name");
        return None;
    }
    if !has_members(parent) {
        return None;
    }
    match open_member(parent, name)? {
        Member::Group(g) => Some(g),
        Member::Dataset(_) => {
            debug!(group = parent.full_name(), name, "member is a dataset, not a group");
            None
        }
    }
}

/// Child group at `index` in name order.
///
/// `None` for negative indices and for `index >= member_count`.
pub fn child_group_at<'c>(parent: Option<&Group<'c>>, index: i64) -> Option<Group<'c>> {
    let parent = present(parent, "child_group_at")?;
    let Ok(index) = usize::try_from(index) else {
        debug!(group = parent.full_name(), index, "negative member index");
        return None;
    };
    let container = parent.container();
    let count = match container.member_count(parent) {
        Ok(n) => n,
        Err(e) => {
            error!(group = parent.full_name(), error = %e, "failed to count members");
            return None;
        }
    };
    if index >= count {
        debug!(group = parent.full_name(), index, count, "member index out of range");
        return None;
    }
    let name = match container.name_by_index(parent, index) {
        Ok(name) => name,
        Err(e) => {
            error!(group = parent.full_name(), index, error = %e, "failed to read member name");
            return None;
        }
    };
    match open_member(parent, &name)? {
        Member::Group(g) => Some(g),
        Member::Dataset(_) => {
            debug!(group = parent.full_name(), index, name = name.as_str(), "member is a dataset, not a group");
            None
        }
    }
}

/// Every child group of `parent`, in name order.
///
/// A member whose header cannot be read is logged and skipped.
pub fn child_groups<'c>(parent: Option<&Group<'c>>) -> Vec<Group<'c>> {
    child_members(parent)
        .into_iter()
        .filter_map(Member::into_group)
        .collect()
}

/// Every member (groups and datasets) of `parent`, in name order.
pub fn child_members<'c>(parent: Option<&Group<'c>>) -> Vec<Member<'c>> {
    let Some(parent) = present(parent, "child_members") else {
        return Vec::new();
    };
    let container = parent.container();
    let count = match container.member_count(parent) {
        Ok(0) => return Vec::new(),
        Ok(n) => n,
        Err(e) => {
            error!(group = parent.full_name(), error = %e, "failed to count members");
            return Vec::new();
        }
    };
    let infos = match container.member_info_all(parent) {
        Ok(infos) => infos,
        Err(e) => {
            error!(group = parent.full_name(), error = %e, "failed to enumerate members");
            return Vec::new();
        }
    };
    if infos.len() != count {
        warn!(
            group = parent.full_name(),
            count,
            listed = infos.len(),
            "member enumeration disagrees with member count"
        );
    }

    let mut members = Vec::with_capacity(infos.len());
    for info in &infos {
        match container.member(parent, info) {
            Ok(m) => members.push(m),
            Err(e) => error!(
                group = parent.full_name(),
                member = info.name.as_str(),
                error = %e,
                "skipping member that failed to resolve"
            ),
        }
    }
    members
}

/// Dataset `name` directly under `parent`.
pub fn dataset<'c>(parent: Option<&Group<'c>>, name: &str) -> Option<Dataset<'c>> {
    let parent = present(parent, "dataset")?;
    if name.trim().is_empty() {
        debug!(group = parent.full_name(), "dataset: blank name");
        return None;
    }
    if !has_members(parent) {
        return None;
    }
    match open_member(parent, name)? {
        Member::Dataset(d) => Some(d),
        Member::Group(_) => {
            debug!(group = parent.full_name(), name, "member is a group, not a dataset");
            None
        }
    }
}

/// Attribute `name` of `group`, if it exists with type tag `T`.
///
/// An attribute of the same name but another type is treated as absent.
pub fn read_attribute<T: AttrScalar>(group: Option<&Group<'_>>, name: &str) -> Option<T> {
    let group = present(group, "read_attribute")?;
    let attrs = match group.metadata() {
        Ok(attrs) => attrs,
        Err(e) => {
            error!(group = group.full_name(), error = %e, "failed to read attributes");
            return None;
        }
    };
    if attrs.is_empty() {
        debug!(group = group.full_name(), name, "group has no attributes");
        return None;
    }

    let found = attrs
        .iter()
        .find(|a| a.name() == name && a.attr_type() == T::ATTR_TYPE);
    let Some(attr) = found else {
        debug!(
            group = group.full_name(),
            name,
            wanted = %T::ATTR_TYPE,
            "no attribute with this name and type"
        );
        return None;
    };
    let value = attr.value().and_then(T::from_value);
    if value.is_none() {
        error!(group = group.full_name(), name, "attribute value does not decode");
    }
    value
}

pub fn read_f64_attribute(group: Option<&Group<'_>>, name: &str) -> Option<f64> {
    read_attribute(group, name)
}

pub fn read_i32_attribute(group: Option<&Group<'_>>, name: &str) -> Option<i32> {
    read_attribute(group, name)
}

pub fn read_string_attribute(group: Option<&Group<'_>>, name: &str) -> Option<String> {
    read_attribute(group, name)
}

fn present<'g, 'c>(group: Option<&'g Group<'c>>, op: &str) -> Option<&'g Group<'c>> {
    if group.is_none() {
        debug!(op, "no group given");
    }
    group
}

fn has_members(parent: &Group<'_>) -> bool {
    match parent.number_of_members_in_file() {
        Ok(0) => {
            debug!(group = parent.full_name(), "group has no members");
            false
        }
        Ok(_) => true,
        Err(e) => {
            error!(group = parent.full_name(), error = %e, "failed to count members");
            false
        }
    }
}

fn open_member<'c>(parent: &Group<'c>, name: &str) -> Option<Member<'c>> {
    match parent.member(name) {
        Ok(m) => Some(m),
        Err(Error::PathNotFound(_)) => {
            debug!(group = parent.full_name(), name, "no such member");
            None
        }
        Err(e) => {
            error!(group = parent.full_name(), name, error = %e, "failed to open member");
            None
        }
    }
}
