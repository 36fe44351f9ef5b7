//! Group members as returned by the indexed enumeration API.

use h5tree_format::object_header::ObjectKind;

use crate::dataset::Dataset;
use crate::group::Group;

/// Identifies an object inside one open container.
///
/// For read-only containers this is the object header address; for writable
/// ones it is a slot in the in-memory arena. Ids are only meaningful for the
/// container that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// The raw id value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Name, kind and id of one group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub kind: ObjectKind,
    pub id: ObjectId,
}

impl MemberInfo {
    pub fn is_group(&self) -> bool {
        self.kind == ObjectKind::Group
    }

    pub fn is_dataset(&self) -> bool {
        self.kind == ObjectKind::Dataset
    }
}

/// An opened group member: either a group or a dataset.
#[derive(Debug, Clone)]
pub enum Member<'c> {
    Group(Group<'c>),
    Dataset(Dataset<'c>),
}

impl<'c> Member<'c> {
    pub fn name(&self) -> &str {
        match self {
            Member::Group(g) => g.name(),
            Member::Dataset(d) => d.name(),
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Member::Group(g) => g.full_name(),
            Member::Dataset(d) => d.full_name(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Member::Group(_) => ObjectKind::Group,
            Member::Dataset(_) => ObjectKind::Dataset,
        }
    }

    pub fn into_group(self) -> Option<Group<'c>> {
        match self {
            Member::Group(g) => Some(g),
            Member::Dataset(_) => None,
        }
    }

    pub fn into_dataset(self) -> Option<Dataset<'c>> {
        match self {
            Member::Dataset(d) => Some(d),
            Member::Group(_) => None,
        }
    }
}

/// Join a parent's full name and a child name.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}
