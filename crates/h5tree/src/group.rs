//! Group handles.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::container::Container;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::member::{join_path, Member, MemberInfo, ObjectId};
use crate::types::Attribute;

/// A handle to a group inside an open [`Container`].
#[derive(Debug, Clone)]
pub struct Group<'c> {
    container: &'c Container,
    id: ObjectId,
    name: String,
    full_name: String,
    /// Ids of the groups from the root down to this one, inclusive.
    lineage: Rc<[ObjectId]>,
    members: OnceCell<Vec<MemberInfo>>,
}

impl<'c> Group<'c> {
    pub(crate) fn new(
        container: &'c Container,
        id: ObjectId,
        name: &str,
        full_name: String,
        ancestors: &[ObjectId],
    ) -> Self {
        let lineage = ancestors.iter().copied().chain([id]).collect();
        Self {
            container,
            id,
            name: name.to_string(),
            full_name,
            lineage,
            members: OnceCell::new(),
        }
    }

    /// Last path component (`/` for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path from the root, e.g. `/Simulation/Mesh`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The container this handle belongs to.
    pub fn container(&self) -> &'c Container {
        self.container
    }

    pub(crate) fn lineage(&self) -> &[ObjectId] {
        &self.lineage
    }

    pub fn is_root(&self) -> bool {
        self.full_name == "/"
    }

    /// Members loaded into this handle's member cache.
    ///
    /// The cache is filled on first call and holds at most
    /// [`AccessProps::max_members`](crate::AccessProps::max_members) entries
    /// in name order; larger groups are silently truncated, and members
    /// added afterwards are not seen. Use [`Container::member_count`] and
    /// [`Container::member_info_all`] when every member matters.
    pub fn member_list(&self) -> Result<&[MemberInfo]> {
        if let Some(list) = self.members.get() {
            return Ok(list);
        }
        let cap = self.container.props().max_members;
        let list = self.container.member_infos(self.id, cap)?;
        Ok(self.members.get_or_init(|| list))
    }

    /// Authoritative member count, read from the container.
    pub fn number_of_members_in_file(&self) -> Result<usize> {
        self.container.member_count(self)
    }

    /// All attributes, in stored order.
    pub fn metadata(&self) -> Result<Vec<Attribute>> {
        let rec = self.container.record(self.id)?;
        Ok(rec.attributes.iter().map(Attribute::from_message).collect())
    }

    /// Open a direct child by name.
    ///
    /// A link back to this group or one of its ancestors fails with
    /// [`Error::LinkCycle`].
    pub fn member(&self, name: &str) -> Result<Member<'c>> {
        let full_name = join_path(&self.full_name, name);
        let rec = self.container.record(self.id)?;
        let link = rec
            .find_link(name)
            .ok_or_else(|| Error::PathNotFound(full_name.clone()))?;
        self.container.make_member(
            ObjectId(link.target),
            link.kind,
            name,
            full_name,
            &self.lineage,
        )
    }

    /// Open a direct child group by name.
    pub fn group(&self, name: &str) -> Result<Group<'c>> {
        match self.member(name)? {
            Member::Group(g) => Ok(g),
            Member::Dataset(d) => Err(Error::NotAGroup(d.full_name().to_string())),
        }
    }

    /// Open a direct child dataset by name.
    pub fn dataset(&self, name: &str) -> Result<Dataset<'c>> {
        match self.member(name)? {
            Member::Dataset(d) => Ok(d),
            Member::Group(g) => Err(Error::NotADataset(g.full_name().to_string())),
        }
    }
}
