//! The container handle.
//!
//! A [`Container`] is one open session on a container file:
//!
//! - [`Container::open`] is read-only. Only the superblock is parsed eagerly;
//!   object headers are parsed on first access and cached by address.
//! - [`Container::create`] truncates the file, writes an empty container and
//!   keeps the tree in an in-memory arena that is written out on
//!   [`Container::flush`], [`Container::close`] or drop.
//! - [`Container::open_rw`] loads an existing file into that arena.
//!
//! Group and dataset handles borrow the container, so every handle is gone
//! before `close` can run.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use h5tree_format::data_layout::DataLayout;
use h5tree_format::dataspace::Dataspace;
use h5tree_format::error::FormatError;
use h5tree_format::filter_pipeline::FilterPipeline;
use h5tree_format::link::validate_link_name;
use h5tree_format::object_header::{ObjectHeader, ObjectKind};
use h5tree_format::superblock::Superblock;
use tracing::{debug, error, warn};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::flush::encode_image;
use crate::group::Group;
use crate::member::{join_path, Member, MemberInfo, ObjectId};
use crate::props::{AccessProps, DatasetProps};
use crate::record::{DatasetRecord, LinkEntry, ObjectRecord};
use crate::storage::FileData;
use crate::types::{AttrValue, DatasetData};

/// How a container was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    ReadWrite,
}

struct ReadState {
    data: FileData,
    superblock: Superblock,
    /// Parsed headers by address. Entries are never evicted: the map grows
    /// by one per distinct header touched and is dropped on close, so a
    /// long session over a large file holds every header it has visited.
    cache: HashMap<u64, Rc<ObjectRecord>>,
}

impl ReadState {
    fn record(&mut self, address: u64) -> Result<Rc<ObjectRecord>> {
        if let Some(rec) = self.cache.get(&address) {
            return Ok(Rc::clone(rec));
        }
        let rec = Rc::new(parse_record(self.data.as_bytes(), address)?);
        self.cache.insert(address, Rc::clone(&rec));
        Ok(rec)
    }
}

struct WriteState {
    file: File,
    records: Vec<Rc<ObjectRecord>>,
    /// Stored (filtered) dataset bytes by arena slot.
    raw: HashMap<usize, Vec<u8>>,
    dirty: bool,
}

impl WriteState {
    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let image = encode_image(&self.records, &self.raw)?;
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&image)?;
        self.file.flush()?;
        self.dirty = false;
        Ok(())
    }
}

enum State {
    Reading(ReadState),
    Writing(WriteState),
    Closed,
}

/// An open container file.
pub struct Container {
    path: PathBuf,
    props: AccessProps,
    root: ObjectId,
    state: RefCell<State>,
}

impl Container {
    /// Create (or truncate) a container at `path`.
    ///
    /// An empty container is written immediately, so an unwritable path
    /// fails here rather than at close.
    pub fn create<P: AsRef<Path>>(path: P, props: AccessProps) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut ws = WriteState {
            file,
            records: vec![Rc::new(ObjectRecord::new_group())],
            raw: HashMap::new(),
            dirty: true,
        };
        ws.flush()?;
        debug!(path = %path.display(), "created container");
        Ok(Self {
            path,
            props,
            root: ObjectId(0),
            state: RefCell::new(State::Writing(ws)),
        })
    }

    /// Open an existing container read-only.
    pub fn open<P: AsRef<Path>>(path: P, props: AccessProps) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = load_data(&path, &props)?;
        let superblock = Superblock::parse(data.as_bytes())?;
        debug!(
            path = %path.display(),
            mmap = data.is_mmap(),
            objects = superblock.object_count,
            "opened container read-only"
        );
        Ok(Self {
            path,
            props,
            root: ObjectId(superblock.root_address),
            state: RefCell::new(State::Reading(ReadState {
                data,
                superblock,
                cache: HashMap::new(),
            })),
        })
    }

    /// Open an existing container for modification.
    pub fn open_rw<P: AsRef<Path>>(path: P, props: AccessProps) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = FileData::read(&path)?;
        let superblock = Superblock::parse(data.as_bytes())?;
        let (records, raw) = load_arena(data.as_bytes(), superblock.root_address)?;
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        debug!(
            path = %path.display(),
            objects = records.len(),
            "opened container read-write"
        );
        Ok(Self {
            path,
            props,
            root: ObjectId(0),
            state: RefCell::new(State::Writing(WriteState {
                file,
                records,
                raw,
                dirty: false,
            })),
        })
    }

    /// Write pending changes (writable containers) and release the file.
    pub fn close(self) -> Result<()> {
        let state = self.state.replace(State::Closed);
        if let State::Writing(mut ws) = state {
            ws.flush()?;
        }
        debug!(path = %self.path.display(), "closed container");
        Ok(())
    }

    /// Write pending changes to disk. A no-op for read-only containers.
    pub fn flush(&self) -> Result<()> {
        match &mut *self.state.borrow_mut() {
            State::Writing(ws) => ws.flush(),
            State::Reading(_) => Ok(()),
            State::Closed => Err(Error::Closed),
        }
    }

    /// Filesystem path of the container.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Access properties the container was opened with.
    pub fn props(&self) -> &AccessProps {
        &self.props
    }

    pub fn mode(&self) -> Mode {
        match &*self.state.borrow() {
            State::Writing(_) => Mode::ReadWrite,
            _ => Mode::Read,
        }
    }

    /// True when groups, attributes and datasets can be added.
    pub fn is_writable(&self) -> bool {
        self.mode() == Mode::ReadWrite
    }

    /// Number of objects (groups and datasets, root included).
    pub fn object_count(&self) -> Result<u64> {
        match &*self.state.borrow() {
            State::Reading(rs) => Ok(rs.superblock.object_count),
            State::Writing(ws) => Ok(ws.records.len() as u64),
            State::Closed => Err(Error::Closed),
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// The root group `/`.
    pub fn root(&self) -> Group<'_> {
        Group::new(self, self.root, "/", "/".to_string(), &[])
    }

    /// Resolve a full path (`/a/b`) to a group or dataset.
    ///
    /// A path that passes through the same group twice fails with
    /// [`Error::LinkCycle`].
    pub fn get(&self, path: &str) -> Result<Member<'_>> {
        let mut id = self.root;
        let mut kind = ObjectKind::Group;
        let mut name = "";
        let mut full = String::new();
        let mut ancestors = Vec::new();
        for comp in path.split('/').filter(|c| !c.is_empty()) {
            if kind != ObjectKind::Group {
                return Err(Error::NotAGroup(full));
            }
            let rec = self.record(id)?;
            let link = rec
                .find_link(comp)
                .ok_or_else(|| Error::PathNotFound(path.to_string()))?;
            ancestors.push(id);
            id = ObjectId(link.target);
            kind = link.kind;
            name = comp;
            full.push('/');
            full.push_str(comp);
            if kind == ObjectKind::Group && ancestors.contains(&id) {
                return Err(Error::LinkCycle(full));
            }
        }
        if full.is_empty() {
            return Ok(Member::Group(self.root()));
        }
        self.make_member(id, kind, name, full, &ancestors)
    }

    /// Resolve a full path to a group.
    pub fn group(&self, path: &str) -> Result<Group<'_>> {
        match self.get(path)? {
            Member::Group(g) => Ok(g),
            Member::Dataset(_) => Err(Error::NotAGroup(path.to_string())),
        }
    }

    /// Resolve a full path to a dataset.
    pub fn dataset(&self, path: &str) -> Result<Dataset<'_>> {
        match self.get(path)? {
            Member::Dataset(d) => Ok(d),
            Member::Group(_) => Err(Error::NotADataset(path.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Create a child group named `name` under `parent`.
    pub fn create_group<'c>(&'c self, name: &str, parent: &Group<'c>) -> Result<Group<'c>> {
        let id = self.add_child(parent, name, ObjectRecord::new_group(), None)?;
        let full_name = join_path(parent.full_name(), name);
        debug!(group = %full_name, "created group");
        Ok(Group::new(self, id, name, full_name, parent.lineage()))
    }

    /// Set a scalar attribute on `group`, replacing any attribute of that name.
    pub fn write_attribute(
        &self,
        group: &Group<'_>,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        self.check_handle(group.container())?;
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        let msg = value.into().to_message(name);
        let mut state = self.state.borrow_mut();
        let ws = self.writable(&mut *state)?;
        let rec = ws
            .records
            .get_mut(group.id().0 as usize)
            .ok_or(Error::Format(FormatError::InvalidAddress(group.id().0)))?;
        Rc::make_mut(rec).upsert_attribute(msg);
        ws.dirty = true;
        Ok(())
    }

    /// Create a one-dimensional, uncompressed dataset.
    pub fn create_dataset<'c>(
        &'c self,
        group: &Group<'c>,
        name: &str,
        data: impl Into<DatasetData>,
    ) -> Result<Dataset<'c>> {
        self.create_dataset_with(group, name, data, &DatasetProps::default())
    }

    /// Create a dataset with explicit shape and filters.
    pub fn create_dataset_with<'c>(
        &'c self,
        group: &Group<'c>,
        name: &str,
        data: impl Into<DatasetData>,
        props: &DatasetProps,
    ) -> Result<Dataset<'c>> {
        let data = data.into();
        let count = data.len();
        let shape = props
            .shape
            .clone()
            .unwrap_or_else(|| vec![count as u64]);
        let dataspace = Dataspace::simple(&shape);
        match dataspace.num_elements() {
            Some(n) if n == count as u64 => {}
            n => {
                return Err(Error::ShapeMismatch {
                    shape,
                    expected: n.unwrap_or(u64::MAX),
                    actual: count,
                })
            }
        }
        let pipeline = props
            .deflate_level
            .map(FilterPipeline::deflate)
            .unwrap_or_default();
        let stored = pipeline.apply(&data.to_le_bytes())?;
        let rec = ObjectRecord::new_dataset(DatasetRecord {
            datatype: data.dtype().to_datatype(),
            dataspace,
            pipeline,
            layout: DataLayout::contiguous(0, stored.len() as u64),
        });
        let id = self.add_child(group, name, rec, Some(stored))?;
        let full_name = join_path(group.full_name(), name);
        debug!(dataset = %full_name, dtype = %data.dtype(), len = count, "created dataset");
        Ok(Dataset::new(self, id, name, full_name))
    }

    // -----------------------------------------------------------------------
    // Indexed member API
    // -----------------------------------------------------------------------

    /// Authoritative number of members of `group`.
    pub fn member_count(&self, group: &Group<'_>) -> Result<usize> {
        self.check_handle(group.container())?;
        Ok(self.record(group.id())?.links.len())
    }

    /// Name of the member at `index`, in increasing name order.
    pub fn name_by_index(&self, group: &Group<'_>, index: usize) -> Result<String> {
        self.check_handle(group.container())?;
        let rec = self.record(group.id())?;
        rec.links
            .get(index)
            .map(|l| l.name.clone())
            .ok_or(Error::IndexOutOfRange {
                index,
                count: rec.links.len(),
            })
    }

    /// Name, kind and id of every member of `group`, in name order.
    pub fn member_info_all(&self, group: &Group<'_>) -> Result<Vec<MemberInfo>> {
        self.check_handle(group.container())?;
        self.member_infos(group.id(), usize::MAX)
    }

    /// Open the member described by `info`.
    ///
    /// The member's header is parsed, so a damaged member fails here. A
    /// group that is `group` itself or one of its ancestors fails with
    /// [`Error::LinkCycle`].
    pub fn member<'c>(&'c self, group: &Group<'c>, info: &MemberInfo) -> Result<Member<'c>> {
        self.check_handle(group.container())?;
        let full_name = join_path(group.full_name(), &info.name);
        let rec = self.record(info.id)?;
        if rec.kind != info.kind {
            return Err(match info.kind {
                ObjectKind::Group => Error::NotAGroup(full_name),
                ObjectKind::Dataset => Error::NotADataset(full_name),
            });
        }
        self.make_member(info.id, info.kind, &info.name, full_name, group.lineage())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    pub(crate) fn record(&self, id: ObjectId) -> Result<Rc<ObjectRecord>> {
        match &mut *self.state.borrow_mut() {
            State::Reading(rs) => rs.record(id.0),
            State::Writing(ws) => ws
                .records
                .get(id.0 as usize)
                .cloned()
                .ok_or(Error::Format(FormatError::InvalidAddress(id.0))),
            State::Closed => Err(Error::Closed),
        }
    }

    pub(crate) fn member_infos(&self, id: ObjectId, limit: usize) -> Result<Vec<MemberInfo>> {
        let rec = self.record(id)?;
        Ok(rec
            .links
            .iter()
            .take(limit)
            .map(|l| MemberInfo {
                name: l.name.clone(),
                kind: l.kind,
                id: ObjectId(l.target),
            })
            .collect())
    }

    /// Decoded (unfiltered) bytes of a dataset.
    pub(crate) fn dataset_bytes(&self, id: ObjectId, full_name: &str) -> Result<Vec<u8>> {
        let rec = self.record(id)?;
        let ds = rec
            .dataset
            .as_ref()
            .ok_or_else(|| Error::NotADataset(full_name.to_string()))?;
        let max_len = ds
            .dataspace
            .num_elements()
            .and_then(|n| n.checked_mul(u64::from(ds.datatype.element_size())))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(Error::Format(FormatError::FieldOverflow("dataset byte length")))?;
        let state = self.state.borrow();
        let bytes = match &*state {
            State::Reading(rs) => ds
                .pipeline
                .reverse(ds.layout.slice(rs.data.as_bytes())?, max_len)?,
            State::Writing(ws) => {
                let stored = ws.raw.get(&(id.0 as usize)).map_or(&[][..], Vec::as_slice);
                ds.pipeline.reverse(stored, max_len)?
            }
            State::Closed => return Err(Error::Closed),
        };
        Ok(bytes)
    }

    /// Handle for a member whose parent group sits at the end of `ancestors`.
    pub(crate) fn make_member<'c>(
        &'c self,
        id: ObjectId,
        kind: ObjectKind,
        name: &str,
        full_name: String,
        ancestors: &[ObjectId],
    ) -> Result<Member<'c>> {
        match kind {
            ObjectKind::Group if ancestors.contains(&id) => {
                warn!(group = %full_name, "link refers back to an ancestor");
                Err(Error::LinkCycle(full_name))
            }
            ObjectKind::Group => Ok(Member::Group(Group::new(
                self, id, name, full_name, ancestors,
            ))),
            ObjectKind::Dataset => Ok(Member::Dataset(Dataset::new(self, id, name, full_name))),
        }
    }

    fn check_handle(&self, owner: &Container) -> Result<()> {
        if std::ptr::eq(owner, self) {
            Ok(())
        } else {
            Err(Error::ForeignHandle)
        }
    }

    fn writable<'s>(&self, state: &'s mut State) -> Result<&'s mut WriteState> {
        match state {
            State::Writing(ws) => Ok(ws),
            State::Reading(_) => Err(Error::ReadOnly(self.path.display().to_string())),
            State::Closed => Err(Error::Closed),
        }
    }

    fn add_child(
        &self,
        parent: &Group<'_>,
        name: &str,
        child: ObjectRecord,
        raw: Option<Vec<u8>>,
    ) -> Result<ObjectId> {
        self.check_handle(parent.container())?;
        validate_link_name(name).map_err(|_| Error::InvalidName(name.to_string()))?;

        let mut state = self.state.borrow_mut();
        let ws = self.writable(&mut *state)?;
        let slot = ws.records.len();
        let parent_rec = ws
            .records
            .get_mut(parent.id().0 as usize)
            .ok_or(Error::Format(FormatError::InvalidAddress(parent.id().0)))?;
        if parent_rec.kind != ObjectKind::Group {
            return Err(Error::NotAGroup(parent.full_name().to_string()));
        }
        if parent_rec.find_link(name).is_some() {
            return Err(Error::AlreadyExists(join_path(parent.full_name(), name)));
        }
        Rc::make_mut(parent_rec).insert_link(LinkEntry {
            name: name.to_string(),
            kind: child.kind,
            target: slot as u64,
        });
        ws.records.push(Rc::new(child));
        if let Some(bytes) = raw {
            ws.raw.insert(slot, bytes);
        }
        ws.dirty = true;
        Ok(ObjectId(slot as u64))
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if let State::Writing(ws) = self.state.get_mut() {
            if let Err(e) = ws.flush() {
                error!(path = %self.path.display(), error = %e, "failed to flush container on drop");
            }
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("Container");
        d.field("path", &self.path);
        match self.state.try_borrow() {
            Ok(state) => match &*state {
                State::Reading(rs) => d
                    .field("mode", &Mode::Read)
                    .field("data", &rs.data)
                    .field("cached_headers", &rs.cache.len()),
                State::Writing(ws) => d
                    .field("mode", &Mode::ReadWrite)
                    .field("objects", &ws.records.len())
                    .field("dirty", &ws.dirty),
                State::Closed => d.field("closed", &true),
            },
            Err(_) => d.field("state", &"<borrowed>"),
        };
        d.finish()
    }
}

#[cfg(feature = "mmap")]
fn load_data(path: &Path, props: &AccessProps) -> Result<FileData> {
    if props.use_mmap {
        Ok(FileData::map(path)?)
    } else {
        Ok(FileData::read(path)?)
    }
}

#[cfg(not(feature = "mmap"))]
fn load_data(path: &Path, _props: &AccessProps) -> Result<FileData> {
    Ok(FileData::read(path)?)
}

fn parse_record(data: &[u8], address: u64) -> Result<ObjectRecord> {
    let offset = usize::try_from(address).map_err(|_| FormatError::InvalidAddress(address))?;
    let hdr = ObjectHeader::parse(data, offset)?;
    ObjectRecord::from_header(&hdr)
}

type Arena = (Vec<Rc<ObjectRecord>>, HashMap<usize, Vec<u8>>);

/// Read every object reachable from `root` into arena slots (root first),
/// rewriting link targets from addresses to slots.
fn load_arena(data: &[u8], root: u64) -> Result<Arena> {
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut order = vec![root];
    slots.insert(root, 0);
    let mut records = Vec::new();
    let mut raw = HashMap::new();

    let mut next = 0;
    while next < order.len() {
        let rec = parse_record(data, order[next])?;
        for link in &rec.links {
            if !slots.contains_key(&link.target) {
                slots.insert(link.target, order.len());
                order.push(link.target);
            }
        }
        if let Some(ds) = &rec.dataset {
            raw.insert(next, ds.layout.slice(data)?.to_vec());
        }
        records.push(rec);
        next += 1;
    }

    let records = records
        .into_iter()
        .map(|mut rec| {
            for link in &mut rec.links {
                link.target = slots[&link.target] as u64;
            }
            Rc::new(rec)
        })
        .collect();
    Ok((records, raw))
}
