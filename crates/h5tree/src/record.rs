//! Decoded object headers.
//!
//! An [`ObjectRecord`] is the in-memory form of one group or dataset header.
//! Link targets are file addresses for records read from disk and arena
//! indices for records held by a writable container; [`ObjectRecord::to_header`]
//! maps them to addresses when the image is encoded.

use h5tree_format::attribute::AttributeMessage;
use h5tree_format::data_layout::DataLayout;
use h5tree_format::dataspace::Dataspace;
use h5tree_format::datatype::Datatype;
use h5tree_format::filter_pipeline::FilterPipeline;
use h5tree_format::link::LinkMessage;
use h5tree_format::message_type::MessageType;
use h5tree_format::object_header::{ObjectHeader, ObjectKind};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkEntry {
    pub(crate) name: String,
    pub(crate) kind: ObjectKind,
    pub(crate) target: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DatasetRecord {
    pub(crate) datatype: Datatype,
    pub(crate) dataspace: Dataspace,
    pub(crate) pipeline: FilterPipeline,
    pub(crate) layout: DataLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectRecord {
    pub(crate) kind: ObjectKind,
    /// Sorted by name; names are unique.
    pub(crate) links: Vec<LinkEntry>,
    /// Insertion order; names are unique.
    pub(crate) attributes: Vec<AttributeMessage>,
    pub(crate) dataset: Option<DatasetRecord>,
}

impl ObjectRecord {
    pub(crate) fn new_group() -> Self {
        Self {
            kind: ObjectKind::Group,
            links: Vec::new(),
            attributes: Vec::new(),
            dataset: None,
        }
    }

    pub(crate) fn new_dataset(dataset: DatasetRecord) -> Self {
        Self {
            kind: ObjectKind::Dataset,
            links: Vec::new(),
            attributes: Vec::new(),
            dataset: Some(dataset),
        }
    }

    pub(crate) fn from_header(hdr: &ObjectHeader) -> Result<Self> {
        let mut links = Vec::new();
        let mut attributes = Vec::new();
        for msg in &hdr.messages {
            match msg.msg_type {
                MessageType::Link => {
                    let link = LinkMessage::parse(&msg.data)?;
                    links.push(LinkEntry {
                        name: link.name,
                        kind: link.target_kind,
                        target: link.address,
                    });
                }
                MessageType::Attribute => attributes.push(AttributeMessage::parse(&msg.data)?),
                _ => {}
            }
        }
        links.sort_by(|a, b| a.name.cmp(&b.name));
        links.dedup_by(|a, b| a.name == b.name);

        let dataset = match hdr.kind {
            ObjectKind::Group => None,
            ObjectKind::Dataset => {
                let datatype = Datatype::parse(&required(hdr, MessageType::Datatype)?.data)?;
                let dataspace = Dataspace::parse(&required(hdr, MessageType::Dataspace)?.data)?;
                let layout = DataLayout::parse(&required(hdr, MessageType::DataLayout)?.data)?;
                let pipeline = match hdr.find_message(MessageType::FilterPipeline) {
                    Some(msg) => FilterPipeline::parse(&msg.data)?,
                    None => FilterPipeline::default(),
                };
                Some(DatasetRecord {
                    datatype,
                    dataspace,
                    pipeline,
                    layout,
                })
            }
        };

        Ok(Self {
            kind: hdr.kind,
            links,
            attributes,
            dataset,
        })
    }

    /// Encode as an object header. `link_address` maps each link target to a
    /// file address; `raw_address` is where this dataset's bytes are placed.
    pub(crate) fn to_header(
        &self,
        link_address: impl Fn(u64) -> u64,
        raw_address: u64,
    ) -> Result<ObjectHeader> {
        let mut hdr = ObjectHeader::new(self.kind);
        if let Some(ds) = &self.dataset {
            hdr.add_message(MessageType::Datatype, ds.datatype.serialize()?);
            hdr.add_message(MessageType::Dataspace, ds.dataspace.serialize()?);
            if !ds.pipeline.is_empty() {
                hdr.add_message(MessageType::FilterPipeline, ds.pipeline.serialize()?);
            }
            let layout = DataLayout::contiguous(raw_address, ds.layout.size);
            hdr.add_message(MessageType::DataLayout, layout.serialize());
        }
        for link in &self.links {
            let msg = LinkMessage::new(link.name.clone(), link.kind, link_address(link.target));
            hdr.add_message(MessageType::Link, msg.serialize()?);
        }
        for attr in &self.attributes {
            hdr.add_message(MessageType::Attribute, attr.serialize()?);
        }
        Ok(hdr)
    }

    pub(crate) fn find_link(&self, name: &str) -> Option<&LinkEntry> {
        self.links
            .binary_search_by(|l| l.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.links[i])
    }

    /// Insert keeping name order. Returns `false` if the name is taken.
    pub(crate) fn insert_link(&mut self, entry: LinkEntry) -> bool {
        match self
            .links
            .binary_search_by(|l| l.name.as_str().cmp(&entry.name))
        {
            Ok(_) => false,
            Err(pos) => {
                self.links.insert(pos, entry);
                true
            }
        }
    }

    /// Replace an attribute with the same name, or append.
    pub(crate) fn upsert_attribute(&mut self, attr: AttributeMessage) {
        match self.attributes.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => *existing = attr,
            None => self.attributes.push(attr),
        }
    }
}

fn required(hdr: &ObjectHeader, msg_type: MessageType) -> Result<&h5tree_format::HeaderMessage> {
    hdr.find_message(msg_type)
        .ok_or(Error::MissingMessage(msg_type))
}
