//! A domain-agnostic node that can be written and read back.

use h5tree::{AttrValue, Container, DatasetData, Group, Member};
use tracing::{error, warn};

use crate::locator;
use crate::node::{ReadableNode, WriteableNode};
use crate::reader::Reader;
use crate::writing;

/// Named bag of attributes, datasets and child nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericNode {
    name: String,
    attributes: Vec<(String, AttrValue)>,
    datasets: Vec<(String, DatasetData)>,
    children: Vec<GenericNode>,
}

impl GenericNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute. A later value under the same name replaces the earlier one.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_dataset(mut self, name: impl Into<String>, data: impl Into<DatasetData>) -> Self {
        self.datasets.push((name.into(), data.into()));
        self
    }

    pub fn with_child(mut self, child: GenericNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, AttrValue)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn datasets(&self) -> &[(String, DatasetData)] {
        &self.datasets
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetData> {
        self.datasets.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn children(&self) -> &[GenericNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&GenericNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Sort children and datasets by name, recursively, matching the order a
    /// container hands them back in.
    pub fn canonicalize(&mut self) {
        self.datasets.sort_by(|a, b| a.0.cmp(&b.0));
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.canonicalize();
        }
    }

    pub fn canonicalized(mut self) -> Self {
        self.canonicalize();
        self
    }
}

impl WriteableNode for GenericNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn WriteableNode> {
        self.children.iter().map(|c| c as &dyn WriteableNode).collect()
    }

    fn write_attributes(&self, container: &Container, group: &Group<'_>) -> bool {
        self.attributes
            .iter()
            .all(|(name, value)| writing::write_attribute(container, group, name, value.clone()))
    }

    fn write_datasets(&self, container: &Container, group: &Group<'_>) -> bool {
        self.datasets
            .iter()
            .all(|(name, data)| writing::write_dataset(container, group, name, data.clone()))
    }
}

impl ReadableNode for GenericNode {
    /// Adopts the group's name and replaces any attributes already held.
    fn read_attributes(&mut self, group: &Group<'_>) -> bool {
        let attrs = match group.metadata() {
            Ok(attrs) => attrs,
            Err(e) => {
                error!(group = group.full_name(), error = %e, "failed to read attributes");
                return false;
            }
        };
        self.name = group.name().to_string();
        self.attributes.clear();
        for attr in attrs {
            match attr.value() {
                Some(v) => self.attributes.push((attr.name().to_string(), v.clone())),
                None => warn!(
                    group = group.full_name(),
                    name = attr.name(),
                    "skipping attribute whose value does not fit its type"
                ),
            }
        }
        true
    }

    fn read_datasets(&mut self, group: &Group<'_>) -> bool {
        self.datasets.clear();
        for member in locator::child_members(Some(group)) {
            let Member::Dataset(ds) = member else { continue };
            match ds.read_data() {
                Ok(data) => self.datasets.push((ds.name().to_string(), data)),
                Err(e) => {
                    error!(dataset = ds.full_name(), error = %e, "failed to read dataset");
                    return false;
                }
            }
        }
        true
    }

    fn read_child(&mut self, child: &Group<'_>) -> bool {
        let mut node = GenericNode::new(child.name());
        if !Reader::read_group(&mut node, child) {
            return false;
        }
        self.children.push(node);
        true
    }
}
