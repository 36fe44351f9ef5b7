//! Write a tree, read it back with the Reader, compare.

use h5tree::{AccessProps, AttrValue, Container, DatasetData, Group, DEFAULT_MAX_MEMBERS};
use h5tree_format::link::LinkMessage;
use h5tree_format::message_type::MessageType;
use h5tree_format::object_header::{ObjectHeader, ObjectKind};
use h5tree_format::superblock::{Superblock, SUPERBLOCK_SIZE};
use h5tree_persist::{locator, GenericNode, ReadableNode, Reader, Writer};
use proptest::prelude::*;

fn dest(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

// ---- Reader ----

#[test]
fn generic_tree_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "tree.h5t");
    let tree = GenericNode::new("model")
        .with_attribute("version", 3)
        .with_attribute("title", "demo")
        .with_child(
            GenericNode::new("grid")
                .with_attribute("spacing", 0.25)
                .with_dataset("x", vec![0.0f64, 0.25, 0.5])
                .with_dataset("ids", vec![7i64, 8, 9]),
        )
        .with_child(GenericNode::new("aux").with_dataset("mask", vec![1u8, 0, 1]));
    assert!(Writer::new().write(&tree, &path));

    let mut back = GenericNode::default();
    assert!(Reader::new().read(&mut back, &path));
    assert_eq!(back, tree.canonicalized());
}

#[test]
fn read_named_picks_top_level_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "two.h5t");
    let a = GenericNode::new("a").with_attribute("k", 1);
    let b = GenericNode::new("b").with_attribute("k", 2);
    assert!(Writer::new().write_all(&[&a, &b], &path));

    let mut first = GenericNode::default();
    assert!(Reader::new().read(&mut first, &path));
    assert_eq!(first.name(), "a");

    let mut second = GenericNode::default();
    assert!(Reader::new().read_named(&mut second, &path, "b"));
    assert_eq!(second.attribute("k"), Some(&AttrValue::I32(2)));

    let mut none = GenericNode::default();
    assert!(!Reader::new().read_named(&mut none, &path, "c"));
}

#[test]
fn reader_reports_missing_sources() {
    let dir = tempfile::tempdir().unwrap();
    let mut node = GenericNode::default();
    assert!(!Reader::new().read(&mut node, &dest(&dir, "absent.h5t")));
    assert!(!Reader::new().read(&mut node, "ftp://host/x.h5t"));

    // A container with no top-level group has nothing to read.
    let empty = dest(&dir, "empty.h5t");
    Container::create(&empty, AccessProps::default())
        .unwrap()
        .close()
        .unwrap();
    assert!(!Reader::new().read(&mut node, &empty));
}

/// Stops at the first child it sees.
#[derive(Default)]
struct PickyNode {
    attrs_seen: usize,
    children_seen: Vec<String>,
}

impl ReadableNode for PickyNode {
    fn read_attributes(&mut self, group: &Group<'_>) -> bool {
        self.attrs_seen = group.metadata().map(|m| m.len()).unwrap_or(0);
        true
    }

    fn read_child(&mut self, child: &Group<'_>) -> bool {
        self.children_seen.push(child.name().to_string());
        false
    }
}

#[test]
fn read_child_false_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "picky.h5t");
    let tree = GenericNode::new("root")
        .with_attribute("a", 1.0)
        .with_child(GenericNode::new("y"))
        .with_child(GenericNode::new("x"));
    assert!(Writer::new().write(&tree, &path));

    let mut node = PickyNode::default();
    assert!(!Reader::new().read(&mut node, &path));
    assert_eq!(node.attrs_seen, 1);
    assert_eq!(node.children_seen, ["x"]);
}

// ---- Cyclic links ----

fn group_header(links: &[(&str, usize)], addrs: &[u64]) -> ObjectHeader {
    let mut hdr = ObjectHeader::new(ObjectKind::Group);
    for &(name, target) in links {
        let link = LinkMessage::new(name, ObjectKind::Group, addrs[target]);
        hdr.add_message(MessageType::Link, link.serialize().unwrap());
    }
    hdr
}

/// Group `i` links `name` to group `target`; group 0 is the root.
fn write_linked_groups(path: &str, groups: &[&[(&str, usize)]]) {
    let mut addrs = vec![0u64; groups.len()];
    let mut at = SUPERBLOCK_SIZE as u64;
    for (i, links) in groups.iter().enumerate() {
        addrs[i] = at;
        at += group_header(links, &addrs).encoded_len() as u64;
    }
    let mut bytes = Superblock::new(addrs[0], at, groups.len() as u64).serialize();
    for links in groups {
        bytes.extend(group_header(links, &addrs).serialize().unwrap());
    }
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn self_linked_root_reads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "self.h5t");
    write_linked_groups(&path, &[&[("a", 0)]]);

    let file = Container::open(&path, AccessProps::default()).unwrap();
    let root = file.root();
    assert!(locator::child_groups(Some(&root)).is_empty());
    assert!(locator::child_group(Some(&root), "a").is_none());
    assert!(locator::child_group_at(Some(&root), 0).is_none());

    let mut node = GenericNode::default();
    assert!(!Reader::new().read(&mut node, &path));
}

#[test]
fn cycle_below_top_group_is_cut() {
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "loop.h5t");
    // / -> top -> (loop: top), (leaf)
    write_linked_groups(&path, &[&[("top", 1)], &[("leaf", 2), ("loop", 1)], &[]]);

    let mut node = GenericNode::default();
    assert!(Reader::new().read(&mut node, &path));
    assert_eq!(node.name(), "top");
    let names: Vec<_> = node.children().iter().map(GenericNode::name).collect();
    assert_eq!(names, ["leaf"]);
    assert!(node.child("leaf").unwrap().children().is_empty());
}

// ---- Scale ----

#[test]
fn large_group_enumerates_fully() {
    const N: usize = 5000;
    let dir = tempfile::tempdir().unwrap();
    let path = dest(&dir, "wide.h5t");
    {
        let file = Container::create(&path, AccessProps::default()).unwrap();
        let root = file.root();
        let parent = file.create_group("parent", &root).unwrap();
        for i in 0..N {
            file.create_group(&format!("g{i:05}"), &parent).unwrap();
        }
        file.close().unwrap();
    }

    let file = Container::open(&path, AccessProps::default()).unwrap();
    let parent = file.group("/parent").unwrap();
    assert_eq!(parent.member_list().unwrap().len(), DEFAULT_MAX_MEMBERS);
    assert_eq!(parent.number_of_members_in_file().unwrap(), N);

    let groups = locator::child_groups(Some(&parent));
    assert_eq!(groups.len(), N);
    assert_eq!(groups[N - 1].name(), "g04999");
    assert_eq!(
        locator::child_group_at(Some(&parent), (N - 1) as i64).unwrap().name(),
        "g04999"
    );
    assert!(locator::child_group_at(Some(&parent), N as i64).is_none());
    assert!(locator::child_group(Some(&parent), "g04321").is_some());
}

// ---- Property: arbitrary trees ----

#[derive(Debug, Clone)]
struct Shape {
    attrs: Vec<AttrValue>,
    data: Vec<DatasetData>,
    children: Vec<Shape>,
}

impl Shape {
    fn into_node(self, name: String) -> GenericNode {
        let mut node = GenericNode::new(name);
        for (i, v) in self.attrs.into_iter().enumerate() {
            node = node.with_attribute(format!("a{i}"), v);
        }
        for (i, d) in self.data.into_iter().enumerate() {
            node = node.with_dataset(format!("d{i}"), d);
        }
        for (i, c) in self.children.into_iter().enumerate() {
            node = node.with_child(c.into_node(format!("c{i}")));
        }
        node
    }
}

fn arb_value() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        (-1.0e9f64..1.0e9).prop_map(AttrValue::F64),
        any::<i32>().prop_map(AttrValue::I32),
        "[a-zA-Z0-9 ]{0,16}".prop_map(AttrValue::String),
    ]
}

fn arb_data() -> impl Strategy<Value = DatasetData> {
    prop_oneof![
        prop::collection::vec(-1.0e9f64..1.0e9, 0..16).prop_map(DatasetData::F64),
        prop::collection::vec(any::<i32>(), 0..16).prop_map(DatasetData::I32),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(DatasetData::I64),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(DatasetData::U8),
    ]
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = (
        prop::collection::vec(arb_value(), 0..4),
        prop::collection::vec(arb_data(), 0..3),
    )
        .prop_map(|(attrs, data)| Shape {
            attrs,
            data,
            children: Vec::new(),
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::collection::vec(arb_value(), 0..4),
            prop::collection::vec(arb_data(), 0..3),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(attrs, data, children)| Shape {
                attrs,
                data,
                children,
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_written_tree_reads_back(shape in arb_shape()) {
        let tree = shape.into_node("root".to_string());
        let dir = tempfile::tempdir().unwrap();
        let path = dest(&dir, "prop.h5t");
        prop_assert!(Writer::new().write(&tree, &path));

        let mut back = GenericNode::default();
        prop_assert!(Reader::new().read(&mut back, &path));
        prop_assert_eq!(back, tree.canonicalized());
    }
}
