//! Enumerating a wide group: full locator walk vs the capped member list.

use criterion::{criterion_group, criterion_main, Criterion};
use h5tree::{AccessProps, Container};
use h5tree_persist::{locator, GenericNode, Reader, Writer};

use std::path::Path;

const N: usize = 5000;

/// One group with `N` empty child groups.
fn write_wide_file(path: &Path) {
    let file = Container::create(path, AccessProps::default()).unwrap();
    let root = file.root();
    let parent = file.create_group("parent", &root).unwrap();
    for i in 0..N {
        file.create_group(&format!("g{i:05}"), &parent).unwrap();
    }
    file.close().unwrap();
}

/// Three levels, four children each, with a small dataset per node.
fn make_tree(depth: usize, name: String) -> GenericNode {
    let mut node = GenericNode::new(name)
        .with_attribute("depth", depth as i32)
        .with_dataset("values", vec![depth as f64; 64]);
    if depth < 3 {
        for i in 0..4 {
            node = node.with_child(make_tree(depth + 1, format!("n{i}")));
        }
    }
    node
}

fn bench_enumeration(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.h5t");
    write_wide_file(&path);

    c.bench_function("child_groups_5000", |b| {
        b.iter(|| {
            let file = Container::open(&path, AccessProps::default()).unwrap();
            let parent = file.group("/parent").unwrap();
            locator::child_groups(Some(&parent)).len()
        })
    });

    c.bench_function("member_list_capped_5000", |b| {
        b.iter(|| {
            let file = Container::open(&path, AccessProps::default()).unwrap();
            let parent = file.group("/parent").unwrap();
            parent.member_list().unwrap().len()
        })
    });
}

fn bench_tree_round_trip(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("tree.h5t");
    let dest = dest.to_str().unwrap();
    let tree = make_tree(0, "root".to_string());

    c.bench_function("write_tree_85_nodes", |b| {
        b.iter(|| assert!(Writer::new().write(&tree, dest)))
    });

    c.bench_function("read_tree_85_nodes", |b| {
        b.iter(|| {
            let mut node = GenericNode::default();
            assert!(Reader::new().read(&mut node, dest));
            node
        })
    });
}

criterion_group!(benches, bench_enumeration, bench_tree_round_trip);
criterion_main!(benches);
