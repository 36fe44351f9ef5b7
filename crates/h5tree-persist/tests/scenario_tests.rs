//! End-to-end: a small simulation model written with hand-rolled nodes and
//! inspected through the locator.

use h5tree::{AccessProps, Container, Group};
use h5tree_persist::{locator, writing, WriteableNode, Writer};

struct Mesh {
    resolution: i32,
}

struct Results {
    values: Vec<f64>,
}

struct Simulation {
    mesh: Mesh,
    results: Results,
}

impl WriteableNode for Mesh {
    fn name(&self) -> &str {
        "Mesh"
    }

    fn write_attributes(&self, container: &Container, group: &Group<'_>) -> bool {
        writing::write_i32_attribute(container, group, "resolution", self.resolution)
    }
}

impl WriteableNode for Results {
    fn name(&self) -> &str {
        "Results"
    }

    fn write_attributes(&self, _container: &Container, _group: &Group<'_>) -> bool {
        true
    }

    fn write_datasets(&self, container: &Container, group: &Group<'_>) -> bool {
        writing::write_dataset(container, group, "values", self.values.clone())
    }
}

impl WriteableNode for Simulation {
    fn name(&self) -> &str {
        "Simulation"
    }

    // Results first: on-disk order is by name regardless.
    fn children(&self) -> Vec<&dyn WriteableNode> {
        vec![&self.results as &dyn WriteableNode, &self.mesh]
    }

    fn write_attributes(&self, container: &Container, group: &Group<'_>) -> bool {
        writing::write_string_attribute(container, group, "solver", "explicit")
    }
}

fn simulation() -> Simulation {
    Simulation {
        mesh: Mesh { resolution: 128 },
        results: Results {
            values: (0..100).map(|i| i as f64 * 0.01).collect(),
        },
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("h5tree_persist=debug")
        .try_init();
}

#[test]
fn simulation_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.out");
    let dest = path.to_str().unwrap();

    assert!(Writer::new().write(&simulation(), dest));

    let file = Container::open(&path, AccessProps::default()).unwrap();
    let top = file.root();
    let root = locator::child_group(Some(&top), "Simulation").unwrap();
    assert_eq!(
        locator::read_string_attribute(Some(&root), "solver").as_deref(),
        Some("explicit")
    );

    let children = locator::child_groups(Some(&root));
    let names: Vec<_> = children.iter().map(|g| g.name()).collect();
    assert_eq!(names, ["Mesh", "Results"]);

    let mesh = &children[0];
    assert_eq!(locator::read_i32_attribute(Some(mesh), "resolution"), Some(128));
    assert_eq!(locator::read_attribute::<String>(Some(mesh), "resolution"), None);
    assert_eq!(locator::read_f64_attribute(Some(mesh), "resolution"), None);

    let results = &children[1];
    let values = locator::dataset(Some(results), "values").unwrap();
    assert_eq!(values.len().unwrap(), 100);
    let data = values.read_f64().unwrap();
    assert_eq!(data[0], 0.0);
    assert!((data[99] - 0.99).abs() < 1e-12);
}

#[test]
fn simulation_paths_resolve_directly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.out");
    assert!(Writer::new().write(&simulation(), path.to_str().unwrap()));

    let file = Container::open(&path, AccessProps::default()).unwrap();
    assert!(file.group("/Simulation/Mesh").is_ok());
    assert_eq!(
        file.dataset("/Simulation/Results/values")
            .unwrap()
            .read_f64()
            .unwrap()
            .len(),
        100
    );
    // The results group carries no attributes of its own.
    let results = file.group("/Simulation/Results").unwrap();
    assert!(results.metadata().unwrap().is_empty());
    assert_eq!(locator::read_i32_attribute(Some(&results), "resolution"), None);
}
