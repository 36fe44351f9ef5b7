//! Persisting trees of domain objects into h5tree containers.
//!
//! Domain types implement [`WriteableNode`] (and optionally
//! [`ReadableNode`]); the [`Writer`] walks a tree depth-first and gives each
//! node its own group. On the way back, the [`locator`] functions answer
//! lookups with `None` or an empty `Vec` and never raise.
//!
//! ```no_run
//! use h5tree::{Container, Group};
//! use h5tree_persist::{locator, writing, WriteableNode, Writer};
//!
//! struct Mesh {
//!     resolution: i32,
//! }
//!
//! impl WriteableNode for Mesh {
//!     fn name(&self) -> &str {
//!         "Mesh"
//!     }
//!
//!     fn write_attributes(&self, container: &Container, group: &Group<'_>) -> bool {
//!         writing::write_i32_attribute(container, group, "resolution", self.resolution)
//!     }
//! }
//!
//! assert!(Writer::new().write(&Mesh { resolution: 128 }, "mesh.h5t"));
//!
//! let file = Container::open("mesh.h5t", Default::default()).unwrap();
//! let root = file.root();
//! let mesh = locator::child_group(Some(&root), "Mesh");
//! assert_eq!(locator::read_i32_attribute(mesh.as_ref(), "resolution"), Some(128));
//! ```

pub mod error;
pub mod generic;
pub mod locator;
pub mod node;
pub mod reader;
pub mod uri;
pub mod writer;
pub mod writing;

pub use error::PersistError;
pub use generic::GenericNode;
pub use node::{ReadableNode, WriteableNode};
pub use reader::Reader;
pub use writer::{Writer, WriterOptions};
