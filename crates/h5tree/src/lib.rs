//! Hierarchical binary containers: groups, scalar attributes and datasets.
//!
//! This crate provides the handle API on top of `h5tree-format`.
//!
//! # Writing
//!
//! ```no_run
//! use h5tree::{AccessProps, Container};
//!
//! let file = Container::create("run.h5t", AccessProps::default()).unwrap();
//! let mesh = file.create_group("Mesh", &file.root()).unwrap();
//! file.write_attribute(&mesh, "resolution", 128).unwrap();
//! file.create_dataset(&mesh, "nodes", vec![0.0f64, 0.5, 1.0]).unwrap();
//! file.close().unwrap();
//! ```
//!
//! # Reading
//!
//! ```no_run
//! use h5tree::{AccessProps, Container};
//!
//! let file = Container::open("run.h5t", AccessProps::default()).unwrap();
//! let root = file.root();
//! for info in file.member_info_all(&root).unwrap() {
//!     println!("{} ({:?})", info.name, info.kind);
//! }
//! let nodes = file.dataset("/Mesh/nodes").unwrap().read_f64().unwrap();
//! ```

pub mod container;
pub mod dataset;
pub mod error;
mod flush;
pub mod group;
pub mod member;
pub mod props;
mod record;
mod storage;
pub mod types;

pub use container::{Container, Mode};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use group::Group;
pub use member::{Member, MemberInfo, ObjectId};
pub use props::{AccessProps, DatasetProps, DEFAULT_MAX_MEMBERS};
pub use types::{AttrScalar, AttrType, AttrValue, Attribute, DType, DatasetData};

pub use h5tree_format::object_header::ObjectKind;
