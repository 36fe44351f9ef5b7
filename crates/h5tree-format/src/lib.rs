//! Binary format of h5tree containers.
//!
//! A container is a superblock followed by object headers (one per group or
//! dataset) and contiguous raw-data blocks. This crate parses and encodes
//! those structures; it knows nothing about files or handles.
//!
//! The layout borrows HDF5's vocabulary (superblock, object headers, typed
//! messages) but is not HDF5: files start with the `\x89H5T` signature
//! rather than HDF5's `\x89HDF`, and the structures are far simpler, so
//! HDF5 libraries and tools such as `h5dump` cannot read them and this
//! crate cannot read HDF5 files.

mod bytes;

pub mod attribute;
pub mod checksum;
pub mod data_layout;
pub mod dataspace;
pub mod datatype;
pub mod error;
pub mod filter_pipeline;
pub mod link;
pub mod message_type;
pub mod object_header;
pub mod signature;
pub mod superblock;

pub use attribute::AttributeMessage;
pub use data_layout::DataLayout;
pub use dataspace::Dataspace;
pub use datatype::{Datatype, DatatypeClass};
pub use error::FormatError;
pub use filter_pipeline::FilterPipeline;
pub use link::{validate_link_name, LinkMessage};
pub use message_type::MessageType;
pub use object_header::{HeaderMessage, ObjectHeader, ObjectKind};
pub use superblock::{Superblock, SUPERBLOCK_SIZE};
