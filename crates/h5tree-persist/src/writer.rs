//! Persisting a tree of [`WriteableNode`]s into a new container.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use h5tree::{AccessProps, Container, Group};
use tracing::{debug, error, info};

use crate::error::PersistError;
use crate::node::WriteableNode;
use crate::uri;

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Create missing parent directories of the destination.
    pub create_parent_dirs: bool,
    /// Access properties for the created container.
    pub access: AccessProps,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            access: AccessProps::default(),
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_parent_dirs(mut self, enabled: bool) -> Self {
        self.create_parent_dirs = enabled;
        self
    }

    pub fn access(mut self, access: AccessProps) -> Self {
        self.access = access;
        self
    }
}

/// Walks writeable trees depth-first and writes one group per node.
///
/// There is no rollback: when a node fails, the write stops, the container
/// is still closed, and whatever was written before the failure stays in
/// the destination file.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    options: WriterOptions,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Write `root` (and its subtree) as a child of `/` in a new container
    /// at `destination` (a path or `file:` URI). An existing file is replaced.
    pub fn write(&self, root: &dyn WriteableNode, destination: &str) -> bool {
        self.write_all(&[root], destination)
    }

    /// Write several top-level trees into one container, in order.
    pub fn write_all(&self, roots: &[&dyn WriteableNode], destination: &str) -> bool {
        let container = match self.open_destination(destination) {
            Ok(c) => c,
            Err(e) => {
                error!(destination, error = %e, "cannot open destination container");
                return false;
            }
        };

        let completed = {
            let top = container.root();
            roots.iter().all(|root| write_tree(&container, &top, *root))
        };

        let path = container.path().display().to_string();
        match container.close() {
            Ok(()) if completed => {
                debug!(path = path.as_str(), trees = roots.len(), "wrote container");
                true
            }
            Ok(()) => {
                error!(path = path.as_str(), "write aborted; container left with a partial tree");
                false
            }
            Err(e) => {
                error!(path = path.as_str(), error = %e, "failed to close container");
                false
            }
        }
    }

    fn open_destination(&self, destination: &str) -> Result<Container, PersistError> {
        let path: PathBuf = uri::resolve(destination)?;
        if self.options.create_parent_dirs {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                    debug!(dir = %parent.display(), "created parent directories");
                }
            }
        }
        if path.exists() {
            info!(path = %path.display(), "overwriting existing container");
        }
        Ok(Container::create(&path, self.options.access.clone())?)
    }
}

/// Pre-order walk with an explicit stack; the first failure aborts.
fn write_tree<'c>(container: &'c Container, parent: &Group<'c>, root: &dyn WriteableNode) -> bool {
    let mut stack: Vec<(&dyn WriteableNode, Rc<Group<'c>>)> = vec![(root, Rc::new(parent.clone()))];

    while let Some((node, parent)) = stack.pop() {
        let Some(group) = node.create_group(container, &parent) else {
            error!(
                parent = parent.full_name(),
                node = node.name(),
                "node did not create its group"
            );
            return false;
        };
        if !node.write_attributes(container, &group) {
            error!(group = group.full_name(), "failed to write attributes");
            return false;
        }
        if !node.write_datasets(container, &group) {
            error!(group = group.full_name(), "failed to write datasets");
            return false;
        }

        let group = Rc::new(group);
        for child in node.children().into_iter().rev() {
            stack.push((child, Rc::clone(&group)));
        }
    }
    true
}
