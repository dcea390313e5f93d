//! In-memory [`Filesystem`] fake for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::{Filesystem, Ownership};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    File(String),
    Dir,
    Symlink(PathBuf),
}

/// Flat map of absolute paths to nodes. Parents must exist before children.
#[derive(Debug, Default)]
pub(crate) struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    owners: RefCell<BTreeMap<PathBuf, Ownership>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, path.display().to_string())
}

fn already_exists(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, path.display().to_string())
}

impl MemoryFs {
    pub(crate) fn new() -> Self {
        let fs = Self::default();
        fs.nodes.borrow_mut().insert(PathBuf::from("/"), Node::Dir);
        fs
    }

    pub(crate) fn add_dir(&self, path: impl AsRef<Path>) {
        self.create_dir(path.as_ref()).unwrap();
    }

    pub(crate) fn add_file(&self, path: impl AsRef<Path>, contents: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir(parent).unwrap();
        }
        self.write(path, contents).unwrap();
    }

    pub(crate) fn node(&self, path: impl AsRef<Path>) -> Option<Node> {
        self.nodes.borrow().get(path.as_ref()).cloned()
    }

    pub(crate) fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.node(path) {
            Some(Node::File(contents)) => Some(contents),
            _ => None,
        }
    }

    pub(crate) fn owner(&self, path: impl AsRef<Path>) -> Option<Ownership> {
        self.owners.borrow().get(path.as_ref()).copied()
    }

    /// Every path currently present, for before/after comparisons.
    pub(crate) fn snapshot(&self) -> BTreeMap<PathBuf, Node> {
        self.nodes.borrow().clone()
    }

    fn require_parent_dir(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if self.is_dir(parent) => Ok(()),
            Some(parent) => Err(not_found(parent)),
            None => Ok(()),
        }
    }
}

impl Filesystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.node(path), Some(Node::Symlink(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        match self.node(path) {
            Some(Node::Dir) => true,
            Some(Node::Symlink(target)) => self.is_dir(&target),
            _ => false,
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.node(path) {
            Some(Node::File(contents)) => Ok(contents),
            Some(Node::Symlink(target)) => self.read_to_string(&target),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.require_parent_dir(path)?;
        if self.is_dir(path) {
            return Err(already_exists(path));
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(contents.to_string()));
        Ok(())
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.write(path, contents)
    }

    fn create_dir(&self, path: &Path) -> io::Result<bool> {
        match self.node(path) {
            Some(Node::Dir) => return Ok(false),
            Some(_) => return Err(already_exists(path)),
            None => {}
        }
        if let Some(parent) = path.parent() {
            self.create_dir(parent)?;
        }
        self.nodes.borrow_mut().insert(path.to_path_buf(), Node::Dir);
        Ok(true)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.require_parent_dir(link)?;
        if self.exists(link) {
            return Err(already_exists(link));
        }
        self.nodes
            .borrow_mut()
            .insert(link.to_path_buf(), Node::Symlink(target.to_path_buf()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match self.node(path) {
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            )),
            Some(_) => {
                self.nodes.borrow_mut().remove(path);
                self.owners.borrow_mut().remove(path);
                Ok(())
            }
            None => Err(not_found(path)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        if !matches!(self.node(path), Some(Node::Dir)) {
            return Err(not_found(path));
        }
        self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
        self.owners.borrow_mut().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        if !self.is_dir(path) {
            return Err(not_found(path));
        }
        Ok(self
            .nodes
            .borrow()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn set_owner(&self, path: &Path, owner: Ownership) -> io::Result<()> {
        if !self.exists(path) {
            return Err(not_found(path));
        }
        self.owners.borrow_mut().insert(path.to_path_buf(), owner);
        Ok(())
    }
}
