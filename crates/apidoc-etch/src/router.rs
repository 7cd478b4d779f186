//! Output routing
//!
//! Every rendered entity is appended to a destination stream identified by a
//! relative key such as `frontend/operations/getschema.md`. A stream is opened
//! once per key, receives its front matter on open and stays open until the
//! pass finishes, so several entities can share one file.

use crate::classification::Category;
use crate::diagnostics::{DocError, DocResult};
use crate::node::Audience;
use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

/// Directory of operation documents within an audience tree
pub const OPERATIONS_DIR: &str = "operations";

/// Directory of configuration documents within an audience tree
pub const CONFIGURATION_DIR: &str = "configuration";

/// File granularity of operation documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLevel {
    /// One file per category; operations are anchors inside it
    Category,
    /// One file per operation inside a category directory
    Operation,
    /// One file per operation in a single directory
    #[default]
    Flat,
}

impl FileLevel {
    /// Parse a command-line switch (`-cat`, `--op`, ...)
    pub fn from_flag(flag: &str) -> Option<Self> {
        flag.trim_start_matches('-').parse().ok()
    }
}

impl FromStr for FileLevel {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cat" | "category" => Ok(FileLevel::Category),
            "op" | "operation" => Ok(FileLevel::Operation),
            "flat" => Ok(FileLevel::Flat),
            other => Err(DocError::config(format!("Unknown file level '{}'", other))),
        }
    }
}

impl fmt::Display for FileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileLevel::Category => "category",
            FileLevel::Operation => "operation",
            FileLevel::Flat => "flat",
        };
        f.write_str(name)
    }
}

/// Source of destination streams
pub trait StreamFactory {
    /// Create (truncate) the stream for `key`
    fn create(&mut self, key: &str) -> DocResult<Box<dyn Write>>;
}

/// Writes streams as files below a root directory
#[derive(Debug, Clone)]
pub struct FsStreamFactory {
    root: PathBuf,
}

impl FsStreamFactory {
    /// Create a factory rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StreamFactory for FsStreamFactory {
    fn create(&mut self, key: &str) -> DocResult<Box<dyn Write>> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::trace!(path = %path.display(), "creating output file");
        Ok(Box::new(BufWriter::new(File::create(&path)?)))
    }
}

type MemoryFiles = Rc<RefCell<IndexMap<String, Vec<u8>>>>;

/// Keeps streams in memory; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStreamFactory {
    files: MemoryFiles,
}

impl MemoryStreamFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written to `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.files
            .borrow()
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Keys in creation order
    pub fn keys(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Number of streams created
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    /// Whether no stream was created
    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl StreamFactory for MemoryStreamFactory {
    fn create(&mut self, key: &str) -> DocResult<Box<dyn Write>> {
        self.files.borrow_mut().insert(key.to_string(), Vec::new());
        Ok(Box::new(MemoryStream {
            key: key.to_string(),
            files: Rc::clone(&self.files),
        }))
    }
}

struct MemoryStream {
    key: String,
    files: MemoryFiles,
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.key.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps one open stream per destination key for the duration of a pass
pub struct OutputRouter<'f> {
    factory: &'f mut dyn StreamFactory,
    streams: IndexMap<String, Box<dyn Write>>,
}

impl<'f> OutputRouter<'f> {
    /// Create a router over a stream factory
    pub fn new(factory: &'f mut dyn StreamFactory) -> Self {
        Self {
            factory,
            streams: IndexMap::new(),
        }
    }

    /// Stream for `key`; a new stream starts with `head`
    pub fn stream(&mut self, key: &str, head: &str) -> DocResult<&mut dyn Write> {
        if !self.streams.contains_key(key) {
            let mut stream = self.factory.create(key)?;
            stream.write_all(head.as_bytes())?;
            self.streams.insert(key.to_string(), stream);
        }
        match self.streams.get_mut(key) {
            Some(stream) => Ok(stream.as_mut()),
            None => Err(DocError::render(format!("Stream '{}' is not open", key))),
        }
    }

    /// Write a complete document under `key`, replacing nothing already open
    pub fn write_document(&mut self, key: &str, content: &str) -> DocResult<()> {
        self.stream(key, "")?.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Whether a stream for `key` is open
    pub fn is_open(&self, key: &str) -> bool {
        self.streams.contains_key(key)
    }

    /// Keys in opening order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Flush and close every stream, returning their keys
    pub fn finish(&mut self) -> DocResult<Vec<String>> {
        let mut keys = Vec::with_capacity(self.streams.len());
        for (key, mut stream) in self.streams.drain(..) {
            stream.flush()?;
            keys.push(key);
        }
        Ok(keys)
    }
}

/// Key below the audience tree: `frontend/operations/index.md`
pub fn audience_key(audience: Audience, dir: &str, key: &str) -> String {
    format!("{}/{}/{}", audience.dir_name(), dir, key)
}

/// File of an operation, relative to the operations directory
pub fn operation_key(level: FileLevel, op: &OperationDef) -> String {
    match level {
        FileLevel::Category => format!("{}.md", op.category_slug),
        FileLevel::Operation => format!("{}/{}.md", op.category_slug, op.slug),
        FileLevel::Flat => format!("{}.md", op.slug),
    }
}

/// Front-matter title of an operation file
pub fn operation_title(level: FileLevel, op: &OperationDef) -> &str {
    match level {
        FileLevel::Category => &op.category,
        FileLevel::Operation | FileLevel::Flat => &op.operation_name,
    }
}

/// Link of an operation relative to the operation link base
pub fn operation_link(level: FileLevel, op: &OperationDef) -> String {
    match level {
        FileLevel::Category => format!("{}#{}", op.category_slug, op.slug),
        FileLevel::Operation => format!("{}/{}", op.category_slug, op.slug),
        FileLevel::Flat => op.slug.clone(),
    }
}

/// Files of an options class, one per category, relative to the configuration directory
pub fn options_keys(oc: &OptionsClassDef, categories: &[&Category]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(categories.len());
    for category in categories {
        let key = format!("{}/{}.md", category.key, oc.slug);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Root aggregation file of a category, relative to the configuration directory
pub fn category_root_key(category: &Category) -> String {
    format!("{}.md", category.key)
}
