//! Module turning a directory of JSON fixtures into ordered source files.

use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;

mod filename;


pub use filename::FileName;

/// A single data record, i.e. one JSON object.
pub type Record = Map<String, Value>;

/// Read access to the directory holding the fixtures.
pub trait SourceDirectory {
    /// Names (not paths) of all entries in `dir`.
    fn list_entries(&self, dir: &Path) -> Result<Vec<String>, Error>;

    /// Reads and parses the JSON document at `path`.
    fn read_record(&self, path: &Path) -> Result<Value, Error>;
}

impl<D: SourceDirectory + ?Sized> SourceDirectory for &D {
    fn list_entries(&self, dir: &Path) -> Result<Vec<String>, Error> {
        (**self).list_entries(dir)
    }

    fn read_record(&self, path: &Path) -> Result<Value, Error> {
        (**self).read_record(path)
    }
}

/// [`SourceDirectory`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectory;

impl SourceDirectory for FsDirectory {
    fn list_entries(&self, dir: &Path) -> Result<Vec<String>, Error> {
        let io_error = |source: std::io::Error| Error::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        // read_dir order is platform dependent
        names.sort();
        Ok(names)
    }

    fn read_record(&self, path: &Path) -> Result<Value, Error> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Content of a source file: either one record or a list of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Single(Record),
    Many(Vec<Record>),
}

impl Content {
    /// Accepts an object or an array of objects; anything else is rejected.
    pub(crate) fn from_json(value: Value, path: &Path) -> Result<Self, Error> {
        let invalid = || Error::InvalidContent {
            path: path.to_path_buf(),
        };
        match value {
            Value::Object(record) => Ok(Content::Single(record)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    _ => Err(invalid()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Content::Many),
            _ => Err(invalid()),
        }
    }

    /// Flattens the content into a list of records, a single record becoming a list of one.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Content::Single(record) => vec![record],
            Content::Many(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Content::Single(_) => 1,
            Content::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A loaded fixture file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    name: FileName,
    content: Content,
}

impl SourceFile {
    pub fn new(name: FileName, content: Content) -> Self {
        Self { name, content }
    }

    pub fn name(&self) -> &FileName {
        &self.name
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn into_parts(self) -> (FileName, Content) {
        (self.name, self.content)
    }
}

/// Parses every entry's name and loads its content from `dir`.
///
/// Fails on the first entry whose name or content is invalid. The returned files are in listing
/// order.
pub(crate) fn load_source_files(
    directory: &impl SourceDirectory,
    dir: &Path,
    entries: &[String],
) -> Result<Vec<SourceFile>, Error> {
    entries
        .iter()
        .map(|entry| load_source_file(directory, dir, entry))
        .collect()
}

fn load_source_file(
    directory: &impl SourceDirectory,
    dir: &Path,
    entry: &str,
) -> Result<SourceFile, Error> {
    let name = FileName::parse(entry)?;
    let path: PathBuf = dir.join(entry);
    let value = directory.read_record(&path)?;
    let content = Content::from_json(value, &path)?;
    debug!(file = %name, records = content.len(), "loaded source file");
    Ok(SourceFile::new(name, content))
}

/// Orders files from the highest to the lowest `order`. Files with equal order keep their relative
/// position.
pub(crate) fn sort_descending(files: &mut [SourceFile]) {
    files.sort_by_key(|file| Reverse(file.name.order()));
}
