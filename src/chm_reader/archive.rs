use super::file::ChmFile;
use super::system::{decode_lossy, parse_default_topic_with, SYSTEM_OBJECT_PATH};
use super::unit::{ArchiveReader, EnumerateFilter};
use crate::error::Result;
use crate::Decoder;
use log::{error, info};
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `normalize_object_path` makes sure an internal path starts with `/`,
/// which is what chmlib expects when resolving objects.
pub fn normalize_object_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// `read_object` resolves an internal path and returns the object's content.
pub fn read_object<R: ArchiveReader + ?Sized>(reader: &R, inner_path: &str) -> Result<Vec<u8>> {
    let inner_path = normalize_object_path(inner_path);
    let unit = reader.resolve(&inner_path).inspect_err(|error| {
        error!(r#"failed to resolve "{inner_path}": {error}"#);
    })?;
    reader.retrieve(&unit)
}

/// `file_names` lists the paths of the units accepted by `filter`,
/// skipping units with an empty path.
pub fn file_names<R: ArchiveReader + ?Sized>(
    reader: &R,
    filter: EnumerateFilter,
) -> Result<Vec<String>> {
    Ok(reader
        .enumerate(filter)?
        .into_iter()
        .map(|unit| unit.path)
        .filter(|path| !path.is_empty())
        .collect())
}

/// `default_topic` reads the default topic out of the `#SYSTEM` object.
/// Any failure on the way is logged and reported as `None`.
pub fn default_topic<R: ArchiveReader + ?Sized>(reader: &R, decode: Decoder) -> Option<String> {
    let unit = match reader.resolve(SYSTEM_OBJECT_PATH) {
        Ok(unit) => unit,
        Err(error) => {
            error!("failed to resolve {SYSTEM_OBJECT_PATH}: {error}");
            return None;
        }
    };
    match reader.retrieve(&unit) {
        Ok(content) => parse_default_topic_with(&content, decode),
        Err(error) => {
            error!("failed to retrieve {SYSTEM_OBJECT_PATH}: {error}");
            None
        }
    }
}

/// `ChmArchive` represents a CHM file which can be processed.
/// Every operation opens the file, does its work and closes it again.
pub struct ChmArchive {
    /// `cache_blocks` is the number of decompressed blocks chmlib keeps in memory.
    /// `None` leaves the library default in place.
    cache_blocks: Option<i32>,
    /// `filter` selects the units reported by `list_file_names`.
    filter: EnumerateFilter,
    /// `decoder` turns the raw default topic bytes into a string.
    decoder: Decoder,
    /// `file_path` is the path to the target archive.
    file_path: PathBuf,
}

impl ChmArchive {
    /// `open` creates a default `ChmArchive` configuration from the given path.
    ///
    /// # Note:
    /// It handles the path lazily. So no error will occur until the path is used
    /// and proved to be problematic.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        ChmArchive {
            cache_blocks: None,
            filter: EnumerateFilter::default(),
            decoder: decode_lossy,
            file_path: path.as_ref().into(),
        }
    }

    /// `cache_blocks` sets how many decompressed blocks are cached while reading.
    pub fn cache_blocks(&mut self, blocks: i32) -> &mut Self {
        self.cache_blocks = Some(blocks);
        self
    }

    /// `reset_cache_blocks` goes back to the chmlib default cache size.
    pub fn reset_cache_blocks(&mut self) -> &mut Self {
        self.cache_blocks = None;
        self
    }

    /// `enumerate_filter` sets which units are listed by `list_file_names`.
    /// Defaults to files of every kind, see `EnumerateFilter::default`.
    pub fn enumerate_filter(&mut self, filter: EnumerateFilter) -> &mut Self {
        self.filter = filter;
        self
    }

    /// `decoder` sets the decoder used for the default topic.
    /// Defaults to lossy UTF-8.
    pub fn decoder(&mut self, decoder: Decoder) -> &mut Self {
        self.decoder = decoder;
        self
    }
}

// Consumers
impl ChmArchive {
    /// `read_file` writes the content of an internal file into the given output.
    /// It also returns the total number of bytes written.
    pub fn read_file<W: Write>(&self, inner_path: &str, mut output: W) -> Result<usize> {
        info!(r#"ChmArchive::read_file(inner_path: "{inner_path}", output: _)"#);
        let content = read_object(&self.open_file()?, inner_path)?;
        output.write_all(&content)?;
        Ok(content.len())
    }

    /// `read_file_to_bytes` returns the content of an internal file.
    pub fn read_file_to_bytes(&self, inner_path: &str) -> Result<Vec<u8>> {
        info!(r#"ChmArchive::read_file_to_bytes(inner_path: "{inner_path}")"#);
        read_object(&self.open_file()?, inner_path)
    }

    /// `list_file_names` returns the paths of all files stored in the archive.
    pub fn list_file_names(&self) -> Result<Vec<String>> {
        info!("ChmArchive::list_file_names()");
        file_names(&self.open_file()?, self.filter)
    }

    /// `default_topic` returns the home page declared in the archive, if any.
    pub fn default_topic(&self) -> Option<String> {
        info!("ChmArchive::default_topic()");
        match self.open_file() {
            Ok(file) => default_topic(&file, self.decoder),
            Err(error) => {
                error!("failed to open {}: {error}", self.file_path.display());
                None
            }
        }
    }

    /// `home_file` returns the home page path, or an empty string when the
    /// archive cannot be read or declares no home page.
    pub fn home_file(&self) -> String {
        self.default_topic().unwrap_or_default()
    }
}

// accessor
impl ChmArchive {
    fn open_file(&self) -> Result<ChmFile> {
        let mut file = ChmFile::open(&self.file_path)?;
        if let Some(blocks) = self.cache_blocks {
            file.set_cache_blocks(blocks);
        }
        Ok(file)
    }

    /// `path` returns the archive file path.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
