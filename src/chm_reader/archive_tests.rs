use super::*;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::cell::Cell;

const fn help_archive() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/test_resources/test.chm")
}

const fn missing_archive() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/test_resources/missing.chm")
}

fn decode_utf8(bytes: &[u8]) -> Option<Cow<'_, str>> {
    Some(String::from_utf8_lossy(bytes))
}

/// Flags chmlib assigns to a unit while enumerating.
fn unit_flags(path: &str) -> i32 {
    let mut flags = if path.ends_with('/') {
        EnumerateFilter::DIRS
    } else {
        EnumerateFilter::FILES
    };
    flags = flags
        | match path.as_bytes() {
            [b'/', b'#' | b'$', ..] => EnumerateFilter::SPECIAL,
            [b'/', ..] => EnumerateFilter::NORMAL,
            _ => EnumerateFilter::META,
        };
    flags.bits()
}

/// Selection rule of `chm_enumerate`: a kind bit must match, and the type
/// bits, when present, must match too.
fn chmlib_selects(filter: EnumerateFilter, flags: i32) -> bool {
    let kind = filter.bits() & 0x07;
    let ty = filter.bits() & 0xf8;
    kind & flags != 0 && (ty == 0 || ty & flags != 0)
}

/// In-memory stand-in for a chmlib handle.
struct MemoryArchive {
    /// `(path, content, bytes actually readable)`
    objects: Vec<(&'static str, Vec<u8>, usize)>,
    retrieved: Cell<usize>,
}

impl MemoryArchive {
    fn new() -> Self {
        MemoryArchive {
            objects: Vec::new(),
            retrieved: Cell::new(0),
        }
    }

    fn with(self, path: &'static str, content: &[u8]) -> Self {
        self.with_short_read(path, content, content.len())
    }

    fn with_short_read(mut self, path: &'static str, content: &[u8], readable: usize) -> Self {
        self.objects.push((path, content.to_vec(), readable));
        self
    }
}

impl ArchiveReader for MemoryArchive {
    fn resolve(&self, object_path: &str) -> Result<UnitInfo> {
        self.objects
            .iter()
            .position(|(path, ..)| *path == object_path)
            .map(|index| {
                let (path, content, _) = &self.objects[index];
                UnitInfo {
                    start: index as u64,
                    length: content.len() as u64,
                    space: Space::Uncompressed,
                    flags: 0,
                    path: path.to_string(),
                }
            })
            .ok_or_else(|| Error::ObjectNotFound(object_path.to_string()))
    }

    fn retrieve(&self, unit: &UnitInfo) -> Result<Vec<u8>> {
        self.retrieved.set(self.retrieved.get() + 1);
        let (_, content, readable) = &self.objects[unit.start as usize];
        Ok(content[..*readable].to_vec())
    }

    fn enumerate(&self, filter: EnumerateFilter) -> Result<Vec<UnitInfo>> {
        let mut units = Vec::new();
        for (path, ..) in &self.objects {
            let mut unit = self.resolve(path)?;
            unit.flags = if path.is_empty() { 0 } else { unit_flags(path) };
            if chmlib_selects(filter, unit.flags) || path.is_empty() {
                units.push(unit);
            }
        }
        Ok(units)
    }
}

fn system_stream(topic: &[u8]) -> Vec<u8> {
    let mut stream = vec![3, 0, 0, 0];
    stream.extend_from_slice(&[4, 0, 2, 0, 0x09, 0x04]);
    stream.extend_from_slice(&2_u16.to_le_bytes());
    stream.extend_from_slice(&(topic.len() as u16).to_le_bytes());
    stream.extend_from_slice(topic);
    stream
}

fn memory_archive() -> MemoryArchive {
    MemoryArchive::new()
        .with("/", b"")
        .with("/index.htm", b"<html>index</html>")
        .with("/images/logo.png", b"\x89PNG")
        .with("/#SYSTEM", &system_stream(b"index.htm\0"))
        .with("::DataSpace/NameList", b"\x3c\x00")
        .with("", b"")
}

#[test]
fn test_normalize_object_path() {
    assert_eq!(normalize_object_path("/index.htm"), "/index.htm");
    assert_eq!(normalize_object_path("index.htm"), "/index.htm");
    assert_eq!(normalize_object_path(""), "/");
    assert!(matches!(
        normalize_object_path("/a/b.htm"),
        Cow::Borrowed("/a/b.htm")
    ));
}

#[test]
fn test_read_object() -> Result<()> {
    let archive = memory_archive();
    assert_eq!(read_object(&archive, "/index.htm")?, b"<html>index</html>");
    assert_eq!(read_object(&archive, "images/logo.png")?, b"\x89PNG");
    Ok(())
}

#[test]
fn test_read_missing_object() {
    let archive = memory_archive();
    match read_object(&archive, "missing.htm") {
        Err(Error::ObjectNotFound(path)) => assert_eq!(path, "/missing.htm"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(archive.retrieved.get(), 0);
}

#[test]
fn test_short_read_is_not_an_error() -> Result<()> {
    let archive = MemoryArchive::new().with_short_read("/big.htm", b"0123456789", 3);
    assert_eq!(read_object(&archive, "/big.htm")?, b"012");
    let archive = MemoryArchive::new().with_short_read("/big.htm", b"0123456789", 0);
    assert!(read_object(&archive, "/big.htm")?.is_empty());
    Ok(())
}

#[test]
fn test_file_names() -> Result<()> {
    let names = file_names(&memory_archive(), EnumerateFilter::default())?;
    assert_eq!(
        names,
        [
            "/index.htm",
            "/images/logo.png",
            "/#SYSTEM",
            "::DataSpace/NameList"
        ]
    );
    Ok(())
}

#[test]
fn test_file_names_with_filter() -> Result<()> {
    let archive = memory_archive();
    let names = file_names(&archive, EnumerateFilter::NORMAL | EnumerateFilter::FILES)?;
    assert_eq!(names, ["/index.htm", "/images/logo.png"]);
    let names = file_names(&archive, EnumerateFilter::NORMAL | EnumerateFilter::DIRS)?;
    assert_eq!(names, ["/"]);
    Ok(())
}

#[test]
fn test_file_names_without_kind_bit() -> Result<()> {
    let archive = memory_archive();
    assert!(file_names(&archive, EnumerateFilter::FILES)?.is_empty());
    assert!(file_names(&archive, EnumerateFilter::DIRS)?.is_empty());
    Ok(())
}

#[test]
fn test_default_topic() {
    assert_eq!(
        default_topic(&memory_archive(), decode_utf8).as_deref(),
        Some("/index.htm")
    );
}

#[test]
fn test_default_topic_without_system() {
    let archive = MemoryArchive::new().with("/index.htm", b"index");
    assert_eq!(default_topic(&archive, decode_utf8), None);
}

#[test]
fn test_default_topic_from_empty_read() {
    let archive = MemoryArchive::new().with_short_read("/#SYSTEM", &system_stream(b"a.htm\0"), 0);
    assert_eq!(default_topic(&archive, decode_utf8), None);
}

#[test]
fn test_default_topic_from_partial_read() {
    let stream = system_stream(b"a.htm\0");
    let archive = MemoryArchive::new().with_short_read("/#SYSTEM", &stream, stream.len() - 1);
    assert_eq!(default_topic(&archive, decode_utf8), None);
}

#[test]
fn test_empty_default_topic() {
    let archive = MemoryArchive::new().with("/#SYSTEM", &system_stream(b"\0"));
    assert_eq!(default_topic(&archive, decode_utf8).as_deref(), Some(""));
}

#[test]
fn test_padded_default_topic_resolves() -> Result<()> {
    let archive = MemoryArchive::new()
        .with("/index.htm", b"<html>index</html>")
        .with("/#SYSTEM", &system_stream(b"index.htm\0\0\0"));
    let home = default_topic(&archive, decode_utf8).unwrap_or_default();
    assert_eq!(home, "/index.htm");
    assert_eq!(read_object(&archive, &home)?, b"<html>index</html>");
    Ok(())
}

#[test]
fn test_list_file_names() -> Result<()> {
    let expected = [
        "/#SYSTEM",
        "/images/logo.gif",
        "/index.htm",
        "/intro.htm",
        "::DataSpace/NameList",
    ];
    assert_eq!(ChmArchive::open(help_archive()).list_file_names()?, expected);
    Ok(())
}

#[test]
fn test_list_file_names_with_filter() -> Result<()> {
    let mut archive = ChmArchive::open(help_archive());
    archive.enumerate_filter(EnumerateFilter::NORMAL | EnumerateFilter::FILES);
    assert_eq!(
        archive.list_file_names()?,
        ["/images/logo.gif", "/index.htm", "/intro.htm"]
    );
    archive.enumerate_filter(EnumerateFilter::NORMAL | EnumerateFilter::DIRS);
    assert_eq!(archive.list_file_names()?, ["/", "/images/"]);
    archive.enumerate_filter(EnumerateFilter::FILES);
    assert!(archive.list_file_names()?.is_empty());
    Ok(())
}

#[test]
fn test_read_file_to_bytes() -> Result<()> {
    let archive = ChmArchive::open(help_archive());
    assert_eq!(
        archive.read_file_to_bytes("/index.htm")?,
        b"<html><body>index</body></html>\n"
    );
    assert_eq!(
        archive.read_file_to_bytes("images/logo.gif")?,
        b"GIF89a\x01\x00\x01\x00\x00\x00\x00;"
    );
    Ok(())
}

#[test]
fn test_read_file() -> Result<()> {
    let mut archive = ChmArchive::open(help_archive());
    archive.cache_blocks(2);
    let mut content = vec![];
    let written = archive.read_file("intro.htm", &mut content)?;
    assert_eq!(content, b"<html><body>intro</body></html>\n");
    assert_eq!(written, content.len());
    Ok(())
}

#[test]
fn test_read_missing_file() {
    match ChmArchive::open(help_archive()).read_file_to_bytes("/missing.htm") {
        Err(Error::ObjectNotFound(path)) => assert_eq!(path, "/missing.htm"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_home_file() -> Result<()> {
    let archive = ChmArchive::open(help_archive());
    let home = archive.home_file();
    assert_eq!(home, "/intro.htm");
    assert_eq!(
        archive.read_file_to_bytes(&home)?,
        b"<html><body>intro</body></html>\n"
    );
    Ok(())
}

#[test]
fn test_missing_archive_home_file() {
    let archive = ChmArchive::open(missing_archive());
    assert_eq!(archive.home_file(), "");
    assert_eq!(archive.default_topic(), None);
}

#[test]
fn test_not_a_chm_home_file() {
    let archive = ChmArchive::open(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
    assert_eq!(archive.home_file(), "");
}

#[test]
fn test_missing_archive_list_file_names() {
    match ChmArchive::open(missing_archive()).list_file_names() {
        Err(Error::Io(error)) => assert_eq!(error.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
#[should_panic]
fn test_missing_archive_read_file() {
    ChmArchive::open(missing_archive())
        .read_file_to_bytes("/index.htm")
        .unwrap();
}

#[test]
fn test_archive_configuration() {
    let mut archive = ChmArchive::open("help.chm");
    archive
        .cache_blocks(16)
        .enumerate_filter(EnumerateFilter::ALL)
        .decoder(decode_utf8)
        .reset_cache_blocks();
    assert_eq!(archive.path(), std::path::Path::new("help.chm"));
}
