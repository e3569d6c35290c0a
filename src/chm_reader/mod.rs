mod archive;
#[cfg(test)]
mod archive_tests;
mod file;
mod system;
mod unit;

pub use archive::*;
pub use file::ChmFile;
pub use system::{
    parse_default_topic, parse_default_topic_with, SystemRecord, SystemRecords,
    DEFAULT_TOPIC_CODE, SYSTEM_OBJECT_PATH,
};
pub use unit::{ArchiveReader, EnumerateFilter, Space, UnitInfo};
