use crate::chmlib;
use crate::error::Result;
use libc::{c_char, c_int};
use std::ops::BitOr;

/// `Space` tells which section of the archive holds a unit's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Uncompressed,
    Compressed,
}

/// `UnitInfo` describes a single object stored in a CHM archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInfo {
    /// Offset of the content within its space.
    pub start: u64,
    /// Length of the content in bytes.
    pub length: u64,
    pub space: Space,
    /// `EnumerateFilter` bits describing the kind of the unit.
    pub flags: i32,
    /// Path of the unit inside the archive, always starting with `/`.
    pub path: String,
}

impl UnitInfo {
    pub(crate) fn from_raw(raw: &chmlib::chmUnitInfo) -> Self {
        let path = raw
            .path
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect::<Vec<_>>();
        UnitInfo {
            start: raw.start,
            length: raw.length,
            space: match raw.space {
                chmlib::CHM_COMPRESSED => Space::Compressed,
                _ => Space::Uncompressed,
            },
            flags: raw.flags,
            path: String::from_utf8_lossy(&path).into_owned(),
        }
    }

    pub(crate) fn to_raw(&self) -> chmlib::chmUnitInfo {
        let mut path = [0 as c_char; chmlib::CHM_MAX_PATHLEN + 1];
        for (dst, &src) in path
            .iter_mut()
            .zip(self.path.as_bytes().iter().take(chmlib::CHM_MAX_PATHLEN))
        {
            *dst = src as c_char;
        }
        chmlib::chmUnitInfo {
            start: self.start,
            length: self.length,
            space: match self.space {
                Space::Compressed => chmlib::CHM_COMPRESSED,
                Space::Uncompressed => chmlib::CHM_UNCOMPRESSED,
            },
            flags: self.flags,
            path,
        }
    }
}

/// `EnumerateFilter` selects which kinds of units an enumeration visits.
/// Filters can be combined with `|`.
///
/// chmlib only visits units matching one of the kind bits (`NORMAL`, `META`,
/// `SPECIAL`), so a filter such as `FILES` alone selects nothing.
/// The type bits (`FILES`, `DIRS`) narrow the selection further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerateFilter(c_int);

impl EnumerateFilter {
    pub const NORMAL: Self = Self(chmlib::CHM_ENUMERATE_NORMAL);
    pub const META: Self = Self(chmlib::CHM_ENUMERATE_META);
    pub const SPECIAL: Self = Self(chmlib::CHM_ENUMERATE_SPECIAL);
    pub const FILES: Self = Self(chmlib::CHM_ENUMERATE_FILES);
    pub const DIRS: Self = Self(chmlib::CHM_ENUMERATE_DIRS);
    pub const ALL: Self = Self(chmlib::CHM_ENUMERATE_ALL);

    pub fn bits(self) -> i32 {
        self.0
    }
}

/// Every file of any kind.
impl Default for EnumerateFilter {
    fn default() -> Self {
        Self::NORMAL | Self::META | Self::SPECIAL | Self::FILES
    }
}

impl BitOr for EnumerateFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `ArchiveReader` is the set of primitives every CHM backend provides.
/// Opening is left to the implementor's constructor,
/// and closing happens when the reader is dropped.
pub trait ArchiveReader {
    /// `resolve` looks up an object by its internal path, e.g. `/#SYSTEM`.
    fn resolve(&self, object_path: &str) -> Result<UnitInfo>;

    /// `retrieve` reads the content of a resolved unit.
    /// It returns at most `unit.length` bytes; a short read is not an error.
    fn retrieve(&self, unit: &UnitInfo) -> Result<Vec<u8>>;

    /// `enumerate` lists the units accepted by the filter.
    fn enumerate(&self, filter: EnumerateFilter) -> Result<Vec<UnitInfo>>;
}
