//! `ChmReader` is a library that wraps the read functions of chmlib.
//! It provides rustic interface over listing file names, reading given files
//! and finding the home page within Compiled HTML Help (CHM) archives.
//!
//! # Example
//! ```rust,no_run
//! use chm_reader::ChmArchive;
//! use chm_reader::error::Result;
//!
//! fn main() -> Result<()> {
//!     let archive = ChmArchive::open("some_help.chm");
//!     let file_names = archive.list_file_names()?;
//!     let home = archive.home_file();
//!     let content = archive.read_file_to_bytes(&home)?;
//!     println!("files={file_names:?} home={home} size={}", content.len());
//!     Ok(())
//! }
//! ```
//!
//! The `#SYSTEM` parser works on plain bytes and needs no archive:
//! ```rust
//! let stream = [0, 0, 0, 0, 2, 0, 6, 0, b'a', b'.', b'h', b't', b'm', 0];
//! assert_eq!(chm_reader::parse_default_topic(&stream).as_deref(), Some("/a.htm"));
//! ```

mod chm_reader;
mod chmlib;
pub mod error;

pub use crate::chm_reader::*;
pub use error::*;

/// `Decoder` turns raw bytes from the archive into text.
/// Returning `None` signals that the bytes cannot be decoded.
pub type Decoder = fn(&[u8]) -> Option<std::borrow::Cow<'_, str>>;
