use super::unit::{ArchiveReader, EnumerateFilter, UnitInfo};
use crate::chmlib;
use crate::error::{path_does_not_exist, Error, Result};
use libc::{c_int, c_void};
use log::{debug, error, info, warn};
use std::ffi::CString;
use std::path::Path;

/// `ChmFile` is an open handle to a CHM archive backed by chmlib.
/// The handle is closed when `ChmFile` is dropped.
pub struct ChmFile {
    handle: *mut chmlib::chmFile,
}

unsafe impl Send for ChmFile {}

impl ChmFile {
    pub fn open<P: AsRef<Path>>(archive_path: P) -> Result<Self> {
        let archive_path = archive_path.as_ref();
        info!(
            r#"ChmFile::open(archive_path: "{}")"#,
            archive_path.display()
        );
        if !archive_path.exists() {
            error!(r#"path "{}" does not exist"#, archive_path.display());
            return Err(path_does_not_exist(
                archive_path.to_string_lossy().to_string(),
            ));
        }
        let c_path = CString::new(archive_path.to_str().ok_or(Error::PathNotUtf8)?)?;
        let handle = unsafe { chmlib::chm_open(c_path.as_ptr()) };
        if handle.is_null() {
            error!(r#"chm_open failed for "{}""#, archive_path.display());
            return Err(Error::Open(archive_path.to_string_lossy().to_string()));
        }
        debug!("chm_open: success");
        Ok(ChmFile { handle })
    }

    /// `set_cache_blocks` sets how many decompressed blocks chmlib keeps cached.
    pub fn set_cache_blocks(&mut self, blocks: i32) {
        info!("ChmFile::set_cache_blocks(blocks: {blocks})");
        unsafe {
            chmlib::chm_set_param(
                self.handle,
                chmlib::CHM_PARAM_MAX_BLOCKS_CACHED,
                blocks,
            )
        }
    }
}

impl ArchiveReader for ChmFile {
    fn resolve(&self, object_path: &str) -> Result<UnitInfo> {
        info!(r#"ChmFile::resolve(object_path: "{object_path}")"#);
        let c_path = CString::new(object_path)?;
        let mut raw = std::mem::MaybeUninit::<chmlib::chmUnitInfo>::zeroed();
        let status =
            unsafe { chmlib::chm_resolve_object(self.handle, c_path.as_ptr(), raw.as_mut_ptr()) };
        if status != chmlib::CHM_RESOLVE_SUCCESS {
            debug!("chm_resolve_object: {object_path} not found");
            return Err(Error::ObjectNotFound(object_path.to_string()));
        }
        let raw = unsafe { raw.assume_init() };
        Ok(UnitInfo::from_raw(&raw))
    }

    fn retrieve(&self, unit: &UnitInfo) -> Result<Vec<u8>> {
        info!(r#"ChmFile::retrieve(unit: "{}")"#, unit.path);
        let length =
            usize::try_from(unit.length).map_err(|_| Error::ObjectTooLarge(unit.length))?;
        let request =
            i64::try_from(unit.length).map_err(|_| Error::ObjectTooLarge(unit.length))?;
        let mut buffer = vec![0u8; length];
        let mut raw = unit.to_raw();
        let read = unsafe {
            chmlib::chm_retrieve_object(self.handle, &mut raw, buffer.as_mut_ptr(), 0, request)
        };
        if read < 0 {
            debug!("chm_retrieve_object: returned {read} for {}", unit.path);
        }
        let read = usize::try_from(read).unwrap_or(0).min(length);
        if read == 0 && length != 0 {
            warn!("chm_retrieve_object: read 0 bytes from {}", unit.path);
        } else {
            debug!("chm_retrieve_object: read {read} of {length} bytes");
        }
        buffer.truncate(read);
        Ok(buffer)
    }

    fn enumerate(&self, filter: EnumerateFilter) -> Result<Vec<UnitInfo>> {
        info!("ChmFile::enumerate(filter: {:#x})", filter.bits());
        let mut units = Vec::<UnitInfo>::new();
        let status = unsafe {
            chmlib::chm_enumerate(
                self.handle,
                filter.bits(),
                Some(collect_unit),
                &mut units as *mut Vec<UnitInfo> as *mut c_void,
            )
        };
        if status == 0 {
            error!("chm_enumerate failed after {} units", units.len());
            return Err(Error::Enumeration);
        }
        debug!("chm_enumerate: {} units", units.len());
        Ok(units)
    }
}

unsafe extern "C" fn collect_unit(
    _handle: *mut chmlib::chmFile,
    ui: *mut chmlib::chmUnitInfo,
    context: *mut c_void,
) -> c_int {
    // `context` is the `Vec<UnitInfo>` handed to chm_enumerate above.
    let units = unsafe { &mut *(context as *mut Vec<UnitInfo>) };
    if let Some(ui) = unsafe { ui.as_ref() } {
        units.push(UnitInfo::from_raw(ui));
    }
    chmlib::CHM_ENUMERATOR_CONTINUE
}

impl Drop for ChmFile {
    fn drop(&mut self) {
        debug!("ChmFile::drop()");
        unsafe { chmlib::chm_close(self.handle) }
    }
}
