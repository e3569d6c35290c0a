#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_uchar, c_void};

type LONGINT64 = i64;
type LONGUINT64 = u64;

pub(crate) const CHM_MAX_PATHLEN: usize = 512;

pub(crate) const CHM_UNCOMPRESSED: c_int = 0;
pub(crate) const CHM_COMPRESSED: c_int = 1;

pub(crate) const CHM_PARAM_MAX_BLOCKS_CACHED: c_int = 0;

pub(crate) const CHM_RESOLVE_SUCCESS: c_int = 0;

pub(crate) const CHM_ENUMERATE_NORMAL: c_int = 1;
pub(crate) const CHM_ENUMERATE_META: c_int = 2;
pub(crate) const CHM_ENUMERATE_SPECIAL: c_int = 4;
pub(crate) const CHM_ENUMERATE_FILES: c_int = 8;
pub(crate) const CHM_ENUMERATE_DIRS: c_int = 16;
pub(crate) const CHM_ENUMERATE_ALL: c_int = 31;

pub(crate) const CHM_ENUMERATOR_CONTINUE: c_int = 1;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub(crate) struct chmFile {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub(crate) struct chmUnitInfo {
    pub(crate) start: LONGUINT64,
    pub(crate) length: LONGUINT64,
    pub(crate) space: c_int,
    pub(crate) flags: c_int,
    pub(crate) path: [c_char; CHM_MAX_PATHLEN + 1],
}

pub(crate) type CHM_ENUMERATOR = Option<
    unsafe extern "C" fn(h: *mut chmFile, ui: *mut chmUnitInfo, context: *mut c_void) -> c_int,
>;

unsafe extern "C" {
    pub(crate) fn chm_open(filename: *const c_char) -> *mut chmFile;
    pub(crate) fn chm_close(h: *mut chmFile);
    pub(crate) fn chm_set_param(h: *mut chmFile, param_type: c_int, param_val: c_int);
    pub(crate) fn chm_resolve_object(
        h: *mut chmFile,
        obj_path: *const c_char,
        ui: *mut chmUnitInfo,
    ) -> c_int;
    pub(crate) fn chm_retrieve_object(
        h: *mut chmFile,
        ui: *mut chmUnitInfo,
        buf: *mut c_uchar,
        addr: LONGUINT64,
        len: LONGINT64,
    ) -> LONGINT64;
    pub(crate) fn chm_enumerate(
        h: *mut chmFile,
        what: c_int,
        e: CHM_ENUMERATOR,
        context: *mut c_void,
    ) -> c_int;
}
