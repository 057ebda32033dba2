//! Attribute stores: the syscall-backed store and an in-memory one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::StoreLimits;
use crate::error::{AttrError, AttrResult};
use crate::types::AttrName;

/// Per-target, per-attribute access to an extended-attribute facility.
///
/// Every operation is a synchronous blocking call addressing exactly one
/// name; batching is the caller's concern. Implementations do not cache.
pub trait AttributeStore: Send + Sync {
    /// Resolve a target to the stable form the store will address.
    fn resolve(&self, target: &Path) -> AttrResult<PathBuf> {
        Ok(target.to_path_buf())
    }

    /// Enumerate every attribute name currently on `target`.
    fn list_names(&self, target: &Path) -> AttrResult<Vec<AttrName>>;

    /// Read one attribute's value, up to `max_len` bytes.
    ///
    /// An oversized value fails with [`AttrError::ValueTooLarge`], never
    /// truncated. A zero-length value is a valid result, distinct from
    /// [`AttrError::AttributeNotFound`].
    fn get_value(&self, target: &Path, name: &AttrName, max_len: usize) -> AttrResult<Vec<u8>>;

    /// Create or overwrite one attribute.
    fn set_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()>;

    /// Create one attribute, failing with [`AttrError::DuplicateName`] if
    /// it already exists on the target.
    fn create_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()>;

    /// Remove one attribute.
    fn remove_value(&self, target: &Path, name: &AttrName) -> AttrResult<()>;
}

/// Raw syscall wrappers with a single cross-platform surface.
#[cfg(any(target_os = "linux", target_os = "macos"))]
mod sys {
    use std::ffi::CStr;
    use std::io;

    #[cfg(target_os = "linux")]
    pub const ENOATTR: i32 = libc::ENODATA;
    #[cfg(target_os = "macos")]
    pub const ENOATTR: i32 = libc::ENOATTR;

    fn cvt_size(rc: libc::ssize_t) -> io::Result<usize> {
        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(rc as usize)
        }
    }

    fn cvt(rc: libc::c_int) -> io::Result<()> {
        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn buf_parts(buf: Option<&mut [u8]>) -> (*mut libc::c_void, usize) {
        match buf {
            Some(b) => (b.as_mut_ptr() as *mut libc::c_void, b.len()),
            None => (std::ptr::null_mut(), 0),
        }
    }

    /// `listxattr`; `None` performs the length query.
    pub fn list(path: &CStr, buf: Option<&mut [u8]>) -> io::Result<usize> {
        let (ptr, len) = buf_parts(buf);
        #[cfg(target_os = "linux")]
        let rc = unsafe { libc::listxattr(path.as_ptr(), ptr as *mut libc::c_char, len) };
        #[cfg(target_os = "macos")]
        let rc = unsafe { libc::listxattr(path.as_ptr(), ptr as *mut libc::c_char, len, 0) };
        cvt_size(rc)
    }

    /// `getxattr`; `None` performs the length query.
    pub fn get(path: &CStr, name: &CStr, buf: Option<&mut [u8]>) -> io::Result<usize> {
        let (ptr, len) = buf_parts(buf);
        #[cfg(target_os = "linux")]
        let rc = unsafe { libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, len) };
        #[cfg(target_os = "macos")]
        let rc = unsafe { libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, len, 0, 0) };
        cvt_size(rc)
    }

    /// `setxattr`; pass `create` to fail on an existing name.
    pub fn set(path: &CStr, name: &CStr, value: &[u8], create: bool) -> io::Result<()> {
        let flags = if create { libc::XATTR_CREATE } else { 0 };
        let ptr = value.as_ptr() as *const libc::c_void;
        #[cfg(target_os = "linux")]
        let rc = unsafe { libc::setxattr(path.as_ptr(), name.as_ptr(), ptr, value.len(), flags) };
        #[cfg(target_os = "macos")]
        let rc =
            unsafe { libc::setxattr(path.as_ptr(), name.as_ptr(), ptr, value.len(), 0, flags) };
        cvt(rc)
    }

    /// `removexattr`.
    pub fn remove(path: &CStr, name: &CStr) -> io::Result<()> {
        #[cfg(target_os = "linux")]
        let rc = unsafe { libc::removexattr(path.as_ptr(), name.as_ptr()) };
        #[cfg(target_os = "macos")]
        let rc = unsafe { libc::removexattr(path.as_ptr(), name.as_ptr(), 0) };
        cvt(rc)
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn errno_error(err: std::io::Error, name: &str) -> AttrError {
    let Some(code) = err.raw_os_error() else {
        return AttrError::Io(err);
    };
    match code {
        libc::ENOENT => AttrError::NotFound,
        c if c == sys::ENOATTR => AttrError::AttributeNotFound {
            name: name.to_string(),
        },
        libc::EPERM | libc::EACCES => AttrError::PermissionDenied,
        c if c == libc::ENOTSUP || c == libc::EOPNOTSUPP => AttrError::Unsupported,
        libc::ENOSPC | libc::EDQUOT => AttrError::NoSpace,
        libc::EROFS => AttrError::ReadOnlyFilesystem,
        libc::ENAMETOOLONG => AttrError::InvalidName {
            name: name.to_string(),
        },
        libc::E2BIG => AttrError::ValueTooLarge,
        libc::EEXIST => AttrError::DuplicateName {
            name: name.to_string(),
        },
        _ => AttrError::Io(err),
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn cpath(path: &Path) -> AttrResult<std::ffi::CString> {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        AttrError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path contains NUL",
        ))
    })
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn cname(name: &AttrName) -> std::ffi::CString {
    // AttrName construction rejects interior NUL.
    std::ffi::CString::new(name.as_str()).expect("attribute names are NUL-free")
}

/// Store backed by the platform's extended-attribute syscalls.
///
/// No caching, no parsing beyond the NUL-separated name listing the
/// platform call returns.
#[derive(Debug, Default)]
pub struct XattrStore {
    pub limits: StoreLimits,
}

impl XattrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: StoreLimits) -> Self {
        Self { limits }
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl AttributeStore for XattrStore {
    fn resolve(&self, target: &Path) -> AttrResult<PathBuf> {
        std::fs::canonicalize(target).map_err(|e| errno_error(e, ""))
    }

    fn list_names(&self, target: &Path) -> AttrResult<Vec<AttrName>> {
        let path = cpath(target)?;
        let buf = loop {
            let len = sys::list(&path, None).map_err(|e| errno_error(e, ""))?;
            if len == 0 {
                break Vec::new();
            }
            let mut buf = vec![0u8; len];
            match sys::list(&path, Some(&mut buf)) {
                Ok(n) => {
                    buf.truncate(n);
                    break buf;
                }
                // The list grew between the two calls; size it again.
                Err(e) if e.raw_os_error() == Some(libc::ERANGE) => continue,
                Err(e) => return Err(errno_error(e, "")),
            }
        };

        let mut names = Vec::new();
        for raw in buf.split(|&b| b == 0).filter(|chunk| !chunk.is_empty()) {
            let name = std::str::from_utf8(raw).map_err(|_| AttrError::InvalidName {
                name: String::from_utf8_lossy(raw).into_owned(),
            })?;
            names.push(AttrName::new(name)?);
        }
        Ok(names)
    }

    fn get_value(&self, target: &Path, name: &AttrName, max_len: usize) -> AttrResult<Vec<u8>> {
        let path = cpath(target)?;
        let cname = cname(name);
        loop {
            let len = sys::get(&path, &cname, None).map_err(|e| errno_error(e, name.as_str()))?;
            if len > max_len {
                return Err(AttrError::ValueTooLarge);
            }
            if len == 0 {
                return Ok(Vec::new());
            }
            let mut buf = vec![0u8; len];
            match sys::get(&path, &cname, Some(&mut buf)) {
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(buf);
                }
                // The value grew between the two calls; size it again.
                Err(e) if e.raw_os_error() == Some(libc::ERANGE) => continue,
                Err(e) => return Err(errno_error(e, name.as_str())),
            }
        }
    }

    fn set_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()> {
        if value.len() > self.limits.max_value_len {
            return Err(AttrError::ValueTooLarge);
        }
        let path = cpath(target)?;
        sys::set(&path, &cname(name), value, false).map_err(|e| errno_error(e, name.as_str()))
    }

    fn create_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()> {
        if value.len() > self.limits.max_value_len {
            return Err(AttrError::ValueTooLarge);
        }
        let path = cpath(target)?;
        sys::set(&path, &cname(name), value, true).map_err(|e| errno_error(e, name.as_str()))
    }

    fn remove_value(&self, target: &Path, name: &AttrName) -> AttrResult<()> {
        let path = cpath(target)?;
        sys::remove(&path, &cname(name)).map_err(|e| errno_error(e, name.as_str()))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl AttributeStore for XattrStore {
    fn list_names(&self, _target: &Path) -> AttrResult<Vec<AttrName>> {
        Err(AttrError::Unsupported)
    }

    fn get_value(&self, _target: &Path, _name: &AttrName, _max_len: usize) -> AttrResult<Vec<u8>> {
        Err(AttrError::Unsupported)
    }

    fn set_value(&self, _target: &Path, _name: &AttrName, _value: &[u8]) -> AttrResult<()> {
        Err(AttrError::Unsupported)
    }

    fn create_value(&self, _target: &Path, _name: &AttrName, _value: &[u8]) -> AttrResult<()> {
        Err(AttrError::Unsupported)
    }

    fn remove_value(&self, _target: &Path, _name: &AttrName) -> AttrResult<()> {
        Err(AttrError::Unsupported)
    }
}

/// In-memory store for tests and non-filesystem hosts.
///
/// Targets are registered explicitly; attribute order is insertion
/// order, standing in for a filesystem's enumeration order. Writes under
/// a privileged name prefix are denied, mirroring how a `trusted.` write
/// fails without elevated rights.
pub struct MemStore {
    targets: Mutex<HashMap<PathBuf, Vec<(AttrName, Vec<u8>)>>>,
    privileged: Vec<String>,
    limits: StoreLimits,
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_privileged(vec!["trusted.".to_string(), "security.".to_string()])
    }

    /// A store that denies writes under the given name prefixes.
    pub fn with_privileged(privileged: Vec<String>) -> Self {
        Self {
            targets: Mutex::new(HashMap::new()),
            privileged,
            limits: StoreLimits::default(),
        }
    }

    /// Register a target with no attributes.
    pub fn add_target(&self, target: impl Into<PathBuf>) {
        self.targets
            .lock()
            .unwrap()
            .entry(target.into())
            .or_default();
    }

    /// Register a target seeded with attributes, in order.
    pub fn seed(&self, target: impl Into<PathBuf>, attrs: Vec<(AttrName, Vec<u8>)>) {
        self.targets.lock().unwrap().insert(target.into(), attrs);
    }

    fn check_writable(&self, name: &AttrName) -> AttrResult<()> {
        if self
            .privileged
            .iter()
            .any(|p| name.as_str().starts_with(p.as_str()))
        {
            return Err(AttrError::PermissionDenied);
        }
        Ok(())
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeStore for MemStore {
    fn list_names(&self, target: &Path) -> AttrResult<Vec<AttrName>> {
        let targets = self.targets.lock().unwrap();
        let attrs = targets.get(target).ok_or(AttrError::NotFound)?;
        Ok(attrs.iter().map(|(name, _)| name.clone()).collect())
    }

    fn get_value(&self, target: &Path, name: &AttrName, max_len: usize) -> AttrResult<Vec<u8>> {
        let targets = self.targets.lock().unwrap();
        let attrs = targets.get(target).ok_or(AttrError::NotFound)?;
        let value = attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| AttrError::AttributeNotFound {
                name: name.to_string(),
            })?;
        if value.len() > max_len {
            return Err(AttrError::ValueTooLarge);
        }
        Ok(value.clone())
    }

    fn set_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()> {
        self.check_writable(name)?;
        if value.len() > self.limits.max_value_len {
            return Err(AttrError::ValueTooLarge);
        }
        let mut targets = self.targets.lock().unwrap();
        let attrs = targets.get_mut(target).ok_or(AttrError::NotFound)?;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_vec(),
            None => attrs.push((name.clone(), value.to_vec())),
        }
        Ok(())
    }

    fn create_value(&self, target: &Path, name: &AttrName, value: &[u8]) -> AttrResult<()> {
        self.check_writable(name)?;
        if value.len() > self.limits.max_value_len {
            return Err(AttrError::ValueTooLarge);
        }
        let mut targets = self.targets.lock().unwrap();
        let attrs = targets.get_mut(target).ok_or(AttrError::NotFound)?;
        if attrs.iter().any(|(n, _)| n == name) {
            return Err(AttrError::DuplicateName {
                name: name.to_string(),
            });
        }
        attrs.push((name.clone(), value.to_vec()));
        Ok(())
    }

    fn remove_value(&self, target: &Path, name: &AttrName) -> AttrResult<()> {
        let mut targets = self.targets.lock().unwrap();
        let attrs = targets.get_mut(target).ok_or(AttrError::NotFound)?;
        match attrs.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                attrs.remove(idx);
                Ok(())
            }
            None => Err(AttrError::AttributeNotFound {
                name: name.to_string(),
            }),
        }
    }
}
