//! 点击搜索计数的持久化
//!
//! 记录上一次执行点击搜索时的应用版本号与累计搜索次数，
//! 用于在版本不变时限制 `POST /clicks/find` 的调用次数。

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, UrlynkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    pub last_app_version: Option<i64>,
    pub click_search_count: u32,
}

pub trait PreferenceStore: Send + Sync {
    fn snapshot(&self) -> Result<PreferenceSnapshot>;
    fn record_click_search(&self, version_code: i64, count: u32) -> Result<()>;
}

/// 进程内存储，进程退出后丢失
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<PreferenceSnapshot>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: PreferenceSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn snapshot(&self) -> Result<PreferenceSnapshot> {
        Ok(*self.inner.lock())
    }

    fn record_click_search(&self, version_code: i64, count: u32) -> Result<()> {
        *self.inner.lock() = PreferenceSnapshot {
            last_app_version: Some(version_code),
            click_search_count: count,
        };
        Ok(())
    }
}

/// JSON 文件存储，每次记录都整体重写文件
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    inner: Mutex<PreferenceSnapshot>,
}

impl FilePreferenceStore {
    /// 打开存储文件；文件不存在时从空记录开始
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                UrlynkError::file_operation(format!(
                    "Failed to read preferences {}: {}",
                    path.display(),
                    e
                ))
            })?;
            serde_json::from_str(&content)?
        } else {
            debug!("Preferences file {} not found, starting empty", path.display());
            PreferenceSnapshot::default()
        };

        Ok(Self {
            path,
            inner: Mutex::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn snapshot(&self) -> Result<PreferenceSnapshot> {
        Ok(*self.inner.lock())
    }

    fn record_click_search(&self, version_code: i64, count: u32) -> Result<()> {
        let mut guard = self.inner.lock();
        let next = PreferenceSnapshot {
            last_app_version: Some(version_code),
            click_search_count: count,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&next)?;
        std::fs::write(&self.path, content).map_err(|e| {
            UrlynkError::file_operation(format!(
                "Failed to write preferences {}: {}",
                self.path.display(),
                e
            ))
        })?;

        *guard = next;
        Ok(())
    }
}
