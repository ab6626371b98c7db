//! 错误类型定义
//!
//! 块缓存区分两类错误：
//!
//! - [`Error`]：可恢复错误，例如配置无效或块设备报告的 I/O 错误，
//!   通过 [`Result`] 向上传递。
//! - [`Fatal`]：不可恢复的契约违反（缓存耗尽、未持锁写回/释放等）。
//!   这类错误只能经由 [`fatal`] 终止系统，不存在转换为 [`Error`] 的路径，
//!   上层也不会为它们编写重试逻辑。

use core::fmt;

use crate::types::BufKey;

/// 块缓存操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误
    Io,
    /// 无效参数
    InvalidInput,
    /// 权限错误（例如写只读设备）
    PermissionDenied,
    /// 不支持的操作
    Unsupported,
    /// 设备忙
    Busy,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

/// 不可恢复的契约违反
///
/// 出现即说明缓存容量配置过小或调用方存在 bug，必须立即暴露。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// 没有 `refcnt == 0` 的槽位可供回收
    NoBuffers {
        /// 缓存容量
        nbuf: usize,
    },
    /// 在未持有内容锁的情况下调用了需要持锁的操作
    NotHolding {
        /// 违规的操作名（`bwrite` / `brelse`）
        op: &'static str,
    },
    /// 句柄不属于当前缓存
    ForeignBuffer {
        /// 违规的操作名
        op: &'static str,
    },
    /// 引用计数为零的槽位内容锁仍被占用，缓存元数据已不一致
    SlotBusy {
        /// 槽位下标
        index: usize,
    },
    /// 引用计数被减到负数（释放或 unpin 次数多于获取次数）
    RefcntUnderflow {
        /// 槽位当前绑定的块
        key: Option<BufKey>,
    },
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fatal::NoBuffers { nbuf } => write!(f, "bget: no buffers (all {} referenced)", nbuf),
            Fatal::NotHolding { op } => write!(f, "{}: content lock not held", op),
            Fatal::ForeignBuffer { op } => write!(f, "{}: buffer belongs to another cache", op),
            Fatal::SlotBusy { index } => write!(f, "bget: free slot {} still locked", index),
            Fatal::RefcntUnderflow { key: Some(key) } => {
                write!(f, "refcnt underflow on block {}", key)
            }
            Fatal::RefcntUnderflow { key: None } => write!(f, "refcnt underflow on unbound slot"),
        }
    }
}

/// 记录诊断信息并终止
///
/// 内核以 `panic = "abort"` 构建时会直接停机。
#[cold]
#[track_caller]
pub fn fatal(reason: Fatal) -> ! {
    log::error!("[BCACHE] fatal: {}", reason);
    panic!("{}", reason)
}
