//! 块设备接口

use alloc::sync::Arc;

use crate::error::Result;
use crate::types::BufKey;

/// 块设备接口
///
/// 缓存通过它读写物理块，对调用方而言是同步的：返回时数据已经有效
/// 或已经写入。实现需要自行处理内部并发（驱动通常有自己的锁），
/// 因为不同块的 I/O 可能在不同线程上同时发起。
///
/// # 示例
///
/// ```rust,ignore
/// use bcache_core::{BlockDevice, BufKey, Result};
///
/// struct VirtioDisk {
///     // ...
/// }
///
/// impl BlockDevice for VirtioDisk {
///     fn read_block(&self, key: BufKey, buf: &mut [u8]) -> Result<()> {
///         // 发起读请求并等待完成
///         Ok(())
///     }
///
///     fn write_block(&self, key: BufKey, buf: &[u8]) -> Result<()> {
///         // 发起写请求并等待完成
///         Ok(())
///     }
/// }
/// ```
pub trait BlockDevice: Send + Sync {
    /// 读取一个块
    ///
    /// # 参数
    ///
    /// * `key` - 设备号与块号
    /// * `buf` - 目标缓冲区，长度为 [`BSIZE`](crate::consts::BSIZE)
    fn read_block(&self, key: BufKey, buf: &mut [u8]) -> Result<()>;

    /// 写入一个块
    ///
    /// # 参数
    ///
    /// * `key` - 设备号与块号
    /// * `buf` - 源缓冲区，长度为 [`BSIZE`](crate::consts::BSIZE)
    fn write_block(&self, key: BufKey, buf: &[u8]) -> Result<()>;

    /// 是否只读
    fn is_read_only(&self) -> bool {
        false
    }
}

impl<T: BlockDevice + ?Sized> BlockDevice for &T {
    fn read_block(&self, key: BufKey, buf: &mut [u8]) -> Result<()> {
        (**self).read_block(key, buf)
    }

    fn write_block(&self, key: BufKey, buf: &[u8]) -> Result<()> {
        (**self).write_block(key, buf)
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}

impl<T: BlockDevice + ?Sized> BlockDevice for Arc<T> {
    fn read_block(&self, key: BufKey, buf: &mut [u8]) -> Result<()> {
        (**self).read_block(key, buf)
    }

    fn write_block(&self, key: BufKey, buf: &[u8]) -> Result<()> {
        (**self).write_block(key, buf)
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}
