//! bcache_core: 内核块缓存
//!
//! 上层（文件、inode、日志）读写定长磁盘块的唯一入口：
//! - 在内存中保留有界数量的最近使用块，避免重复的设备 I/O
//! - 并发读写**同一块**的线程看到唯一的、串行化的块内容
//! - 在固定容量下按最近释放顺序确定地回收槽位
//!
//! # 示例
//!
//! ```rust,ignore
//! use bcache_core::{Bcache, BcacheConfig, BlockDevice, Result};
//!
//! fn bump_counter<D: BlockDevice>(cache: &Bcache<D>) -> Result<()> {
//!     let mut buf = cache.read_block(1, 2)?;
//!     let v = buf.read_u32(0);
//!     buf.write_u32(0, v + 1);
//!     buf.write_back()?;
//!     Ok(())
//! } // buf 在这里释放
//!
//! let cache = Bcache::with_config(my_disk, BcacheConfig::with_nbuf(64))?;
//! bump_counter(&cache)?;
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义（可恢复错误与致命错误）
//! - [`block`] - 块设备抽象
//! - [`cache`] - 块缓存
//! - [`sync`] - 结构锁与内容锁
//! - [`config`] - 缓存配置
//! - [`consts`] - 常量定义
//! - [`types`] - 块标识

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

/// 错误处理
pub mod error;

/// 块设备抽象
pub mod block;

/// 常量定义
pub mod consts;

/// 块标识
pub mod types;

/// 缓存配置
pub mod config;

/// 两级锁
pub mod sync;

/// 块缓存
pub mod cache;

// 错误处理
pub use error::{Error, ErrorKind, Fatal, Result};

// 块设备
pub use block::{BlockDevice, RamDisk};

// 配置与常量
pub use config::BcacheConfig;
pub use consts::{BSIZE, NBUF};

// 块标识
pub use types::{BlockNo, BufKey, DevId};

// 缓存
pub use cache::{Bcache, BcacheStats, BufData, BufFlags, BufGuard, BufPin};
