//! 块缓存模块
//!
//! 内核中所有上层（文件、inode、日志）读写磁盘块的唯一同步点。
//!
//! # 主要组件
//!
//! - [`Bcache`] - 固定容量的槽位池，按最近释放顺序回收
//! - [`BufGuard`] - 已获取并独占加锁的缓存块
//! - [`BufPin`] - 只阻止回收、不持有内容锁的引用
//! - [`BufFlags`] - 缓存块状态标志
//! - [`BcacheStats`] - 缓存统计信息
//!
//! # 与 xv6 bio 接口的对应关系
//!
//! | xv6 C            | bcache_core                         |
//! |------------------|-------------------------------------|
//! | `struct buf`     | 槽位：`BufMeta` + [`BufData`]       |
//! | `struct bcache`  | [`Bcache`]                          |
//! | `binit()`        | [`Bcache::new`] / [`Bcache::with_config`] |
//! | `bget()`         | `Bcache::bget`（私有）              |
//! | `bread()`        | [`Bcache::read_block`]              |
//! | `bwrite()`       | [`Bcache::write_back`] / [`BufGuard::write_back`] |
//! | `brelse()`       | [`Bcache::release`] / drop [`BufGuard`] |
//! | `bpin()`         | [`Bcache::pin`] / [`BufGuard::pin`] |
//! | `bunpin()`       | [`Bcache::unpin`] / drop [`BufPin`] |
//!
//! # 锁
//!
//! 结构锁（[`SpinLock`](crate::sync::SpinLock)）保护绑定、引用计数和 LRU 顺序；
//! 每个槽位的内容锁（[`SleepLock`](crate::sync::SleepLock)）保护有效位和数据。
//! 结构锁从不跨越 I/O，也从不在持有时阻塞等待内容锁。
//!
//! # 分区
//!
//! 目前所有槽位共用一把结构锁。按 `(dev, blockno)` 哈希把槽位分到多个
//! 独立的桶里可以降低竞争，但每个块必须确定地路由到唯一的桶，
//! 且不允许跨桶借用槽位，否则“一个块至多绑定一个槽位”无法成立。

mod block_cache;
mod buffer;

pub use block_cache::{Bcache, BcacheStats};
pub use buffer::{BufData, BufFlags, BufGuard, BufPin};
