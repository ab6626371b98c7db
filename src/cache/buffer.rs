//! 缓存块结构
//!
//! 一个槽位由两部分组成：结构锁保护的元数据（绑定的块、引用计数、
//! LRU 位置，见 `block_cache`）和内容锁保护的 [`BufData`]。
//! 这里定义后者，以及调用方手里的两种句柄：
//!
//! - [`BufGuard`]：已获取且独占加锁的槽位，drop 即释放（`brelse`）
//! - [`BufPin`]：只防止槽位被回收的引用，不持有内容锁

use core::fmt;
use core::mem::ManuallyDrop;

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

use super::Bcache;
use crate::block::BlockDevice;
use crate::consts::BSIZE;
use crate::error::{fatal, Fatal, Result};
use crate::sync::SleepLockGuard;
use crate::types::{BlockNo, BufKey, DevId};

bitflags! {
    /// 缓存块标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufFlags: u8 {
        /// 数据已从设备读入（有效）
        const VALID = 0x01;
        /// 自上次写回后经 `data_mut` 修改过
        ///
        /// 仅作记录，缓存不会据此调度写回。
        const DIRTY = 0x02;
    }
}

/// 内容锁保护的槽位状态
pub struct BufData {
    /// 块状态标志
    pub flags: BufFlags,
    /// 块数据
    pub data: [u8; BSIZE],
}

impl BufData {
    pub(crate) const fn new() -> Self {
        Self {
            flags: BufFlags::empty(),
            data: [0; BSIZE],
        }
    }
}

impl fmt::Debug for BufData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufData")
            .field("flags", &self.flags)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// 已获取并独占加锁的缓存块
///
/// 由 [`Bcache::read_block`] 返回。持有期间其他线程对同一块的获取会在
/// 内容锁上挂起；drop（或 [`BufGuard::release`]）时先释放内容锁，
/// 再在结构锁下递减引用计数，计数归零则移到 LRU 链表的最近使用端。
pub struct BufGuard<'a, D: BlockDevice> {
    pub(super) cache: &'a Bcache<D>,
    pub(super) index: usize,
    pub(super) key: BufKey,
    pub(super) data: ManuallyDrop<SleepLockGuard<'a, BufData>>,
}

impl<'a, D: BlockDevice> BufGuard<'a, D> {
    pub(super) fn new(
        cache: &'a Bcache<D>,
        index: usize,
        key: BufKey,
        data: SleepLockGuard<'a, BufData>,
    ) -> Self {
        Self {
            cache,
            index,
            key,
            data: ManuallyDrop::new(data),
        }
    }

    /// 绑定的块
    pub fn key(&self) -> BufKey {
        self.key
    }

    /// 设备号
    pub fn dev(&self) -> DevId {
        self.key.dev
    }

    /// 块号
    pub fn blockno(&self) -> BlockNo {
        self.key.blockno
    }

    /// 槽位下标
    pub fn index(&self) -> usize {
        self.index
    }

    /// 块状态标志
    pub fn flags(&self) -> BufFlags {
        self.data.flags
    }

    /// 数据是否有效
    pub fn is_valid(&self) -> bool {
        self.data.flags.contains(BufFlags::VALID)
    }

    /// 自上次写回后是否被修改
    pub fn is_dirty(&self) -> bool {
        self.data.flags.contains(BufFlags::DIRTY)
    }

    /// 只读访问块数据
    pub fn data(&self) -> &[u8; BSIZE] {
        &self.data.data
    }

    /// 可写访问块数据，同时标记为脏
    pub fn data_mut(&mut self) -> &mut [u8; BSIZE] {
        self.data.flags.insert(BufFlags::DIRTY);
        &mut self.data.data
    }

    pub(super) fn inner_mut(&mut self) -> &mut BufData {
        &mut self.data
    }

    pub(super) fn holding(&self) -> bool {
        self.data.sleep_lock().holding()
    }

    /// 以小端序读取 `offset` 处的 u16
    pub fn read_u16(&self, offset: usize) -> u16 {
        LittleEndian::read_u16(&self.data()[offset..offset + 2])
    }

    /// 以小端序读取 `offset` 处的 u32
    pub fn read_u32(&self, offset: usize) -> u32 {
        LittleEndian::read_u32(&self.data()[offset..offset + 4])
    }

    /// 以小端序读取 `offset` 处的 u64
    pub fn read_u64(&self, offset: usize) -> u64 {
        LittleEndian::read_u64(&self.data()[offset..offset + 8])
    }

    /// 以小端序写入 u16
    pub fn write_u16(&mut self, offset: usize, value: u16) {
        LittleEndian::write_u16(&mut self.data_mut()[offset..offset + 2], value);
    }

    /// 以小端序写入 u32
    pub fn write_u32(&mut self, offset: usize, value: u32) {
        LittleEndian::write_u32(&mut self.data_mut()[offset..offset + 4], value);
    }

    /// 以小端序写入 u64
    pub fn write_u64(&mut self, offset: usize, value: u64) {
        LittleEndian::write_u64(&mut self.data_mut()[offset..offset + 8], value);
    }

    /// 把块数据写回设备，见 [`Bcache::write_back`]
    pub fn write_back(&mut self) -> Result<()> {
        let cache = self.cache;
        cache.write_back(self)
    }

    /// 防止该块被回收，见 [`Bcache::pin`]
    pub fn pin(&self) -> BufPin<'a, D> {
        self.cache.pin(self)
    }

    /// 释放该块，等价于 drop
    pub fn release(self) {
        drop(self);
    }
}

impl<D: BlockDevice> fmt::Debug for BufGuard<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufGuard")
            .field("key", &self.key)
            .field("index", &self.index)
            .field("flags", &self.data.flags)
            .finish()
    }
}

impl<D: BlockDevice> Drop for BufGuard<'_, D> {
    fn drop(&mut self) {
        if !self.holding() {
            fatal(Fatal::NotHolding { op: "brelse" });
        }
        // 先放内容锁，等待同一块的线程可以继续
        unsafe { ManuallyDrop::drop(&mut self.data) };
        self.cache.release_slot(self.index);
    }
}

/// 防回收引用
///
/// 持有期间槽位的引用计数大于零，不会被重新绑定到其他块，数据保持驻留。
/// 它**不**持有内容锁，不串行化对数据的访问；需要读写数据时仍要通过
/// [`Bcache::read_block`] 获取。典型用户是日志层：事务提交后到 checkpoint
/// 之前让块留在缓存中。
///
/// `clone` 会再 pin 一次；drop 或 [`BufPin::unpin`] 减少一次。
pub struct BufPin<'a, D: BlockDevice> {
    pub(super) cache: &'a Bcache<D>,
    pub(super) index: usize,
    pub(super) key: BufKey,
}

impl<D: BlockDevice> BufPin<'_, D> {
    /// 被 pin 的块
    pub fn key(&self) -> BufKey {
        self.key
    }

    /// 槽位下标
    pub fn index(&self) -> usize {
        self.index
    }

    /// 解除 pin，等价于 drop
    pub fn unpin(self) {
        drop(self);
    }
}

impl<D: BlockDevice> Clone for BufPin<'_, D> {
    fn clone(&self) -> Self {
        self.cache.pin_slot(self.index);
        Self {
            cache: self.cache,
            index: self.index,
            key: self.key,
        }
    }
}

impl<D: BlockDevice> fmt::Debug for BufPin<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufPin")
            .field("key", &self.key)
            .field("index", &self.index)
            .finish()
    }
}

impl<D: BlockDevice> Drop for BufPin<'_, D> {
    fn drop(&mut self) {
        self.cache.unpin_slot(self.index);
    }
}
