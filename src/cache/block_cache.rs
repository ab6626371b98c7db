//! 块缓存实现
//!
//! # 结构
//!
//! ```text
//! struct Bcache {
//!     device: D,                            // 后备块设备
//!     ctrl:   SpinLock<BufLru>,             // 结构锁：绑定、引用计数、LRU 顺序
//!     bufs:   Box<[SleepLock<BufData>]>,    // 每个槽位一把内容锁
//! }
//!
//! struct BufLru {
//!     meta:  Vec<BufMeta>,                  // 按槽位下标索引
//!     order: LruCache<usize, ()>,           // 槽位下标的最近释放顺序
//! }
//! ```
//!
//! 槽位在构造时一次性分配，之后只会被重新绑定，不会销毁。
//! LRU 链表里只存槽位下标，数据和元数据都归缓存所有，没有互相指向的指针。
//!
//! # 协议
//!
//! - 查找（`bget`）只在结构锁内修改元数据，不调整 LRU 顺序；
//!   命中时放掉结构锁再阻塞在内容锁上。
//! - 只有释放会把槽位移到最近使用端，且只在引用计数归零时移动。
//! - 引用计数大于零的槽位不会被回收，`pin` 借此让块驻留。

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use core::ptr;
use core::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;

use super::buffer::{BufData, BufFlags, BufGuard, BufPin};
use crate::block::BlockDevice;
use crate::config::BcacheConfig;
use crate::consts::NBUF;
use crate::error::{fatal, Fatal, Result};
use crate::sync::{SleepLock, SpinLock};
use crate::types::{BlockNo, BufKey, DevId};

const DEFAULT_NBUF: NonZeroUsize = match NonZeroUsize::new(NBUF) {
    Some(nbuf) => nbuf,
    None => panic!("NBUF must be non-zero"),
};

/// 缓存统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BcacheStats {
    /// 缓存命中次数
    pub hits: u64,
    /// 缓存未命中次数
    pub misses: u64,
    /// 回收已绑定槽位的次数
    pub evictions: u64,
    /// 设备读次数
    pub disk_reads: u64,
    /// 设备写次数
    pub disk_writes: u64,
}

impl BcacheStats {
    /// 计算命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct StatCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    disk_reads: AtomicU64,
    disk_writes: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> BcacheStats {
        BcacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            disk_reads: self.disk_reads.load(Ordering::Relaxed),
            disk_writes: self.disk_writes.load(Ordering::Relaxed),
        }
    }
}

/// 结构锁保护的槽位元数据
#[derive(Debug, Clone, Copy, Default)]
struct BufMeta {
    /// 绑定的块，从未使用过的槽位为 None
    key: Option<BufKey>,
    /// 引用计数：持有者 + pin
    refcnt: u32,
}

/// 槽位元数据与最近释放顺序
struct BufLru {
    meta: Vec<BufMeta>,
    /// `iter()` 从最近使用到最久未使用
    order: LruCache<usize, ()>,
}

impl BufLru {
    /// 初始顺序：槽位 `nbuf - 1` 最近，槽位 0 最久
    fn new(nbuf: NonZeroUsize) -> Self {
        let mut order = LruCache::new(nbuf);
        for index in 0..nbuf.get() {
            order.put(index, ());
        }
        Self {
            meta: vec![BufMeta::default(); nbuf.get()],
            order,
        }
    }

    /// 从最近使用端查找已绑定 `key` 的槽位，命中则增加引用计数
    fn find_cached(&mut self, key: BufKey) -> Option<usize> {
        let index = self
            .order
            .iter()
            .map(|(&index, _)| index)
            .find(|&index| self.meta[index].key == Some(key))?;
        self.meta[index].refcnt += 1;
        Some(index)
    }

    /// 从最久未使用端回收第一个无引用的槽位并绑定到 `key`
    ///
    /// 返回槽位下标和它之前绑定的块。
    fn recycle(&mut self, key: BufKey) -> Option<(usize, Option<BufKey>)> {
        let index = self
            .order
            .iter()
            .rev()
            .map(|(&index, _)| index)
            .find(|&index| self.meta[index].refcnt == 0)?;
        let meta = &mut self.meta[index];
        let old = meta.key.replace(key);
        meta.refcnt = 1;
        Some((index, old))
    }

    /// 减少引用计数，归零时移到最近使用端
    fn release(&mut self, index: usize) -> bool {
        let meta = &mut self.meta[index];
        if meta.refcnt == 0 {
            fatal(Fatal::RefcntUnderflow { key: meta.key });
        }
        meta.refcnt -= 1;
        if meta.refcnt == 0 {
            self.order.promote(&index);
            true
        } else {
            false
        }
    }

    fn pin(&mut self, index: usize) {
        self.meta[index].refcnt += 1;
    }

    /// 只减引用计数，不调整顺序
    fn unpin(&mut self, index: usize) {
        let meta = &mut self.meta[index];
        if meta.refcnt == 0 {
            fatal(Fatal::RefcntUnderflow { key: meta.key });
        }
        meta.refcnt -= 1;
    }

    fn slot_of(&self, key: BufKey) -> Option<&BufMeta> {
        self.meta.iter().find(|meta| meta.key == Some(key))
    }
}

/// 块缓存
///
/// 固定容量的槽位池。同一时刻一个块至多绑定一个槽位，
/// 同一块的并发获取者经由该槽位的内容锁串行化，
/// 不同块的获取者只在短暂的结构锁临界区内互相竞争。
///
/// # 示例
///
/// ```rust,ignore
/// use bcache_core::{Bcache, RamDisk};
///
/// let cache = Bcache::new(RamDisk::new(1024));
///
/// let mut buf = cache.read_block(1, 33)?;
/// buf.write_u32(0, 0xdead_beef);
/// buf.write_back()?;
/// drop(buf); // brelse
/// ```
pub struct Bcache<D: BlockDevice> {
    device: D,
    ctrl: SpinLock<BufLru>,
    bufs: Box<[SleepLock<BufData>]>,
    stats: StatCounters,
}

impl<D: BlockDevice> Bcache<D> {
    /// 以默认容量 [`NBUF`] 创建缓存
    pub fn new(device: D) -> Self {
        Self::build(device, DEFAULT_NBUF)
    }

    /// 按配置创建缓存
    ///
    /// 构造即初始化：所有槽位未绑定，初始 LRU 顺序任意但确定。
    pub fn with_config(device: D, config: BcacheConfig) -> Result<Self> {
        let nbuf = config.validate()?;
        Ok(Self::build(device, nbuf))
    }

    fn build(device: D, nbuf: NonZeroUsize) -> Self {
        log::debug!("[BCACHE] init with {} slots", nbuf);
        Self {
            device,
            ctrl: SpinLock::new(BufLru::new(nbuf)),
            bufs: (0..nbuf.get())
                .map(|_| SleepLock::new(BufData::new(), "buffer"))
                .collect(),
            stats: StatCounters::default(),
        }
    }

    /// 查找或分配 `key` 对应的槽位，返回已加锁的句柄
    ///
    /// 没有可回收的槽位时停机。
    fn bget(&self, key: BufKey) -> BufGuard<'_, D> {
        let mut ctrl = self.ctrl.lock();

        if let Some(index) = ctrl.find_cached(key) {
            drop(ctrl);
            StatCounters::bump(&self.stats.hits);
            log::trace!("[BCACHE] bget {} HIT slot={}", key, index);
            // 引用计数已大于零，放掉结构锁后槽位不会被回收
            let data = self.bufs[index].lock();
            return BufGuard::new(self, index, key, data);
        }

        let (index, old) = match ctrl.recycle(key) {
            Some(found) => found,
            None => fatal(Fatal::NoBuffers {
                nbuf: self.bufs.len(),
            }),
        };
        // 释放时先放内容锁再减引用计数，所以无引用的槽位内容锁必然空闲，
        // 这里不会等待
        let mut data = match self.bufs[index].try_lock() {
            Some(data) => data,
            None => fatal(Fatal::SlotBusy { index }),
        };
        let was_dirty = data.flags.contains(BufFlags::DIRTY);
        data.flags = BufFlags::empty();
        drop(ctrl);

        StatCounters::bump(&self.stats.misses);
        match old {
            Some(old) => {
                StatCounters::bump(&self.stats.evictions);
                if was_dirty {
                    log::warn!(
                        "[BCACHE] slot {} evicts {} with changes never written back",
                        index,
                        old
                    );
                }
                log::debug!("[BCACHE] bget {} MISS, evict {} from slot {}", key, old, index);
            }
            None => log::debug!("[BCACHE] bget {} MISS, fresh slot {}", key, index),
        }
        BufGuard::new(self, index, key, data)
    }

    /// 读取块，返回已加锁且数据有效的句柄（`bread`）
    ///
    /// 数据无效时在持有内容锁的情况下同步读设备，
    /// 同一块的其他获取者在内容锁上等待，不会重复读盘。
    ///
    /// 设备错误原样返回；槽位保持无效并随句柄释放，下次读取会重试。
    pub fn read_block(&self, dev: DevId, blockno: BlockNo) -> Result<BufGuard<'_, D>> {
        let key = BufKey::new(dev, blockno);
        let mut buf = self.bget(key);
        if !buf.is_valid() {
            let inner = buf.inner_mut();
            self.device.read_block(key, &mut inner.data).map_err(|err| {
                log::warn!("[BCACHE] read {} failed: {}", key, err);
                err
            })?;
            inner.flags.insert(BufFlags::VALID);
            StatCounters::bump(&self.stats.disk_reads);
            log::debug!("[BCACHE] read {} from device", key);
        }
        Ok(buf)
    }

    /// 把块数据同步写回设备（`bwrite`）
    ///
    /// 调用方必须持有该块的内容锁（即持有 `buf`）。
    /// 不改变有效位、引用计数和 LRU 顺序，只清除脏标志。
    pub fn write_back(&self, buf: &mut BufGuard<'_, D>) -> Result<()> {
        if !ptr::eq(buf.cache, self) {
            fatal(Fatal::ForeignBuffer { op: "bwrite" });
        }
        if !buf.holding() {
            fatal(Fatal::NotHolding { op: "bwrite" });
        }
        let key = buf.key;
        let inner = buf.inner_mut();
        self.device.write_block(key, &inner.data)?;
        inner.flags.remove(BufFlags::DIRTY);
        StatCounters::bump(&self.stats.disk_writes);
        log::debug!("[BCACHE] write {} to device", key);
        Ok(())
    }

    /// 释放块（`brelse`），等价于 drop 句柄
    pub fn release(&self, buf: BufGuard<'_, D>) {
        if !ptr::eq(buf.cache, self) {
            fatal(Fatal::ForeignBuffer { op: "brelse" });
        }
        drop(buf);
    }

    /// 增加引用计数，阻止槽位被回收（`bpin`）
    ///
    /// 只取结构锁，不涉及内容锁；返回的 [`BufPin`] 不串行化数据访问。
    pub fn pin<'a>(&'a self, buf: &BufGuard<'a, D>) -> BufPin<'a, D> {
        if !ptr::eq(buf.cache, self) {
            fatal(Fatal::ForeignBuffer { op: "bpin" });
        }
        self.pin_slot(buf.index);
        BufPin {
            cache: self,
            index: buf.index,
            key: buf.key,
        }
    }

    /// 解除 pin（`bunpin`），等价于 drop 该 pin
    ///
    /// 引用计数归零也不调整 LRU 顺序。
    pub fn unpin(&self, pin: BufPin<'_, D>) {
        if !ptr::eq(pin.cache, self) {
            fatal(Fatal::ForeignBuffer { op: "bunpin" });
        }
        drop(pin);
    }

    pub(super) fn release_slot(&self, index: usize) {
        let moved = self.ctrl.lock().release(index);
        if moved {
            log::trace!("[BCACHE] brelse slot={} -> MRU", index);
        }
    }

    pub(super) fn pin_slot(&self, index: usize) {
        self.ctrl.lock().pin(index);
    }

    pub(super) fn unpin_slot(&self, index: usize) {
        self.ctrl.lock().unpin(index);
    }

    /// 后备设备
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 槽位数量
    pub fn capacity(&self) -> usize {
        self.bufs.len()
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> BcacheStats {
        self.stats.snapshot()
    }

    /// 块当前所在槽位的引用计数，未缓存时返回 None
    pub fn refcnt(&self, dev: DevId, blockno: BlockNo) -> Option<u32> {
        let key = BufKey::new(dev, blockno);
        self.ctrl.lock().slot_of(key).map(|meta| meta.refcnt)
    }

    /// 块是否绑定在某个槽位上
    pub fn is_cached(&self, dev: DevId, blockno: BlockNo) -> bool {
        self.refcnt(dev, blockno).is_some()
    }

    /// 所有已绑定的块，从最近释放到最久未释放
    pub fn cached_keys(&self) -> Vec<BufKey> {
        let ctrl = self.ctrl.lock();
        ctrl.order
            .iter()
            .filter_map(|(&index, _)| ctrl.meta[index].key)
            .collect()
    }

    /// 槽位下标的 LRU 顺序，从最近释放到最久未释放
    pub fn lru_order(&self) -> Vec<usize> {
        self.ctrl.lock().order.iter().map(|(&index, _)| index).collect()
    }
}

impl<D: BlockDevice> fmt::Debug for Bcache<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bcache")
            .field("capacity", &self.capacity())
            .field("cached", &self.cached_keys().len())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RamDisk;
    use crate::error::ErrorKind;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::thread;

    fn cache_with(nbuf: usize) -> Bcache<Arc<RamDisk>> {
        Bcache::with_config(Arc::new(RamDisk::new(64)), BcacheConfig::with_nbuf(nbuf)).unwrap()
    }

    fn key(blockno: BlockNo) -> BufKey {
        BufKey::new(1, blockno)
    }

    #[test]
    fn test_cache_creation() {
        let cache = Bcache::new(RamDisk::new(8));
        assert_eq!(cache.capacity(), NBUF);
        assert!(cache.cached_keys().is_empty());
        assert_eq!(cache.stats(), BcacheStats::default());

        let cache = cache_with(4);
        assert_eq!(cache.lru_order(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Bcache::with_config(RamDisk::new(8), BcacheConfig::with_nbuf(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_first_miss_takes_lru_slot() {
        let cache = cache_with(4);
        let buf = cache.read_block(1, 10).unwrap();
        assert_eq!(buf.index(), 0);
        assert_eq!(cache.refcnt(1, 10), Some(1));
    }

    #[test]
    fn test_hit_avoids_io() {
        let cache = cache_with(4);
        let buf = cache.read_block(1, 7).unwrap();
        drop(buf);
        let buf = cache.read_block(1, 7).unwrap();
        drop(buf);

        assert_eq!(cache.device().read_count(), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.disk_reads, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_lru_eviction_order() {
        let cache = cache_with(2);

        cache.read_block(1, 0xA).unwrap().release();
        cache.read_block(1, 0xB).unwrap().release();
        cache.read_block(1, 0xC).unwrap().release();

        // A 最久未释放，被回收
        assert!(!cache.is_cached(1, 0xA));
        assert!(cache.is_cached(1, 0xB));
        assert!(cache.is_cached(1, 0xC));
        assert_eq!(cache.cached_keys(), vec![key(0xC), key(0xB)]);
        assert_eq!(cache.stats().evictions, 1);

        // B 仍在缓存中，不再读盘
        let reads = cache.device().read_count();
        cache.read_block(1, 0xB).unwrap().release();
        assert_eq!(cache.device().read_count(), reads);
    }

    #[test]
    fn test_lookup_does_not_reorder() {
        let cache = cache_with(3);
        cache.read_block(1, 1).unwrap().release();
        cache.read_block(1, 2).unwrap().release();
        assert_eq!(cache.cached_keys(), vec![key(2), key(1)]);

        let buf = cache.read_block(1, 1).unwrap();
        assert_eq!(cache.cached_keys(), vec![key(2), key(1)]);
        buf.release();
        assert_eq!(cache.cached_keys(), vec![key(1), key(2)]);
    }

    #[test]
    fn test_held_block_not_evicted() {
        let cache = cache_with(2);
        let held = cache.read_block(1, 1).unwrap();
        cache.read_block(1, 2).unwrap().release();
        cache.read_block(1, 3).unwrap().release();

        assert!(cache.is_cached(1, 1));
        assert!(!cache.is_cached(1, 2));
        assert_eq!(held.blockno(), 1);
    }

    #[test]
    #[should_panic(expected = "bget: no buffers")]
    fn test_exhaustion_is_fatal() {
        let cache = cache_with(2);
        let _a = cache.read_block(1, 1).unwrap();
        let _b = cache.read_block(1, 2).unwrap();
        let _c = cache.read_block(1, 3);
    }

    #[test]
    fn test_write_back_persists() {
        let cache = cache_with(4);
        let mut buf = cache.read_block(1, 5).unwrap();
        buf.data_mut()[..4].copy_from_slice(b"xv6!");
        let order = cache.lru_order();
        buf.write_back().unwrap();

        assert_eq!(&cache.device().snapshot(key(5))[..4], b"xv6!");
        assert!(buf.is_valid());
        assert_eq!(cache.refcnt(1, 5), Some(1));
        assert_eq!(cache.lru_order(), order);
        assert_eq!(cache.stats().disk_writes, 1);
    }

    #[test]
    fn test_cached_data_survives_release() {
        let cache = cache_with(4);
        let mut buf = cache.read_block(1, 6).unwrap();
        buf.write_u32(100, 42);
        buf.release();

        let buf = cache.read_block(1, 6).unwrap();
        assert_eq!(buf.read_u32(100), 42);
        assert!(buf.is_dirty());
        assert_eq!(cache.device().read_count(), 1);
    }

    #[test]
    fn test_rebind_invalidates_payload() {
        let cache = cache_with(1);
        let mut buf = cache.read_block(1, 1).unwrap();
        buf.data_mut().fill(0xff);
        buf.release();

        let buf = cache.read_block(1, 2).unwrap();
        assert_eq!(buf.index(), 0);
        assert!(buf.is_valid());
        assert!(!buf.is_dirty());
        assert!(buf.data().iter().all(|&b| b == 0));
        assert_eq!(cache.device().read_count(), 2);
        // 未写回的修改随回收丢弃，设备上仍是旧内容
        assert!(cache.device().snapshot(key(1)).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_device_error_leaves_slot_invalid() {
        let cache = cache_with(2);
        let err = cache.read_block(1, 1000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(cache.refcnt(1, 1000), Some(0));
        assert_eq!(cache.stats().disk_reads, 0);

        // 失败的槽位可以被正常回收
        cache.read_block(1, 1).unwrap().release();
        cache.read_block(1, 2).unwrap().release();
        assert!(!cache.is_cached(1, 1000));
    }

    #[test]
    fn test_write_back_error_propagates() {
        let cache = Bcache::with_config(RamDisk::read_only(8), BcacheConfig::with_nbuf(2)).unwrap();
        let mut buf = cache.read_block(1, 1).unwrap();
        buf.data_mut()[0] = 1;
        let err = buf.write_back().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_pin_blocks_eviction() {
        let cache = cache_with(3);
        let buf = cache.read_block(1, 60).unwrap();
        let pin = cache.pin(&buf);
        buf.release();
        assert_eq!(cache.refcnt(1, 60), Some(1));

        for blockno in 0..8 {
            cache.read_block(1, blockno).unwrap().release();
            assert!(cache.is_cached(1, 60));
        }

        cache.unpin(pin);
        assert_eq!(cache.refcnt(1, 60), Some(0));
        // 被 pin 期间从未移到最近使用端，解除后是下一个回收对象
        cache.read_block(1, 50).unwrap().release();
        assert!(!cache.is_cached(1, 60));
    }

    #[test]
    fn test_release_after_unpin_keeps_order_consistent() {
        let cache = cache_with(3);
        cache.read_block(1, 1).unwrap().release();

        let buf = cache.read_block(1, 2).unwrap();
        let pin = buf.pin();
        buf.release();
        let order = cache.lru_order();
        pin.unpin();

        // unpin 归零不移动，也不会重复摘链
        assert_eq!(cache.lru_order(), order);
        let slots: BTreeSet<usize> = order.iter().copied().collect();
        assert_eq!(slots.len(), 3);
        assert_eq!(cache.refcnt(1, 2), Some(0));

        // 反过来：持有期间 unpin，再释放，只移动一次
        let buf = cache.read_block(1, 2).unwrap();
        buf.pin().unpin();
        let index = buf.index();
        buf.release();
        let order = cache.lru_order();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], index);
    }

    #[test]
    #[should_panic(expected = "bwrite: buffer belongs to another cache")]
    fn test_foreign_write_back_is_fatal() {
        let a = cache_with(2);
        let b = cache_with(2);
        let mut buf = a.read_block(1, 1).unwrap();
        let _ = b.write_back(&mut buf);
    }

    #[test]
    #[should_panic(expected = "brelse: buffer belongs to another cache")]
    fn test_foreign_release_is_fatal() {
        let a = cache_with(2);
        let b = cache_with(2);
        let buf = a.read_block(1, 1).unwrap();
        b.release(buf);
    }

    #[test]
    fn test_same_block_serializes() {
        let cache = cache_with(4);
        let threads = 8;
        let rounds = 200;

        thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    for _ in 0..rounds {
                        let mut buf = cache.read_block(1, 0).unwrap();
                        let v = buf.read_u32(0);
                        thread::yield_now();
                        buf.write_u32(0, v + 1);
                    }
                });
            }
        });

        let buf = cache.read_block(1, 0).unwrap();
        assert_eq!(buf.read_u32(0), threads * rounds);
        // 同一块只读过一次盘
        assert_eq!(cache.device().read_count(), 1);
    }

    #[test]
    fn test_concurrent_distinct_blocks_under_pressure() {
        let nbuf = 4;
        let cache = cache_with(nbuf);
        let rounds = 50;
        let per_thread: BlockNo = 6;

        thread::scope(|s| {
            for t in 0..nbuf as BlockNo {
                let cache = &cache;
                s.spawn(move || {
                    for round in 0..rounds {
                        for i in 0..per_thread {
                            let blockno = t * per_thread + i;
                            let mut buf = cache.read_block(1, blockno).unwrap();
                            assert_eq!(buf.read_u32(0), round);
                            buf.write_u32(0, round + 1);
                            buf.write_back().unwrap();
                        }
                    }
                });
            }
        });

        for blockno in 0..nbuf as BlockNo * per_thread {
            let snap = cache.device().snapshot(key(blockno));
            assert_eq!(u32::from_le_bytes([snap[0], snap[1], snap[2], snap[3]]), rounds);
        }
        let keys = cache.cached_keys();
        let unique: BTreeSet<BufKey> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
        assert!(keys.len() <= nbuf);
        assert!(cache.stats().evictions > 0);
    }
}
