//! 内存块设备
//!
//! 用于测试和系统早期启动：每个设备有固定数量的块，
//! 从未写过的块读出全零。

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::sync::atomic::{AtomicU64, Ordering};

use super::BlockDevice;
use crate::consts::BSIZE;
use crate::error::{Error, ErrorKind, Result};
use crate::sync::SpinLock;
use crate::types::{BlockNo, BufKey};

/// 内存块设备
pub struct RamDisk {
    /// 每个设备的块数
    nblocks: BlockNo,
    /// 已写入过的块
    blocks: SpinLock<BTreeMap<BufKey, Box<[u8; BSIZE]>>>,
    /// 是否只读
    read_only: bool,
    /// 物理读次数
    reads: AtomicU64,
    /// 物理写次数
    writes: AtomicU64,
}

impl RamDisk {
    /// 创建可读写的内存盘
    pub fn new(nblocks: BlockNo) -> Self {
        Self {
            nblocks,
            blocks: SpinLock::new(BTreeMap::new()),
            read_only: false,
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// 创建只读内存盘
    pub fn read_only(nblocks: BlockNo) -> Self {
        Self {
            read_only: true,
            ..Self::new(nblocks)
        }
    }

    /// 每个设备的块数
    pub fn nblocks(&self) -> BlockNo {
        self.nblocks
    }

    /// 物理读次数
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// 物理写次数
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// 绕过缓存直接填充一个块（测试准备数据用）
    pub fn fill(&self, key: BufKey, data: &[u8]) {
        let mut block = Box::new([0u8; BSIZE]);
        let len = data.len().min(BSIZE);
        block[..len].copy_from_slice(&data[..len]);
        self.blocks.lock().insert(key, block);
    }

    /// 绕过缓存直接读出一个块的内容
    pub fn snapshot(&self, key: BufKey) -> [u8; BSIZE] {
        self.blocks
            .lock()
            .get(&key)
            .map(|b| **b)
            .unwrap_or([0u8; BSIZE])
    }

    fn check(&self, key: BufKey, len: usize) -> Result<()> {
        if key.blockno >= self.nblocks {
            return Err(Error::new(ErrorKind::InvalidInput, "Block number out of range"));
        }
        if len < BSIZE {
            return Err(Error::new(ErrorKind::InvalidInput, "Buffer smaller than block size"));
        }
        Ok(())
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, key: BufKey, buf: &mut [u8]) -> Result<()> {
        self.check(key, buf.len())?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        match self.blocks.lock().get(&key) {
            Some(block) => buf[..BSIZE].copy_from_slice(&block[..]),
            None => buf[..BSIZE].fill(0),
        }
        log::trace!("[RAMDISK] read {}", key);
        Ok(())
    }

    fn write_block(&self, key: BufKey, buf: &[u8]) -> Result<()> {
        if self.read_only {
            return Err(Error::new(ErrorKind::PermissionDenied, "Device is read-only"));
        }
        self.check(key, buf.len())?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut block = Box::new([0u8; BSIZE]);
        block.copy_from_slice(&buf[..BSIZE]);
        self.blocks.lock().insert(key, block);
        log::trace!("[RAMDISK] write {}", key);
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
