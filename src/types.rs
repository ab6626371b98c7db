//! 块标识类型
//!
//! 缓存不解析磁盘布局，只认 `(设备号, 块号)` 这一对不透明的整数。

use core::fmt;

/// 设备号
pub type DevId = u32;

/// 设备内的逻辑块号
pub type BlockNo = u32;

/// 缓存槽位可以绑定的块标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufKey {
    /// 设备号
    pub dev: DevId,
    /// 块号
    pub blockno: BlockNo,
}

impl BufKey {
    /// 创建块标识
    pub const fn new(dev: DevId, blockno: BlockNo) -> Self {
        Self { dev, blockno }
    }
}

impl fmt::Display for BufKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dev, self.blockno)
    }
}

impl From<(DevId, BlockNo)> for BufKey {
    fn from((dev, blockno): (DevId, BlockNo)) -> Self {
        Self::new(dev, blockno)
    }
}
