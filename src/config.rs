//! 缓存配置

use core::num::NonZeroUsize;

use crate::consts::NBUF;
use crate::error::{Error, ErrorKind, Result};

/// 块缓存配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcacheConfig {
    /// 缓存槽位数量（块数），启动后固定不变
    ///
    /// 必须不小于上层同时持有的块数峰值，否则获取时会因耗尽而停机。
    pub nbuf: usize,
}

impl Default for BcacheConfig {
    fn default() -> Self {
        Self { nbuf: NBUF }
    }
}

impl BcacheConfig {
    /// 指定槽位数量
    pub const fn with_nbuf(nbuf: usize) -> Self {
        Self { nbuf }
    }

    /// 检查配置，返回槽位数量
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.nbuf).ok_or(Error::new(
            ErrorKind::InvalidInput,
            "Buffer cache needs at least one slot",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BcacheConfig::default();
        assert_eq!(config.nbuf, NBUF);
        assert_eq!(config.validate().unwrap().get(), NBUF);
    }

    #[test]
    fn test_zero_slots_rejected() {
        let err = BcacheConfig::with_nbuf(0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
