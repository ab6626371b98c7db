//! 常量定义

/// 块大小（字节），即每个缓存槽位的负载大小
pub const BSIZE: usize = 1024;

/// 单个上层操作最多同时持有的块数
pub const MAXOPBLOCKS: usize = 10;

/// 默认缓存槽位数量
pub const NBUF: usize = MAXOPBLOCKS * 3;
