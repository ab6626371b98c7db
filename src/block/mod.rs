//! 块设备抽象
//!
//! block/device.rs 定义缓存消费的同步块读写接口
//! block/ramdisk.rs 提供一个内存实现，测试和早期启动时使用

mod device;
mod ramdisk;

pub use device::BlockDevice;
pub use ramdisk::RamDisk;
