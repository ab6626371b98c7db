//! 两级锁
//!
//! - [`SpinLock`]：忙等结构锁，只保护短小的元数据临界区（槽位绑定、
//!   引用计数、LRU 顺序），绝不跨越设备 I/O，也绝不在持有时等待内容锁。
//! - [`SleepLock`]：阻塞式内容锁，等待者被挂起而不是自旋，
//!   可以跨越设备 I/O 以及调用方对块数据的整个临界区。
//!
//! 加锁顺序只有一种：先在结构锁内完成元数据修改并释放结构锁，
//! 再去获取内容锁。

mod sleeplock;

pub use sleeplock::{SleepLock, SleepLockGuard};

/// 结构锁（忙等互斥）
pub type SpinLock<T> = spin::Mutex<T>;

/// 结构锁守卫
pub type SpinLockGuard<'a, T> = spin::MutexGuard<'a, T>;
