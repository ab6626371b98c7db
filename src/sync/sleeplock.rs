//! 睡眠锁
//!
//! 锁被占用时，请求者被挂起直到持有者释放。
//!
//! 启用 `std`（以及单元测试）时基于 `Mutex<bool>` + `Condvar` 实现，
//! 等待线程真正让出处理器。`no_std` 下没有可用的调度器，
//! 退化为原子标志加 `spin_loop` 退避；接入内核时应在此处替换为
//! 基于进程 sleep/wakeup 的实现。

use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use self::raw::RawSleepLock;

/// 睡眠锁
pub struct SleepLock<T: ?Sized> {
    raw: RawSleepLock,
    name: &'static str,
    data: UnsafeCell<T>,
}

// 数据只会经由守卫独占访问
unsafe impl<T: ?Sized + Send> Sync for SleepLock<T> {}

impl<T> SleepLock<T> {
    /// 创建睡眠锁，`name` 仅用于诊断
    pub fn new(data: T, name: &'static str) -> Self {
        Self {
            raw: RawSleepLock::new(),
            name,
            data: UnsafeCell::new(data),
        }
    }
}

impl<T: ?Sized> SleepLock<T> {
    /// 获取锁，锁被占用时挂起当前线程
    pub fn lock(&self) -> SleepLockGuard<'_, T> {
        self.raw.lock();
        SleepLockGuard {
            lock: self,
            _marker: PhantomData,
        }
    }

    /// 尝试获取锁，不阻塞
    pub fn try_lock(&self) -> Option<SleepLockGuard<'_, T>> {
        if self.raw.try_lock() {
            Some(SleepLockGuard {
                lock: self,
                _marker: PhantomData,
            })
        } else {
            None
        }
    }

    /// 锁当前是否被持有
    pub fn holding(&self) -> bool {
        self.raw.is_locked()
    }

    /// 锁名
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> fmt::Debug for SleepLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SleepLock")
            .field("name", &self.name)
            .field("locked", &self.holding())
            .finish()
    }
}

/// 睡眠锁守卫，离开作用域时释放锁并唤醒一个等待者
pub struct SleepLockGuard<'a, T: ?Sized> {
    lock: &'a SleepLock<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T: ?Sized> SleepLockGuard<'a, T> {
    /// 守卫所属的锁
    pub fn sleep_lock(&self) -> &'a SleepLock<T> {
        self.lock
    }
}

impl<T: ?Sized> Deref for SleepLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for SleepLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for SleepLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.raw.unlock();
    }
}

#[cfg(any(test, feature = "std"))]
mod raw {
    use std::sync::{Condvar, Mutex, PoisonError};

    pub(super) struct RawSleepLock {
        locked: Mutex<bool>,
        wakeup: Condvar,
    }

    impl RawSleepLock {
        pub(super) const fn new() -> Self {
            Self {
                locked: Mutex::new(false),
                wakeup: Condvar::new(),
            }
        }

        pub(super) fn lock(&self) {
            let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
            while *locked {
                locked = self
                    .wakeup
                    .wait(locked)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            *locked = true;
        }

        pub(super) fn try_lock(&self) -> bool {
            let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
            if *locked {
                false
            } else {
                *locked = true;
                true
            }
        }

        pub(super) fn unlock(&self) {
            let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
            *locked = false;
            drop(locked);
            self.wakeup.notify_one();
        }

        pub(super) fn is_locked(&self) -> bool {
            *self.locked.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

#[cfg(not(any(test, feature = "std")))]
mod raw {
    use core::hint::spin_loop;
    use core::sync::atomic::{AtomicBool, Ordering};

    pub(super) struct RawSleepLock {
        locked: AtomicBool,
    }

    impl RawSleepLock {
        pub(super) const fn new() -> Self {
            Self {
                locked: AtomicBool::new(false),
            }
        }

        pub(super) fn lock(&self) {
            while !self.try_lock() {
                while self.locked.load(Ordering::Relaxed) {
                    spin_loop();
                }
            }
        }

        pub(super) fn try_lock(&self) -> bool {
            self.locked
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
        }

        pub(super) fn unlock(&self) {
            self.locked.store(false, Ordering::Release);
        }

        pub(super) fn is_locked(&self) -> bool {
            self.locked.load(Ordering::Relaxed)
        }
    }
}
