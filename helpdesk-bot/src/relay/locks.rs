//! Per-user serialization of the routing phase.
//!
//! Striped: users hashing to the same stripe share a lock, which only costs some parallelism.

use tokio::sync::{Mutex, MutexGuard};

const DEFAULT_STRIPES: usize = 64;

pub struct UserLocks {
    stripes: Vec<Mutex<()>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::with_stripes(DEFAULT_STRIPES)
    }

    pub fn with_stripes(count: usize) -> Self {
        let count = count.max(1);
        Self {
            stripes: (0..count).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Waits for and holds the stripe owning `user_id` until the guard drops.
    pub async fn lock(&self, user_id: i64) -> MutexGuard<'_, ()> {
        let index = (user_id.unsigned_abs() % self.stripes.len() as u64) as usize;
        self.stripes[index].lock().await
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::with_stripes(4));
        let guard = locks.lock(7).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(7).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_stripes_do_not_block() {
        let locks = UserLocks::with_stripes(4);
        let _first = locks.lock(1).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(second.is_ok());
    }

    #[test]
    fn test_zero_stripes_clamped() {
        let locks = UserLocks::with_stripes(0);
        assert_eq!(locks.stripes.len(), 1);
    }
}
