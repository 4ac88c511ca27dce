// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列策略测试模块
///
/// 通过公开接口验证栈式策略的放行顺序、淘汰行为以及槽位守恒

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use throttlrs::{PolicySnapshot, QueuePolicy, QueuePolicyOptions, StackPolicy};

    fn stack_policy(max: i64, limit: i64) -> Arc<dyn QueuePolicy> {
        Arc::new(StackPolicy::new(&QueuePolicyOptions::new(max, limit)).unwrap())
    }

    async fn wait_for_queue_length(policy: &Arc<dyn QueuePolicy>, expected: usize) {
        while policy.snapshot().queue_length != expected {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_second_caller_queues_third_evicts_it() {
        let policy = stack_policy(1, 1);
        assert!(policy.try_enter().await);

        let second = tokio::spawn({
            let policy = policy.clone();
            async move { policy.try_enter().await }
        });
        wait_for_queue_length(&policy, 1).await;

        let third = tokio::spawn({
            let policy = policy.clone();
            async move { policy.try_enter().await }
        });

        assert!(!second.await.unwrap());
        wait_for_queue_length(&policy, 1).await;

        policy.on_exit();
        assert!(third.await.unwrap());
        assert_eq!(
            policy.snapshot(),
            PolicySnapshot {
                free_slots: 0,
                queue_length: 0
            }
        );

        policy.on_exit();
        assert_eq!(policy.snapshot().free_slots, 1);
    }

    #[tokio::test]
    async fn test_promotion_serves_most_recent_waiter_first() {
        let policy = stack_policy(1, 4);
        assert!(policy.try_enter().await);

        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for id in 0..4 {
            let task_policy = policy.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                assert!(task_policy.try_enter().await);
                order.lock().push(id);
                task_policy.on_exit();
            }));
            wait_for_queue_length(&policy, id + 1).await;
        }

        policy.on_exit();
        for handle in handles {
            handle.await.unwrap();
        }

        // Each promoted waiter exits immediately, handing the slot down the stack.
        assert_eq!(*order.lock(), vec![3, 2, 1, 0]);
        assert_eq!(policy.snapshot().free_slots, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slots_are_conserved_under_timeouts_and_evictions() {
        let policy = stack_policy(3, 5);
        let admitted = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..200u64 {
            let policy = policy.clone();
            let admitted = admitted.clone();
            handles.push(tokio::spawn(async move {
                let deadline = Duration::from_millis(1 + i % 7);
                match tokio::time::timeout(deadline, policy.try_enter()).await {
                    Ok(true) => {
                        admitted.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(i % 3)).await;
                        policy.on_exit();
                    }
                    Ok(false) | Err(_) => {}
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(admitted.load(Ordering::SeqCst) >= 3);
        assert_eq!(
            policy.snapshot(),
            PolicySnapshot {
                free_slots: 3,
                queue_length: 0
            }
        );
    }
}
