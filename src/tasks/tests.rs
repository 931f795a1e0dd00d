//! Task Registry Tests
//!
//! ## Test Scopes
//! - **Lifecycle**: Creation defaults, lookups and terminal transitions.
//! - **Assignment**: FIFO ordering and the at-most-one-assignee invariant,
//!   including under concurrent pulls.
//! - **Stats**: Full-scan status tallies.

#[cfg(test)]
mod tests {
    use crate::nodes::types::NodeId;
    use crate::tasks::registry::{CompleteError, TaskRegistry};
    use crate::tasks::types::{TaskStatus, TaskType};
    use std::collections::HashSet;

    async fn submit(registry: &TaskRegistry, input: &str) -> crate::tasks::types::Task {
        registry
            .create(
                TaskType::Inference,
                "gpt-x".to_string(),
                input.to_string(),
                serde_json::json!({}),
            )
            .await
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    #[tokio::test]
    async fn test_created_task_is_pending_and_unassigned() {
        let registry = TaskRegistry::new();

        let task = submit(&registry, "hello").await;

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.task_type, TaskType::Inference);
        assert!(task.node_id.is_none());
        assert!(task.result.is_none());
        assert!(task.created_at > 0);

        // The stored record matches what was returned
        let stored = registry.get(&task.id).expect("task should exist");
        assert_eq!(stored.status, TaskStatus::Pending);
        assert_eq!(stored.input, "hello");
    }

    #[tokio::test]
    async fn test_get_unknown_task_returns_none() {
        let registry = TaskRegistry::new();

        let unknown = crate::tasks::types::TaskId::new();
        assert!(registry.get(&unknown).is_none());
    }

    #[tokio::test]
    async fn test_has_pending_tracks_assignment() {
        let registry = TaskRegistry::new();
        assert!(!registry.has_pending());

        submit(&registry, "work").await;
        assert!(registry.has_pending());

        let node = NodeId("n1".to_string());
        registry.assign_next(&node).await.expect("task available");
        assert!(!registry.has_pending());
    }

    // ============================================================
    // Assignment
    // ============================================================

    #[tokio::test]
    async fn test_assign_next_is_fifo() {
        let registry = TaskRegistry::new();

        let first = submit(&registry, "first").await;
        let second = submit(&registry, "second").await;

        let node = NodeId("n1".to_string());

        let assigned = registry.assign_next(&node).await.expect("task available");
        assert_eq!(assigned.id, first.id);
        assert_eq!(assigned.status, TaskStatus::Running);
        assert_eq!(assigned.node_id, Some(node.clone()));

        let assigned = registry.assign_next(&node).await.expect("task available");
        assert_eq!(assigned.id, second.id);
    }

    #[tokio::test]
    async fn test_assign_next_none_when_nothing_pending() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        assert!(registry.assign_next(&node).await.is_none());

        submit(&registry, "only").await;
        registry.assign_next(&node).await.expect("task available");

        // The single task is now running; nothing left to hand out
        assert!(registry.assign_next(&node).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_pulls_assign_each_task_at_most_once() {
        let registry = TaskRegistry::new();

        for i in 0..5 {
            submit(&registry, &format!("task-{}", i)).await;
        }

        // Twice as many pullers as tasks, racing each other
        let mut handles = Vec::new();
        for i in 0..10 {
            let registry = registry.clone();
            let node = NodeId(format!("node-{}", i));
            handles.push(tokio::spawn(async move {
                registry.assign_next(&node).await.map(|task| (node, task))
            }));
        }

        let mut assigned_ids = HashSet::new();
        let mut wins = 0;
        for handle in handles {
            if let Some((node, task)) = handle.await.unwrap() {
                wins += 1;
                // The winner is the bound assignee
                assert_eq!(task.node_id, Some(node));
                assert_eq!(task.status, TaskStatus::Running);
                // No task handed out twice
                assert!(assigned_ids.insert(task.id.clone()));
            }
        }

        assert_eq!(wins, 5);
        assert_eq!(assigned_ids.len(), 5);
    }

    // ============================================================
    // Completion
    // ============================================================

    #[tokio::test]
    async fn test_complete_stores_result() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let task = submit(&registry, "hello").await;
        registry.assign_next(&node).await.expect("task available");

        let completed = registry
            .complete(&task.id, &node, Ok("a response".to_string()))
            .expect("completion should succeed");

        assert_eq!(completed.status, TaskStatus::Completed);
        assert_eq!(completed.result.as_deref(), Some("a response"));
    }

    #[tokio::test]
    async fn test_complete_failure_stores_error() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let task = submit(&registry, "hello").await;
        registry.assign_next(&node).await.expect("task available");

        let failed = registry
            .complete(&task.id, &node, Err("out of memory".to_string()))
            .expect("failure report should succeed");

        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.result.as_deref(), Some("out of memory"));
    }

    #[tokio::test]
    async fn test_complete_rejects_unknown_task() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let unknown = crate::tasks::types::TaskId::new();
        let err = registry
            .complete(&unknown, &node, Ok("x".to_string()))
            .unwrap_err();

        assert_eq!(err, CompleteError::NotFound);
    }

    #[tokio::test]
    async fn test_complete_rejects_pending_task() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let task = submit(&registry, "hello").await;

        let err = registry
            .complete(&task.id, &node, Ok("x".to_string()))
            .unwrap_err();

        assert_eq!(err, CompleteError::NotRunning);
    }

    #[tokio::test]
    async fn test_complete_rejects_non_assignee() {
        let registry = TaskRegistry::new();
        let assignee = NodeId("n1".to_string());
        let impostor = NodeId("n2".to_string());

        let task = submit(&registry, "hello").await;
        registry.assign_next(&assignee).await.expect("task available");

        let err = registry
            .complete(&task.id, &impostor, Ok("x".to_string()))
            .unwrap_err();

        assert_eq!(err, CompleteError::WrongNode);
    }

    #[tokio::test]
    async fn test_complete_is_terminal() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let task = submit(&registry, "hello").await;
        registry.assign_next(&node).await.expect("task available");
        registry
            .complete(&task.id, &node, Ok("done".to_string()))
            .expect("completion should succeed");

        // A second report of any kind is rejected
        let err = registry
            .complete(&task.id, &node, Err("late failure".to_string()))
            .unwrap_err();
        assert_eq!(err, CompleteError::NotRunning);

        // And the stored result is untouched
        let stored = registry.get(&task.id).unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.result.as_deref(), Some("done"));
    }

    // ============================================================
    // Stats
    // ============================================================

    #[tokio::test]
    async fn test_status_counts_scan() {
        let registry = TaskRegistry::new();
        let node = NodeId("n1".to_string());

        let first = submit(&registry, "gets completed").await;
        let second = submit(&registry, "stays running").await;
        submit(&registry, "stays pending").await;

        // FIFO hands out the first two; complete only the first
        assert_eq!(registry.assign_next(&node).await.unwrap().id, first.id);
        assert_eq!(registry.assign_next(&node).await.unwrap().id, second.id);
        registry
            .complete(&first.id, &node, Ok("ok".to_string()))
            .unwrap();

        let (pending, running, completed, failed) = registry.status_counts();
        assert_eq!((pending, running, completed, failed), (1, 1, 1, 0));
        assert_eq!(registry.len(), 3);
    }
}
