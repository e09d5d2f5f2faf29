//! Repository Integration Tests
//!
//! Tests for TaskRepository with in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, TaskDraft};
    use crate::repository::{
        init_db, DbState, OwnedRepository, SearchableRepository, TaskPositioningOperations,
        TaskRepository, TaskSearchOperations,
    };
    use std::path::Path;

    const ALICE: u32 = 1;
    const BOB: u32 = 2;

    async fn setup_test_db() -> TaskRepository {
        setup_with_state().await.1
    }

    async fn setup_with_state() -> (DbState, TaskRepository) {
        // Use in-memory database for tests
        let db_state = init_db(Path::new(":memory:"))
            .await
            .expect("Failed to init test DB");
        let repo = TaskRepository::new(db_state.connection());
        (db_state, repo)
    }

    /// Make any order key write to task `id` fail
    async fn block_position_update(db_state: &DbState, id: u32) {
        let guard = db_state.conn.lock().await;
        guard
            .as_ref()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER block_position BEFORE UPDATE OF position ON tasks \
                 WHEN OLD.id = {} BEGIN SELECT RAISE(ABORT, 'position locked'); END;",
                id
            ))
            .unwrap();
    }

    async fn unblock_position_update(db_state: &DbState) {
        let guard = db_state.conn.lock().await;
        guard
            .as_ref()
            .unwrap()
            .execute_batch("DROP TRIGGER block_position;")
            .unwrap();
    }

    async fn seed(repo: &TaskRepository, owner_id: u32, n: usize) -> Vec<u32> {
        let mut ids = Vec::new();
        for i in 0..n {
            let task = repo
                .create(owner_id, &TaskDraft::new(format!("Task {}", i), ""))
                .await
                .unwrap();
            ids.push(task.id);
        }
        ids
    }

    async fn listed_ids(repo: &TaskRepository, owner_id: u32) -> Vec<u32> {
        repo.list(owner_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect()
    }

    async fn positions(repo: &TaskRepository, owner_id: u32) -> Vec<(u32, i32)> {
        let mut pairs: Vec<_> = repo
            .list(owner_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.id, t.position))
            .collect();
        pairs.sort();
        pairs
    }

    #[tokio::test]
    async fn test_create_appends_at_tail() {
        let repo = setup_test_db().await;

        let first = repo.create(ALICE, &TaskDraft::new("First", "")).await.unwrap();
        let second = repo.create(ALICE, &TaskDraft::new("Second", "")).await.unwrap();
        let other = repo.create(BOB, &TaskDraft::new("Other", "")).await.unwrap();

        assert!(first.id > 0);
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        // Order keys are per owner
        assert_eq!(other.position, 0);
        assert!(!first.complete);
    }

    #[tokio::test]
    async fn test_create_after_delete_uses_max_plus_one() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;

        repo.delete(ALICE, ids[0]).await.unwrap();
        let next = repo.create(ALICE, &TaskDraft::new("Next", "")).await.unwrap();
        assert_eq!(next.position, 3);
    }

    #[tokio::test]
    async fn test_find_round_trips_fields() {
        let repo = setup_test_db().await;

        let draft = TaskDraft {
            title: "Find me".to_string(),
            description: "Details".to_string(),
            complete: true,
        };
        let created = repo.create(ALICE, &draft).await.unwrap();

        let found = repo.find(ALICE, created.id).await.expect("Find failed");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_list_orders_by_position_and_scopes_owner() {
        let repo = setup_test_db().await;
        let alice = seed(&repo, ALICE, 3).await;
        seed(&repo, BOB, 2).await;

        assert_eq!(listed_ids(&repo, ALICE).await, alice);
        assert_eq!(repo.list(BOB).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_item() {
        let repo = setup_test_db().await;
        let created = repo.create(ALICE, &TaskDraft::new("Original", "")).await.unwrap();

        let draft = TaskDraft {
            title: "Updated title".to_string(),
            description: "Updated description".to_string(),
            complete: true,
        };
        let updated = repo.update(ALICE, created.id, &draft).await.expect("Update failed");

        assert_eq!(updated.title, "Updated title");
        assert!(updated.complete);
        assert_eq!(updated.position, created.position);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_item() {
        let repo = setup_test_db().await;
        let created = repo.create(ALICE, &TaskDraft::new("To delete", "")).await.unwrap();

        repo.delete(ALICE, created.id).await.expect("Delete failed");

        let found = repo.find(ALICE, created.id).await;
        assert!(matches!(found, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_does_not_renumber() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;

        repo.delete(ALICE, ids[1]).await.unwrap();
        assert_eq!(positions(&repo, ALICE).await, vec![(ids[0], 0), (ids[2], 2)]);
    }

    #[tokio::test]
    async fn test_cross_owner_access_is_not_found() {
        let repo = setup_test_db().await;
        let task = repo.create(ALICE, &TaskDraft::new("User1 Task", "Test content")).await.unwrap();

        assert!(matches!(repo.find(BOB, task.id).await, Err(DomainError::NotFound(_))));

        let hacked = TaskDraft {
            title: "Hacked Task".to_string(),
            description: "Malicious content".to_string(),
            complete: true,
        };
        assert!(matches!(
            repo.update(BOB, task.id, &hacked).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(repo.delete(BOB, task.id).await, Err(DomainError::NotFound(_))));

        // Row untouched
        assert_eq!(repo.find(ALICE, task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_missing_and_foreign_errors_are_identical() {
        let repo = setup_test_db().await;
        let task = repo.create(ALICE, &TaskDraft::new("Mine", "")).await.unwrap();

        let foreign = repo.find(BOB, task.id).await.unwrap_err();
        let missing = repo.find(BOB, task.id + 100).await.unwrap_err();
        assert_eq!(
            foreign.to_string().replace(&task.id.to_string(), "N"),
            missing.to_string().replace(&(task.id + 100).to_string(), "N")
        );
    }

    #[tokio::test]
    async fn test_reorder_applies_permutation() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;

        let outcome = repo.reorder(ALICE, &[ids[2], ids[0], ids[1]]).await.unwrap();

        assert_eq!(outcome.applied, 3);
        assert!(outcome.skipped.is_empty());
        assert_eq!(listed_ids(&repo, ALICE).await, vec![ids[2], ids[0], ids[1]]);
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 1), (ids[1], 2), (ids[2], 0)]
        );
    }

    #[tokio::test]
    async fn test_reorder_is_idempotent() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 4).await;
        let order = [ids[3], ids[1], ids[0], ids[2]];

        repo.reorder(ALICE, &order).await.unwrap();
        let once = positions(&repo, ALICE).await;
        repo.reorder(ALICE, &order).await.unwrap();
        let twice = positions(&repo, ALICE).await;

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_reorder_skips_foreign_and_unknown_ids() {
        let repo = setup_test_db().await;
        let alice = seed(&repo, ALICE, 2).await;
        let bob = seed(&repo, BOB, 2).await;
        let bob_before = positions(&repo, BOB).await;

        let outcome = repo
            .reorder(ALICE, &[bob[1], alice[1], 9999, alice[0]])
            .await
            .unwrap();

        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, vec![bob[1], 9999]);
        // Indices come from the submitted sequence, skipped tokens included
        assert_eq!(positions(&repo, ALICE).await, vec![(alice[0], 3), (alice[1], 1)]);
        assert_eq!(positions(&repo, BOB).await, bob_before);
    }

    #[tokio::test]
    async fn test_reorder_subset_leaves_others_untouched() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;

        repo.reorder(ALICE, &[ids[2]]).await.unwrap();

        // ids[0] keeps 0, so two tasks now share key 0
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 0), (ids[1], 1), (ids[2], 0)]
        );
    }

    #[tokio::test]
    async fn test_reorder_duplicate_ids_last_index_wins() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 2).await;

        repo.reorder(ALICE, &[ids[0], ids[1], ids[0]]).await.unwrap();
        assert_eq!(positions(&repo, ALICE).await, vec![(ids[0], 2), (ids[1], 1)]);
    }

    #[tokio::test]
    async fn test_reorder_failure_rolls_back_batch() {
        let (db_state, repo) = setup_with_state().await;
        let ids = seed(&repo, ALICE, 3).await;
        // The last write of the batch fails after two have gone through
        block_position_update(&db_state, ids[0]).await;

        let result = repo.reorder(ALICE, &[ids[2], ids[1], ids[0]]).await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]
        );

        // Nothing was left half-open on the connection
        unblock_position_update(&db_state).await;
        repo.reorder(ALICE, &[ids[2], ids[1], ids[0]]).await.unwrap();
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 2), (ids[1], 1), (ids[2], 0)]
        );
    }

    #[tokio::test]
    async fn test_reorder_dense_renumbers_after_subset() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;
        seed(&repo, BOB, 2).await;

        let outcome = repo.reorder_dense(ALICE, &[ids[2], 999]).await.unwrap();

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, vec![999]);
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 0), (ids[1], 2), (ids[2], 1)]
        );
        let bob_keys: Vec<_> = positions(&repo, BOB).await.into_iter().map(|(_, p)| p).collect();
        assert_eq!(bob_keys, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_reorder_dense_failure_in_renumber_rolls_back_reorder() {
        let (db_state, repo) = setup_with_state().await;
        let ids = seed(&repo, ALICE, 3).await;
        // The reorder itself only writes ids[2]; the renumber then moves ids[1]
        block_position_update(&db_state, ids[1]).await;

        assert!(repo.reorder_dense(ALICE, &[ids[2]]).await.is_err());
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]
        );
    }

    #[tokio::test]
    async fn test_reindex_repairs_collisions() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;
        repo.reorder(ALICE, &[ids[2]]).await.unwrap();

        let count = repo.reindex(ALICE).await.unwrap();

        assert_eq!(count, 3);
        // Ties at key 0 are broken by id
        assert_eq!(
            positions(&repo, ALICE).await,
            vec![(ids[0], 0), (ids[1], 2), (ids[2], 1)]
        );
        assert_eq!(listed_ids(&repo, ALICE).await, vec![ids[0], ids[2], ids[1]]);
    }

    #[tokio::test]
    async fn test_reindex_closes_gaps_after_delete() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 3).await;
        repo.delete(ALICE, ids[0]).await.unwrap();

        repo.reindex(ALICE).await.unwrap();
        assert_eq!(positions(&repo, ALICE).await, vec![(ids[1], 0), (ids[2], 1)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reorders_are_never_partial() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 5).await;
        let forward = ids.clone();
        let backward: Vec<u32> = ids.iter().rev().copied().collect();

        let mut writers = Vec::new();
        let mut readers = Vec::new();
        for i in 0..20 {
            let writer = repo.clone();
            let order = if i % 2 == 0 { forward.clone() } else { backward.clone() };
            writers.push(tokio::spawn(async move { writer.reorder(ALICE, &order).await }));

            let reader = repo.clone();
            readers.push(tokio::spawn(async move {
                reader
                    .list(ALICE)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.id)
                    .collect::<Vec<u32>>()
            }));
        }
        for writer in writers {
            writer.await.unwrap().unwrap();
        }
        for reader in readers {
            let seen = reader.await.unwrap();
            assert!(seen == forward || seen == backward, "partial order observed: {:?}", seen);
        }

        let last = listed_ids(&repo, ALICE).await;
        assert!(last == forward || last == backward);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dense_reorders_keep_keys_dense() {
        let repo = setup_test_db().await;
        let ids = seed(&repo, ALICE, 4).await;

        let mut writers = Vec::new();
        let mut readers = Vec::new();
        for i in 0..20 {
            let writer = repo.clone();
            let order = if i % 2 == 0 { vec![ids[3]] } else { vec![ids[0], ids[1]] };
            writers.push(tokio::spawn(async move { writer.reorder_dense(ALICE, &order).await }));

            let reader = repo.clone();
            readers.push(tokio::spawn(async move {
                reader
                    .list(ALICE)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.position)
                    .collect::<Vec<i32>>()
            }));
        }
        for writer in writers {
            writer.await.unwrap().unwrap();
        }
        for reader in readers {
            let keys = reader.await.unwrap();
            assert_eq!(keys, vec![0, 1, 2, 3], "non-dense keys observed");
        }
    }

    #[tokio::test]
    async fn test_search_and_count() {
        let repo = setup_test_db().await;
        repo.create(ALICE, &TaskDraft::new("Buy milk", "")).await.unwrap();
        let done = repo.create(ALICE, &TaskDraft::new("Buy bread", "")).await.unwrap();
        repo.create(ALICE, &TaskDraft::new("Call mom", "")).await.unwrap();
        repo.create(BOB, &TaskDraft::new("Buy a car", "")).await.unwrap();
        repo.update(
            ALICE,
            done.id,
            &TaskDraft {
                title: "Buy bread".to_string(),
                description: String::new(),
                complete: true,
            },
        )
        .await
        .unwrap();

        let found = repo.search(ALICE, "Buy").await.unwrap();
        let titles: Vec<_> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk", "Buy bread"]);
        assert!(repo.search(ALICE, "buy").await.unwrap().is_empty());

        assert_eq!(repo.count_incomplete(ALICE).await.unwrap(), 2);
        assert_eq!(repo.count_incomplete(BOB).await.unwrap(), 1);
    }
}
