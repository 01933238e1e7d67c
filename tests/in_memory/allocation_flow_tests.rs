//! End-to-end allocation flows over the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use daguerre::allocation::{
    adapters::memory::InMemoryAssignmentRepository,
    domain::{Allocation, Task, TaskId, TaskStatus},
    ports::AssignmentRepository,
    services::TaskAssignmentAllocator,
};
use daguerre::events::{CacheInvalidationBus, EventKind};
use daguerre::identity::UserId;
use daguerre::project::domain::ProjectId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestAllocator = TaskAssignmentAllocator<InMemoryAssignmentRepository, DefaultClock>;

struct World {
    allocator: TestAllocator,
    repository: InMemoryAssignmentRepository,
    bus: Arc<CacheInvalidationBus>,
}

#[fixture]
fn world() -> World {
    let repository = InMemoryAssignmentRepository::new();
    let bus = Arc::new(CacheInvalidationBus::new());
    let allocator = TaskAssignmentAllocator::new(
        Arc::new(repository.clone()),
        Arc::new(DefaultClock),
        Arc::clone(&bus),
    );
    World {
        allocator,
        repository,
        bus,
    }
}

async fn seed_task(world: &World, total_due: u32) -> TaskId {
    let task = Task::new(ProjectId::new(), total_due, &DefaultClock);
    world
        .repository
        .store_task(&task)
        .await
        .expect("task seeding should succeed");
    task.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_team_is_assigned_rebalanced_and_completes_the_task(world: World) {
    let task_id = seed_task(&world, 12).await;
    let lead = UserId::new();
    let second = UserId::new();
    let third = UserId::new();
    let invalidations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invalidations);
    world
        .bus
        .subscribe(EventKind::TaskAssignmentChanged, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscription should succeed");

    // Initial three-way split: 12 images over three editors.
    let outcome = world
        .allocator
        .assign_users(task_id, &[lead, second, third])
        .await
        .expect("initial assignment should succeed");
    assert_eq!(outcome.operations_applied(), 3);
    let allocated: Vec<u32> = outcome.assignments().iter().map(|a| a.allocated()).collect();
    assert_eq!(allocated, vec![4, 4, 4]);

    // The third editor drops out; their images flow back to the remainder
    // and are re-split across the remaining pair.
    let rebalanced = world
        .allocator
        .auto_distribute(task_id, &[lead, second])
        .await
        .expect("auto distribution should succeed");
    assert_eq!(
        rebalanced,
        vec![Allocation::new(lead, 6), Allocation::new(second, 6)]
    );
    let outcome = world
        .allocator
        .commit(task_id, &rebalanced)
        .await
        .expect("rebalancing commit should succeed");
    // One removal and two quantity updates.
    assert_eq!(outcome.operations_applied(), 3);
    assert_eq!(outcome.assignments().len(), 2);

    // Both editors report their work; the second's final report lands
    // exactly on the headroom boundary.
    world
        .allocator
        .record_completion(task_id, lead, 6)
        .await
        .expect("lead completion should succeed");
    world
        .allocator
        .record_completion(task_id, second, 6)
        .await
        .expect("second completion should succeed");
    let task = world
        .repository
        .find_task(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(task.status(), TaskStatus::Completed);

    // One invalidation per committed diff.
    assert_eq!(invalidations.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn over_reporting_after_a_refetch_window_is_still_rejected(world: World) {
    let task_id = seed_task(&world, 10).await;
    let caller = UserId::new();
    let colleague = UserId::new();
    world
        .allocator
        .assign_users(task_id, &[caller, colleague])
        .await
        .expect("assignment should succeed");

    // The colleague's report lands first; the caller's stale view would
    // have allowed 7, but the check re-reads the latest state.
    world
        .allocator
        .record_completion(task_id, colleague, 7)
        .await
        .expect("colleague completion should succeed");
    let rejected = world.allocator.record_completion(task_id, caller, 4).await;

    assert!(rejected.is_err());
    let accepted = world
        .allocator
        .record_completion(task_id, caller, 3)
        .await
        .expect("a report within the headroom should succeed");
    assert_eq!(accepted.completed(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_preserves_seeds_for_retained_editors(world: World) {
    let task_id = seed_task(&world, 9).await;
    let veteran = UserId::new();
    world
        .allocator
        .commit(task_id, &[Allocation::new(veteran, 3)])
        .await
        .expect("initial commit should succeed");

    let newcomer = UserId::new();
    let proposal = world
        .allocator
        .propose(task_id, &[veteran, newcomer])
        .await
        .expect("proposal should succeed");
    assert_eq!(
        proposal.allocations(),
        &[Allocation::new(veteran, 3), Allocation::new(newcomer, 6)]
    );

    let outcome = world
        .allocator
        .commit(task_id, proposal.allocations())
        .await
        .expect("commit should succeed");
    // The veteran's record is untouched; only the newcomer's is created.
    assert_eq!(outcome.operations_applied(), 1);
    assert_eq!(outcome.assignments().len(), 2);
}
