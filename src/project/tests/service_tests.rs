//! Service orchestration tests for status transitions.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::events::{CacheInvalidationBus, EventKind};
use crate::identity::UserId;
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{
        Client, ClientCategory, ClientId, Invoice, InvoiceId, InvoiceStatus, Project,
        ProjectStatus,
    },
    ports::{MockPermissionOracle, ProjectRepository},
    services::{ProjectStatusError, ProjectStatusService, TransitionOutcome},
};
use mockable::DefaultClock;
use rstest::rstest;

type TestService =
    ProjectStatusService<InMemoryProjectRepository, MockPermissionOracle, DefaultClock>;

struct Harness {
    service: TestService,
    repository: InMemoryProjectRepository,
    bus: Arc<CacheInvalidationBus>,
}

fn harness(can_approve: bool) -> Harness {
    let repository = InMemoryProjectRepository::new();
    let bus = Arc::new(CacheInvalidationBus::new());
    let mut oracle = MockPermissionOracle::new();
    oracle
        .expect_has_permission()
        .returning(move |_, _| can_approve);
    let service = ProjectStatusService::new(
        Arc::new(repository.clone()),
        Arc::new(oracle),
        Arc::new(DefaultClock),
        Arc::clone(&bus),
    );
    Harness {
        service,
        repository,
        bus,
    }
}

async fn seed_project(harness: &Harness, project: &Project) {
    harness
        .repository
        .store(project)
        .await
        .expect("project seeding should succeed");
}

fn walk_in_project(invoice: Option<Invoice>) -> Project {
    let base = Project::new(
        Client::new(ClientId::new(), ClientCategory::WalkIn),
        &DefaultClock,
    )
    .with_status(ProjectStatus::Active);
    match invoice {
        Some(linked) => base.with_invoice(linked),
        None => base,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_approved_transition_is_persisted_and_published() {
    let fixture = harness(true);
    let project = walk_in_project(None);
    seed_project(&fixture, &project).await;
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    fixture
        .bus
        .subscribe(EventKind::ProjectUpdated, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscription should succeed");

    let outcome = fixture
        .service
        .request_transition(project.id(), ProjectStatus::InProgress, UserId::new())
        .await
        .expect("transition should succeed");

    assert!(outcome.is_applied());
    assert_eq!(
        outcome.project().map(Project::status),
        Some(ProjectStatus::InProgress)
    );
    let stored = fixture
        .repository
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert_eq!(stored.status(), ProjectStatus::InProgress);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_blocked_transition_reports_its_reason_without_persisting() {
    let fixture = harness(true);
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::Unpaid, 5_000);
    let project = walk_in_project(Some(invoice));
    seed_project(&fixture, &project).await;

    let outcome = fixture
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, UserId::new())
        .await
        .expect("the request itself should not error");

    assert!(matches!(outcome, TransitionOutcome::Blocked { .. }));
    assert!(outcome.reason().unwrap_or_default().contains("paid"));
    let stored = fixture
        .repository
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert_eq!(stored.status(), ProjectStatus::Active);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_without_the_approve_permission_is_blocked() {
    let fixture = harness(false);
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::Unpaid, 0);
    let project = walk_in_project(Some(invoice));
    seed_project(&fixture, &project).await;

    let outcome = fixture
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, UserId::new())
        .await
        .expect("the request itself should not error");

    assert!(
        outcome
            .reason()
            .unwrap_or_default()
            .contains("permission")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offerable_statuses_follow_the_invoice_and_current_status() {
    let fixture = harness(true);
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::Unpaid, 5_000);
    let invoiced = walk_in_project(Some(invoice));
    seed_project(&fixture, &invoiced).await;
    let completed = walk_in_project(None).with_status(ProjectStatus::Completed);
    seed_project(&fixture, &completed).await;

    assert_eq!(
        fixture
            .service
            .offerable_statuses(invoiced.id())
            .await
            .expect("lookup should succeed"),
        vec![ProjectStatus::Reopen]
    );
    assert_eq!(
        fixture
            .service
            .offerable_statuses(completed.id())
            .await
            .expect("lookup should succeed"),
        vec![ProjectStatus::Delivered, ProjectStatus::Reopen]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_missing_project_is_reported_as_not_found() {
    let fixture = harness(true);
    let ghost = walk_in_project(None);

    let result = fixture
        .service
        .request_transition(ghost.id(), ProjectStatus::Active, UserId::new())
        .await;

    assert!(matches!(result, Err(ProjectStatusError::NotFound(id)) if id == ghost.id()));
}
