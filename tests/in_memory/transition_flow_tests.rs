//! End-to-end status transition flows over the in-memory store.

use std::sync::Arc;

use daguerre::events::CacheInvalidationBus;
use daguerre::identity::UserId;
use daguerre::project::{
    adapters::memory::{InMemoryProjectRepository, StaticPermissions},
    domain::{
        Client, ClientCategory, ClientId, Invoice, InvoiceId, InvoiceStatus, Permission,
        PersistedProjectData, Project, ProjectStatus,
    },
    ports::ProjectRepository,
    services::{ProjectStatusService, TransitionOutcome},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService =
    ProjectStatusService<InMemoryProjectRepository, StaticPermissions, DefaultClock>;

struct World {
    service: TestService,
    repository: InMemoryProjectRepository,
    permissions: Arc<StaticPermissions>,
}

#[fixture]
fn world() -> World {
    let repository = InMemoryProjectRepository::new();
    let permissions = Arc::new(StaticPermissions::new());
    let service = ProjectStatusService::new(
        Arc::new(repository.clone()),
        Arc::clone(&permissions),
        Arc::new(DefaultClock),
        Arc::new(CacheInvalidationBus::new()),
    );
    World {
        service,
        repository,
        permissions,
    }
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

/// Rebuilds a stored project with its invoice settled, as the billing
/// system would after recording the final payment.
fn settle_invoice(project: &Project) -> Project {
    let settled = project
        .invoice()
        .map(|invoice| Invoice::new(invoice.id(), InvoiceStatus::FullyPaid, 0));
    Project::from_persisted(PersistedProjectData {
        id: project.id(),
        client: *project.client(),
        invoice: settled,
        status: project.status(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_of_walk_in_work_waits_for_payment_then_proceeds(world: World) {
    let approver = UserId::new();
    world
        .permissions
        .grant(approver, Permission::ProjectApprove);
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::PartiallyPaid, 5_000);
    let project = walk_in_project(Some(invoice));
    world
        .repository
        .store(&project)
        .await
        .expect("project seeding should succeed");

    // The invoiced project only offers reopening as a next status.
    let offered = world
        .service
        .offerable_statuses(project.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(offered, vec![ProjectStatus::Reopen]);

    // Delivery is blocked while money is outstanding.
    let blocked = world
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, approver)
        .await
        .expect("the request itself should not error");
    let reason = blocked.reason().unwrap_or_default();
    assert!(reason.contains("paid"));
    assert!(reason.contains("₹50.00"));

    // The client settles; the same request now goes through.
    let paid = settle_invoice(&project);
    world
        .repository
        .update(&paid)
        .await
        .expect("settling should succeed");
    let outcome = world
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, approver)
        .await
        .expect("the request itself should not error");
    assert!(outcome.is_applied());

    let stored = world
        .repository
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert_eq!(stored.status(), ProjectStatus::Delivered);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_settled_project_cannot_be_reopened(world: World) {
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::FullyPaid, 0);
    let project = walk_in_project(Some(invoice)).with_status(ProjectStatus::Delivered);
    world
        .repository
        .store(&project)
        .await
        .expect("project seeding should succeed");

    let outcome = world
        .service
        .request_transition(project.id(), ProjectStatus::Reopen, UserId::new())
        .await
        .expect("the request itself should not error");

    assert!(matches!(outcome, TransitionOutcome::Blocked { .. }));
    let stored = world
        .repository
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert_eq!(stored.status(), ProjectStatus::Delivered);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_without_approval_authority_is_blocked(world: World) {
    let plain_user = UserId::new();
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::FullyPaid, 0);
    let project = walk_in_project(Some(invoice));
    world
        .repository
        .store(&project)
        .await
        .expect("project seeding should succeed");

    let outcome = world
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, plain_user)
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
async fn an_uninvoiced_completed_project_delivers_without_ceremony(world: World) {
    let project = walk_in_project(None).with_status(ProjectStatus::Completed);
    world
        .repository
        .store(&project)
        .await
        .expect("project seeding should succeed");

    let offered = world
        .service
        .offerable_statuses(project.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(
        offered,
        vec![ProjectStatus::Delivered, ProjectStatus::Reopen]
    );

    let outcome = world
        .service
        .request_transition(project.id(), ProjectStatus::Delivered, UserId::new())
        .await
        .expect("the request itself should not error");
    assert!(outcome.is_applied());

    // Once delivered, only reopening is offered.
    let offered = world
        .service
        .offerable_statuses(project.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(offered, vec![ProjectStatus::Reopen]);
}
