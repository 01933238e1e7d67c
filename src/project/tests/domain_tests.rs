//! Unit tests for project domain types.

use crate::project::domain::{
    ClientCategory, Invoice, InvoiceId, InvoiceStatus, ProjectStatus,
};
use rstest::rstest;

#[rstest]
#[case(ProjectStatus::Draft, "DRAFT")]
#[case(ProjectStatus::Active, "ACTIVE")]
#[case(ProjectStatus::InProgress, "IN_PROGRESS")]
#[case(ProjectStatus::Review, "REVIEW")]
#[case(ProjectStatus::Reopen, "REOPEN")]
#[case(ProjectStatus::Completed, "COMPLETED")]
#[case(ProjectStatus::OnHold, "ON_HOLD")]
#[case(ProjectStatus::Delivered, "DELIVERED")]
#[case(ProjectStatus::Requested, "REQUESTED")]
fn project_status_round_trips_through_its_storage_form(
    #[case] status: ProjectStatus,
    #[case] stored: &str,
) {
    assert_eq!(status.as_str(), stored);
    assert_eq!(ProjectStatus::try_from(stored), Ok(status));
}

#[rstest]
fn project_status_parses_case_insensitively() {
    assert_eq!(
        ProjectStatus::try_from("in_progress"),
        Ok(ProjectStatus::InProgress)
    );
    assert_eq!(
        ProjectStatus::try_from(" delivered "),
        Ok(ProjectStatus::Delivered)
    );
}

#[rstest]
fn project_status_rejects_unknown_values() {
    assert!(ProjectStatus::try_from("SHIPPED").is_err());
}

#[rstest]
#[case(InvoiceStatus::FullyPaid, 5_000, true)]
#[case(InvoiceStatus::PartiallyPaid, 0, true)]
#[case(InvoiceStatus::Unpaid, -250, true)]
#[case(InvoiceStatus::PartiallyPaid, 5_000, false)]
#[case(InvoiceStatus::Unpaid, 1, false)]
fn an_invoice_is_settled_when_fully_paid_or_nothing_is_due(
    #[case] status: InvoiceStatus,
    #[case] balance_minor: i64,
    #[case] expected: bool,
) {
    let invoice = Invoice::new(InvoiceId::new(), status, balance_minor);
    assert_eq!(invoice.is_settled(), expected);
}

#[rstest]
#[case(5_000, "₹50.00")]
#[case(105, "₹1.05")]
#[case(0, "₹0.00")]
#[case(999_99, "₹999.99")]
fn balances_display_as_rupees_and_paise(#[case] balance_minor: i64, #[case] expected: &str) {
    let invoice = Invoice::new(InvoiceId::new(), InvoiceStatus::Unpaid, balance_minor);
    assert_eq!(invoice.balance_display(), expected);
}

#[rstest]
#[case("permanent", ClientCategory::Permanent)]
#[case("walk_in", ClientCategory::WalkIn)]
#[case("walkIn", ClientCategory::WalkIn)]
#[case("walk-in", ClientCategory::WalkIn)]
fn client_categories_parse_their_legacy_spellings(
    #[case] raw: &str,
    #[case] expected: ClientCategory,
) {
    assert_eq!(ClientCategory::try_from(raw), Ok(expected));
}

#[rstest]
fn client_category_rejects_unknown_values() {
    assert!(ClientCategory::try_from("corporate").is_err());
}
