//! End-to-end coverage of the dashboard and inbox over the fixture ports.

use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use doctrack::domain::ports::{AttendRequest, FixtureDocumentsApi, RejectRequest};
use doctrack::domain::stats::DepartmentCount;
use doctrack::domain::{
    Capabilities, Document, DocumentActionsService, DueSoonThreshold, ErrorCode, InboxCounts,
    InboxFilter, InboxService, InboxTab, KpiSummary, RefreshOutcome, Role, RollupOptions, Status,
    aggregate,
};
use doctrack::test_support::{MutableClock, document, fixed_now, session_with_role};
use rstest::{fixture, rstest};

#[fixture]
fn documents() -> Vec<Document> {
    vec![
        document(Status::Pendiente)
            .due_in(-TimeDelta::hours(1))
            .department("Finanzas")
            .build(),
        document(Status::EnProceso)
            .due_in(TimeDelta::hours(24))
            .department("Finanzas")
            .build(),
        document(Status::Atendido)
            .received_at(fixed_now() - TimeDelta::days(3))
            .attended_at(fixed_now() - TimeDelta::days(1))
            .department("Jurídico")
            .build(),
        document(Status::Rechazado)
            .sender_dependency("Secretaría de Salud")
            .build(),
        document(Status::Pendiente)
            .urgent()
            .department("Finanzas")
            .build(),
    ]
}

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

#[rstest]
fn rollup_covers_kpis_charts_and_trend(documents: Vec<Document>) {
    let rollup = aggregate(&documents, &RollupOptions::at(fixed_now()));

    assert_eq!(
        rollup.kpis,
        KpiSummary {
            total: 5,
            pendientes: 2,
            en_tramite: 1,
            atendidos: 1,
            vencidos: 1,
        }
    );

    let slices: Vec<(&str, usize)> = rollup
        .by_status
        .iter()
        .map(|slice| (slice.label, slice.count))
        .collect();
    assert_eq!(
        slices,
        [("Pendiente", 1), ("En Trámite", 1), ("Atendido", 1), ("Vencido", 1)]
    );

    let departments = |label: &str, count: usize| DepartmentCount {
        label: label.to_owned(),
        count,
    };
    assert_eq!(
        rollup.by_department,
        [
            departments("Finanzas", 3),
            departments("Jurídico", 1),
            departments("Secretaría de Salud", 1),
        ]
    );

    assert_eq!(rollup.trend.len(), 7);
    assert_eq!(rollup.trend.first().map(|entry| entry.date), Some(day(3, 4)));
    let last = rollup.trend.last().expect("trend has days");
    assert_eq!((last.date, last.incoming, last.completed), (day(3, 10), 4, 0));
    let attended_day = rollup
        .trend
        .iter()
        .find(|entry| entry.date == day(3, 9))
        .expect("attended day is in range");
    assert_eq!(attended_day.completed, 1);
    let received_day = rollup
        .trend
        .iter()
        .find(|entry| entry.date == day(3, 7))
        .expect("received day is in range");
    assert_eq!(received_day.incoming, 1);
}

#[rstest]
#[tokio::test]
async fn inbox_counts_follow_the_clock(documents: Vec<Document>) {
    let clock = Arc::new(MutableClock::new(fixed_now()));
    let inbox = InboxService::new(
        Arc::new(FixtureDocumentsApi { documents }),
        clock.clone(),
        DueSoonThreshold::default(),
    );

    assert_eq!(inbox.refresh().await, Ok(RefreshOutcome::Applied));
    assert_eq!(
        inbox.counts().expect("counts"),
        InboxCounts {
            total: 5,
            pendientes: 2,
            urgentes: 1,
            atendidos: 1,
            vencidos: 1,
        }
    );

    clock.advance(TimeDelta::days(2));
    assert_eq!(inbox.counts().expect("counts").vencidos, 2);

    let finanzas = InboxFilter::tab(InboxTab::Pendientes).with_department("Finanzas");
    assert_eq!(inbox.visible(&finanzas).expect("visible").len(), 2);
}

#[rstest]
#[tokio::test]
async fn document_actions_respect_role_and_status(documents: Vec<Document>) {
    let service = DocumentActionsService::new(
        Arc::new(FixtureDocumentsApi::default()),
        Arc::new(Capabilities::standard()),
    );
    let in_process = &documents[1];
    let attended = &documents[2];
    let gestor = session_with_role(Role::Gestor);

    let attend = AttendRequest {
        summary: "Se envió la información solicitada".to_owned(),
        outcome: Status::Atendido,
        response_file: None,
    };
    assert_eq!(
        service.attend(&gestor, in_process, attend.clone()).await,
        Ok(Status::Atendido)
    );

    let denied = service
        .attend(&session_with_role(Role::Usuario), in_process, attend)
        .await
        .expect_err("usuario cannot attend");
    assert_eq!(denied.code(), ErrorCode::Forbidden);

    let reject = RejectRequest {
        reason: "Documento duplicado".to_owned(),
    };
    let conflict = service
        .reject(&gestor, attended, reject)
        .await
        .expect_err("attended documents are closed");
    assert_eq!(conflict.code(), ErrorCode::Conflict);
}
