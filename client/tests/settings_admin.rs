//! Settings screens over the fixture ports: department picker, accounts,
//! holiday calendar and catalogs.

use std::sync::Arc;

use chrono::NaiveDate;
use doctrack::domain::ports::{
    FixtureCatalogsApi, FixtureDepartmentsApi, FixtureHolidaysApi, FixtureUsersApi,
};
use doctrack::domain::{
    CatalogAdminService, CatalogCategory, CatalogItem, Capabilities, Department, DepartmentDirectory,
    DepartmentId, ErrorCode, Holiday, HolidayAdminService, HolidayId, Role, UserAdminService,
    UserDraft,
};
use doctrack::test_support::{fixture_department_id, session_with_role, user_with_role};
use rstest::{fixture, rstest};

fn unit(id: DepartmentId, name: &str, children: Vec<Department>) -> Department {
    Department {
        id,
        name: name.to_owned(),
        code: name.to_uppercase(),
        description: None,
        level: None,
        titular_name: None,
        email: None,
        children,
    }
}

fn id(raw: &str) -> DepartmentId {
    DepartmentId::new(raw).expect("fixture uuid")
}

#[fixture]
fn capabilities() -> Arc<Capabilities> {
    Arc::new(Capabilities::standard())
}

#[fixture]
fn directory(capabilities: Arc<Capabilities>) -> DepartmentDirectory<FixtureDepartmentsApi> {
    let cartera = unit(id("00000000-0000-4000-8000-000000000003"), "Cartera", Vec::new());
    let cobranza = unit(id("00000000-0000-4000-8000-000000000002"), "Cobranza", vec![cartera]);
    let credito = unit(fixture_department_id(), "Crédito", vec![cobranza]);
    let api = FixtureDepartmentsApi {
        roots: vec![credito, unit(id("00000000-0000-4000-8000-000000000009"), "Archivo", Vec::new())],
    };
    DepartmentDirectory::new(Arc::new(api), capabilities)
}

#[rstest]
#[tokio::test]
async fn picker_walks_three_levels(directory: DepartmentDirectory<FixtureDepartmentsApi>) {
    let session = session_with_role(Role::Gestor);
    let mut picker = directory.picker(&session).await.expect("roots");
    assert_eq!(picker.options(0).len(), 2);

    directory
        .choose(&session, &mut picker, 0, Some(fixture_department_id()))
        .await
        .expect("level one");
    let cobranza = picker.options(1)[0].id;
    directory
        .choose(&session, &mut picker, 1, Some(cobranza))
        .await
        .expect("level two");
    let cartera = picker.options(2)[0].id;
    let selected = directory
        .choose(&session, &mut picker, 2, Some(cartera))
        .await
        .expect("level three");
    assert_eq!(selected, Some(cartera));

    let selected = directory
        .choose(&session, &mut picker, 0, Some(id("00000000-0000-4000-8000-000000000009")))
        .await
        .expect("switch root");
    assert_eq!(picker.depth(), 1, "a leaf root opens no further level");
    assert_eq!(selected, Some(id("00000000-0000-4000-8000-000000000009")));
}

#[rstest]
#[tokio::test]
async fn flat_list_covers_every_unit(directory: DepartmentDirectory<FixtureDepartmentsApi>) {
    let all = directory.all(&session_with_role(Role::Auditor)).await.expect("list");
    let names: Vec<&str> = all.iter().map(|unit| unit.name.as_str()).collect();
    assert_eq!(names, ["Crédito", "Cobranza", "Cartera", "Archivo"]);
}

#[rstest]
#[tokio::test]
async fn duplicate_accounts_surface_the_backend_message(capabilities: Arc<Capabilities>) {
    let api = FixtureUsersApi {
        users: vec![user_with_role(Role::Gestor)],
    };
    let service = UserAdminService::new(Arc::new(api), capabilities);
    let draft = UserDraft::new("Otra Persona", "gestor@example.gob.mx").expect("valid");
    let error = service
        .create(&session_with_role(Role::Admin), &draft)
        .await
        .expect_err("taken");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.user_message(), "El correo ya está registrado");
}

#[rstest]
#[tokio::test]
async fn recurring_holidays_block_marking_in_later_years(capabilities: Arc<Capabilities>) {
    let api = FixtureHolidaysApi {
        holidays: vec![Holiday {
            id: HolidayId::new("1"),
            date: NaiveDate::from_ymd_opt(2024, 9, 16).expect("date"),
            description: "Independencia".to_owned(),
            recurring: true,
        }],
    };
    let service = HolidayAdminService::new(Arc::new(api), capabilities);
    let session = session_with_role(Role::Admin);
    let error = service
        .mark(
            &session,
            NaiveDate::from_ymd_opt(2026, 9, 16).expect("date"),
            "Otra vez",
            false,
        )
        .await
        .expect_err("already marked");
    assert_eq!(error.code(), ErrorCode::Conflict);

    let removed = service
        .unmark(&session, NaiveDate::from_ymd_opt(2026, 9, 16).expect("date"))
        .await;
    assert!(removed.is_ok());
}

#[rstest]
#[tokio::test]
async fn new_catalog_items_follow_the_category_order(capabilities: Arc<Capabilities>) {
    let existing = CatalogItem {
        id: "1".to_owned(),
        category: CatalogCategory::ReceptionMode,
        name: "Ventanilla".to_owned(),
        code: "VEN".to_owned(),
        is_active: true,
        order: 5,
        metadata: None,
    };
    let other = CatalogItem {
        category: CatalogCategory::DocType,
        order: 40,
        ..existing.clone()
    };
    let api = FixtureCatalogsApi {
        items: vec![existing, other],
    };
    let service = CatalogAdminService::new(Arc::new(api), capabilities);
    let draft = service
        .create(
            &session_with_role(Role::Admin),
            CatalogCategory::ReceptionMode,
            "Correo electrónico",
            "MAIL",
            None,
        )
        .await
        .expect("created");
    assert_eq!(draft.order, 6);
}
