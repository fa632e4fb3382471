mod common;

use admin_service::dtos::menu::{CreateMenuRequest, UpdateMenuRequest};
use admin_service::models::{Menu, MenuKind, Role, UserRole};
use admin_service::services::ServiceError;
use admin_service::store::UserStore;
use std::collections::HashSet;
use uuid::Uuid;

fn menu_request(label: &str, parent_id: Option<Uuid>) -> CreateMenuRequest {
    CreateMenuRequest {
        label: label.to_string(),
        path: format!("/{}", label.to_lowercase()),
        kind: MenuKind::Page,
        parent_id,
        role_id: None,
    }
}

async fn member_role(app: &common::TestApp) -> Role {
    let email = common::signup_verified(app, "member@x.com", "member", "password123").await;
    let user = app.store.find_by_email(&email).await.unwrap().unwrap();
    app.store
        .insert_role(Role::new(user.id, UserRole::Member, None))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_assign_replaces_rather_than_unions() {
    let app = common::setup();
    let role = member_role(&app).await;
    let actor = role.user_id;

    let m1 = app
        .state
        .permissions
        .create_menu(menu_request("Users", None), actor)
        .await
        .unwrap();
    let m2 = app
        .state
        .permissions
        .create_menu(menu_request("Tasks", None), actor)
        .await
        .unwrap();

    app.state
        .permissions
        .assign(role.id, HashSet::from([m1.id, m2.id]))
        .await
        .unwrap();

    app.state
        .permissions
        .assign(role.id, HashSet::from([m2.id]))
        .await
        .unwrap();

    let effective = app.state.permissions.effective_menus(role.id).await.unwrap();
    let ids: HashSet<Uuid> = effective.iter().map(|m: &Menu| m.id).collect();
    assert_eq!(ids, HashSet::from([m2.id]));
}

#[tokio::test]
async fn test_super_admin_sees_entire_forest_without_edges() {
    let app = common::setup();
    app.state.seed.seed_super_admin().await.unwrap();

    let super_role = app
        .store
        .find_role_by_user(app.state.config.seed.super_admin_id)
        .await
        .unwrap()
        .unwrap();
    assert!(super_role.super_admin);

    let actor = super_role.user_id;
    let root = app
        .state
        .permissions
        .create_menu(menu_request("System", None), actor)
        .await
        .unwrap();
    app.state
        .permissions
        .create_menu(menu_request("Users", Some(root.id)), actor)
        .await
        .unwrap();

    let effective = app
        .state
        .permissions
        .effective_menus(super_role.id)
        .await
        .unwrap();
    assert_eq!(effective.len(), 2);
}

#[tokio::test]
async fn test_no_parent_child_inheritance() {
    let app = common::setup();
    let role = member_role(&app).await;
    let actor = role.user_id;

    let parent = app
        .state
        .permissions
        .create_menu(menu_request("System", None), actor)
        .await
        .unwrap();
    let child = app
        .state
        .permissions
        .create_menu(menu_request("Users", Some(parent.id)), actor)
        .await
        .unwrap();

    // Granting the child does not leak the parent, and vice versa.
    app.state
        .permissions
        .assign(role.id, HashSet::from([child.id]))
        .await
        .unwrap();
    let effective = app.state.permissions.effective_menus(role.id).await.unwrap();
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[0].id, child.id);

    app.state
        .permissions
        .assign(role.id, HashSet::from([parent.id]))
        .await
        .unwrap();
    let effective = app.state.permissions.effective_menus(role.id).await.unwrap();
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[0].id, parent.id);
}

#[tokio::test]
async fn test_assign_unknown_role_or_menu() {
    let app = common::setup();
    let role = member_role(&app).await;

    let err = app
        .state
        .permissions
        .assign(Uuid::new_v4(), HashSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::RoleNotFound));

    let err = app
        .state
        .permissions
        .assign(role.id, HashSet::from([Uuid::new_v4()]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MenuNotFound));
}

#[tokio::test]
async fn test_reparent_rejects_cycles() {
    let app = common::setup();
    let actor = Uuid::new_v4();

    let a = app
        .state
        .permissions
        .create_menu(menu_request("Alpha", None), actor)
        .await
        .unwrap();
    let b = app
        .state
        .permissions
        .create_menu(menu_request("Beta", Some(a.id)), actor)
        .await
        .unwrap();
    let c = app
        .state
        .permissions
        .create_menu(menu_request("Gamma", Some(b.id)), actor)
        .await
        .unwrap();

    // A node cannot become its own parent.
    let err = app
        .state
        .permissions
        .update_menu(
            a.id,
            UpdateMenuRequest {
                parent_id: Some(Some(a.id)),
                ..Default::default()
            },
            actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MenuCycle));

    // Nor move under one of its descendants.
    let err = app
        .state
        .permissions
        .update_menu(
            a.id,
            UpdateMenuRequest {
                parent_id: Some(Some(c.id)),
                ..Default::default()
            },
            actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MenuCycle));

    // A legal reparent still works: move Gamma directly under Alpha.
    let moved = app
        .state
        .permissions
        .update_menu(
            c.id,
            UpdateMenuRequest {
                parent_id: Some(Some(a.id)),
                ..Default::default()
            },
            actor,
        )
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
}

#[tokio::test]
async fn test_create_menu_requires_existing_parent() {
    let app = common::setup();

    let err = app
        .state
        .permissions
        .create_menu(menu_request("Orphan", Some(Uuid::new_v4())), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MenuNotFound));
}
