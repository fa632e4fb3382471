mod common;

use admin_service::dtos::auth::{AcceptInviteRequest, InviteRequest, SignupRequest};
use admin_service::services::ServiceError;
use admin_service::store::UserStore;
use uuid::Uuid;

fn invite_request(email: &str, username: &str) -> InviteRequest {
    InviteRequest {
        email: email.to_string(),
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_invite_and_redeem_creates_verified_owned_user() {
    let app = common::setup();
    let admin_id = Uuid::new_v4();

    app.state
        .auth
        .invite_user(invite_request("b@x.com", "bob"), admin_id)
        .await
        .unwrap();

    let sent = app.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "invite");
    let token = sent[0].token.clone();

    // The signup form can prefill from the live invite.
    let preview = app.state.auth.inspect_invite(&token).await.unwrap();
    assert_eq!(preview.email, "b@x.com");
    assert_eq!(preview.username, "bob");

    let user = app
        .state
        .auth
        .accept_invite(AcceptInviteRequest {
            token: token.clone(),
            username: "bob".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    // Invite implies trust: pre-verified and stamped with the inviter.
    assert!(user.email_verified_at.is_some());
    assert_eq!(user.created_by, Some(admin_id));

    // Redeeming the same invite again fails.
    let err = app
        .state
        .auth
        .accept_invite(AcceptInviteRequest {
            token,
            username: "bob".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidToken));
}

#[tokio::test]
async fn test_invite_existing_email_is_rejected_without_token() {
    let app = common::setup();
    common::signup_verified(&app, "b@x.com", "bob", "password123").await;
    let sent_before = app.email.sent().len();

    let err = app
        .state
        .auth
        .invite_user(invite_request("b@x.com", "bob"), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailInUse));
    assert_eq!(app.email.sent().len(), sent_before);
}

#[tokio::test]
async fn test_invite_surfaces_delivery_failure() {
    let app = common::setup_failing_email();

    let err = app
        .state
        .auth
        .invite_user(invite_request("b@x.com", "bob"), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Email(_)));
}

#[tokio::test]
async fn test_redeem_races_with_self_signup() {
    let app = common::setup();

    app.state
        .auth
        .invite_user(invite_request("b@x.com", "bob"), Uuid::new_v4())
        .await
        .unwrap();
    let token = app.email.last_token().unwrap();

    // The invited address registers itself before the invite is redeemed.
    app.state
        .auth
        .signup(SignupRequest {
            email: "b@x.com".to_string(),
            name: "bob".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    let err = app
        .state
        .auth
        .accept_invite(AcceptInviteRequest {
            token,
            username: "bob".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailInUse));

    // The self-signup account is untouched.
    let user = app.store.find_by_email("b@x.com").await.unwrap().unwrap();
    assert!(user.created_by.is_none());
}

#[tokio::test]
async fn test_reinvite_replaces_previous_token() {
    let app = common::setup();
    let admin_id = Uuid::new_v4();

    app.state
        .auth
        .invite_user(invite_request("b@x.com", "bob"), admin_id)
        .await
        .unwrap();
    let first_token = app.email.last_token().unwrap();

    app.state
        .auth
        .invite_user(invite_request("b@x.com", "bobby"), admin_id)
        .await
        .unwrap();

    let err = app.state.auth.inspect_invite(&first_token).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidToken));

    let preview = app
        .state
        .auth
        .inspect_invite(&app.email.last_token().unwrap())
        .await
        .unwrap();
    assert_eq!(preview.username, "bobby");
}
