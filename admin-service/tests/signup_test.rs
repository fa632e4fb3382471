mod common;

use admin_service::dtos::auth::SignupRequest;
use admin_service::services::ServiceError;
use admin_service::store::UserStore;

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        name: "alice".to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_signup_creates_unverified_user_and_sends_token() {
    let app = common::setup();

    let user = app.state.auth.signup(signup_request("a@x.com")).await.unwrap();
    assert!(user.email_verified_at.is_none());

    let sent = app.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "verification");
    assert_eq!(sent[0].to_email, "a@x.com");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = common::setup();

    app.state.auth.signup(signup_request("a@x.com")).await.unwrap();

    let err = app
        .state
        .auth
        .signup(signup_request("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailInUse));
    assert_eq!(err.user_message(), "Email already in use!");

    // Case-insensitive comparison: only one verification email went out.
    let err = app
        .state
        .auth
        .signup(signup_request("A@X.COM"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailInUse));
    assert_eq!(app.email.sent().len(), 1);
}

#[tokio::test]
async fn test_signup_surfaces_delivery_failure() {
    let app = common::setup_failing_email();

    let err = app
        .state
        .auth
        .signup(signup_request("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Email(_)));

    // The account and its token were committed before the send, so the
    // user row exists (still unverified) and a later login can re-send.
    let user = app.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(user.email_verified_at.is_none());
}

#[tokio::test]
async fn test_verification_marks_user_and_burns_token() {
    let app = common::setup();

    app.state.auth.signup(signup_request("a@x.com")).await.unwrap();
    let token = app.email.last_token().unwrap();

    app.state.auth.verify_email(&token).await.unwrap();

    let user = app.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(user.email_verified_at.is_some());

    let err = app.state.auth.verify_email(&token).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidToken));
}
