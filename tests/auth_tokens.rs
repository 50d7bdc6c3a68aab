mod common;

use takeback_core::errors::CoreError;
use takeback_core::services::AccountService;
use takeback_core::store::MemoryStore;

#[test]
fn signup_issues_a_verifiable_token() {
    common::init();
    let store = MemoryStore::new();

    let session = common::signup(&store, "casey@example.com");
    let claims = common::AUTHORITY.verify(&session.token).unwrap();
    assert_eq!(claims.sub, session.account.id);
    assert_eq!(claims.email, "casey@example.com");
}

#[test]
fn duplicate_email_is_rejected() {
    let store = MemoryStore::new();
    common::signup(&store, "casey@example.com");

    let err = AccountService
        .signup(&store, &common::AUTHORITY, common::signup_input("casey@example.com"))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[test]
fn login_round_trip_and_wrong_password() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");

    let logged_in = AccountService
        .login(
            &store,
            &common::AUTHORITY,
            "casey@example.com",
            "correct horse battery staple",
        )
        .unwrap();
    assert_eq!(logged_in.account.id, session.account.id);

    let err = AccountService
        .login(&store, &common::AUTHORITY, "casey@example.com", "wrong")
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidCredentials));
}

#[test]
fn login_with_unknown_email_matches_wrong_password() {
    let store = MemoryStore::new();
    let err = AccountService
        .login(&store, &common::AUTHORITY, "nobody@example.com", "whatever")
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidCredentials));
}

#[test]
fn profile_update_only_touches_given_fields() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");

    let patch = takeback_core::services::ProfilePatch {
        phone: Some("555-0199".into()),
        ..Default::default()
    };
    let profile = AccountService
        .update_profile(&store, session.account.id, patch)
        .unwrap();
    assert_eq!(profile.phone, "555-0199");
    assert_eq!(profile.first_name, "Casey");
    assert_eq!(profile.email, "casey@example.com");
}
