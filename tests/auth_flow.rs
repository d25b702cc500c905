//! Sign-in, session restore and expiry against the fake server.

mod support;

use blogline::app::{Route, Store};
use blogline::domain::{BloglineError, PageParams, ValidationError};
use rstest::rstest;
use support::{signed_in, store, FakeApi, EMAIL, PASSWORD, TOKEN};

#[rstest]
#[tokio::test]
async fn login_stores_token_and_loads_profile(mut store: Store<FakeApi>) {
    store.auth().login_with(EMAIL, PASSWORD).await.unwrap();

    let auth = store.auth();
    assert!(auth.is_authenticated());
    assert_eq!(auth.user().map(|u| u.name.as_str()), Some("Ada"));
    assert_eq!(auth.error(), None);
    assert_eq!(store.session().token().as_deref(), Some(TOKEN));
    assert_eq!(store.api().calls("my_profile"), 1);
    assert_eq!(store.state().route, Route::Home);
}

#[rstest]
#[tokio::test]
async fn login_returns_to_the_page_that_asked_for_it(mut store: Store<FakeApi>) {
    store.navigate(Route::Write).unwrap();
    assert_eq!(
        store.state().route,
        Route::Login {
            return_url: Some("/write".into())
        }
    );

    store.auth().login_with(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(store.state().route, Route::Write);
}

#[rstest]
#[tokio::test]
async fn rejected_login_keeps_signed_out_state(mut store: Store<FakeApi>) {
    let err = store.auth().login_with(EMAIL, "wrong-password").await.unwrap_err();

    assert!(matches!(err, BloglineError::Unauthorized { .. }));
    let auth = store.auth();
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
    assert_eq!(auth.error(), Some("Invalid credentials"));
    assert_eq!(store.session().token(), None);
    assert_eq!(store.api().calls("my_profile"), 0);
}

#[rstest]
#[case("", PASSWORD)]
#[case("not-an-email", PASSWORD)]
#[case(EMAIL, "")]
#[tokio::test]
async fn invalid_login_form_never_reaches_the_server(
    mut store: Store<FakeApi>,
    #[case] email: &str,
    #[case] password: &str,
) {
    let err = store.auth().login_with(email, password).await.unwrap_err();

    assert!(matches!(err, BloglineError::Validation(_)));
    assert_eq!(store.api().calls("login"), 0);
}

#[rstest]
#[tokio::test]
async fn stored_token_restores_user_once(mut signed_in: Store<FakeApi>) {
    assert!(signed_in.auth().is_authenticated());
    assert!(signed_in.auth().user().is_none());

    let user = signed_in.auth().load_user().await.unwrap();
    assert_eq!(user.map(|u| u.id), Some(1));

    signed_in.auth().load_user().await.unwrap();
    assert_eq!(signed_in.api().calls("my_profile"), 1);
}

#[rstest]
#[tokio::test]
async fn load_user_is_a_no_op_when_signed_out(mut store: Store<FakeApi>) {
    assert_eq!(store.auth().load_user().await.unwrap(), None);
    assert_eq!(store.api().calls("my_profile"), 0);
}

#[rstest]
#[tokio::test]
async fn server_rejecting_the_token_ends_the_session(mut signed_in: Store<FakeApi>) {
    signed_in.navigate(Route::MyProfile).unwrap();
    signed_in.api().revoke_session();

    let err = signed_in.profile().fetch_my_profile().await.unwrap_err();

    assert!(matches!(err, BloglineError::Unauthorized { .. }));
    assert!(!signed_in.auth().is_authenticated());
    assert_eq!(signed_in.session().token(), None);
    assert_eq!(
        signed_in.state().route,
        Route::Login {
            return_url: Some("/profile".into())
        }
    );
}

#[rstest]
#[tokio::test]
async fn public_reads_keep_working_after_logout(mut signed_in: Store<FakeApi>) {
    signed_in.auth().logout().unwrap();

    assert_eq!(signed_in.session().token(), None);
    assert_eq!(signed_in.state().route, Route::login());
    let mut feed = signed_in.posts();
    let posts = feed.recommended(PageParams::default()).await.unwrap();
    assert_eq!(posts.len(), 1);
}

#[rstest]
#[tokio::test]
async fn registration_moves_to_login(mut store: Store<FakeApi>) {
    use blogline::app::RegisterField;

    let mut auth = store.auth();
    auth.set_register_field(RegisterField::Name, "Grace Hopper").unwrap();
    auth.set_register_field(RegisterField::Email, "grace@example.com").unwrap();
    auth.set_register_field(RegisterField::Password, "longenough").unwrap();
    auth.set_register_field(RegisterField::ConfirmPassword, "longenough").unwrap();
    auth.register().await.unwrap();

    assert!(!store.auth().is_authenticated());
    assert_eq!(store.state().route, Route::login());
}

#[rstest]
#[tokio::test]
async fn registration_with_mismatched_confirmation_is_local(mut store: Store<FakeApi>) {
    use blogline::app::RegisterField;

    let mut auth = store.auth();
    auth.set_register_field(RegisterField::Name, "Grace Hopper").unwrap();
    auth.set_register_field(RegisterField::Email, "grace@example.com").unwrap();
    auth.set_register_field(RegisterField::Password, "longenough").unwrap();
    auth.set_register_field(RegisterField::ConfirmPassword, "different").unwrap();
    let err = auth.register().await.unwrap_err();

    assert!(matches!(
        err,
        BloglineError::Validation(ValidationError::PasswordMismatch)
    ));
    assert_eq!(store.api().calls("register"), 0);
}
