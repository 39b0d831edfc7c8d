use taskboard_core::{
    ApiError, Destination, LoginAction, LoginForm, Registration, SessionEvent, SignOutReason,
};

mod common;

use common::{EMAIL, PASSWORD, TAKEN_EMAIL, drain, harness, signed_in};

#[tokio::test]
async fn can_login_and_navigate_to_task_list() -> anyhow::Result<()> {
    let h = harness().await?;
    let mut events = h.session.subscribe();

    let user = h.auth.login(EMAIL, PASSWORD).await?;

    assert_eq!(user.email, EMAIL);
    assert_eq!(user.display_name(), "alice");
    assert!(h.session.is_authenticated());
    assert_eq!(h.api.calls("profile"), 1);
    assert!(h.client.credential().access.is_some());

    let seen = drain(&mut events);
    assert_eq!(seen, vec![SessionEvent::SignedIn(user)]);
    assert_eq!(seen[0].destination(), Some(Destination::TaskList));
    Ok(())
}

#[tokio::test]
async fn can_reject_wrong_password_without_refreshing() -> anyhow::Result<()> {
    let h = harness().await?;
    let mut events = h.session.subscribe();

    let err = h.auth.login(EMAIL, "wrong").await.unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );
    assert_eq!(h.api.refresh_calls(), 0);
    assert!(!h.session.is_authenticated());
    assert!(drain(&mut events).is_empty());
    Ok(())
}

#[tokio::test]
async fn can_reject_blank_login_locally() -> anyhow::Result<()> {
    let h = harness().await?;

    let err = h.auth.login("  ", "").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    let errors = err.field_errors().expect("local field errors");
    assert_eq!(errors.field("email"), Some("Email is required."));
    assert_eq!(errors.field("password"), Some("Password is required."));
    assert_eq!(h.api.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn can_drive_login_form_through_failed_attempt() -> anyhow::Result<()> {
    let h = harness().await?;
    let form = LoginForm::with_email(EMAIL)
        .reduce(LoginAction::SetPassword("wrong".to_string()))
        .reduce(LoginAction::Submit);

    let outcome = h.auth.login(&form.email, &form.password).await;
    let form = match outcome {
        Ok(_) => form.reduce(LoginAction::Succeeded),
        Err(err) => form.reduce(LoginAction::Failed(err.form_errors())),
    };

    assert_eq!(
        form.errors.summary().as_deref(),
        Some("No active account found with the given credentials")
    );
    assert!(form.password.is_empty());
    Ok(())
}

#[tokio::test]
async fn can_logout_and_navigate_home() -> anyhow::Result<()> {
    let h = signed_in().await?;
    let mut events = h.session.subscribe();

    h.auth.logout().await;

    assert_eq!(h.api.calls("logout"), 1);
    assert!(h.client.credential().is_empty());
    assert!(!h.session.is_authenticated());
    let seen = drain(&mut events);
    assert_eq!(
        seen,
        vec![SessionEvent::SignedOut {
            reason: SignOutReason::UserRequested
        }]
    );
    assert_eq!(seen[0].destination(), Some(Destination::Home));
    Ok(())
}

#[tokio::test]
async fn can_restore_existing_session_silently() -> anyhow::Result<()> {
    let h = signed_in().await?;
    let mut events = h.session.subscribe();

    let user = h.auth.restore().await;

    assert_eq!(user.as_ref().map(|u| u.email.as_str()), Some(EMAIL));
    let seen = drain(&mut events);
    assert!(matches!(seen.as_slice(), [SessionEvent::Resumed(_)]));
    assert_eq!(seen[0].destination(), None);
    Ok(())
}

#[tokio::test]
async fn can_restore_without_session_and_stay_quiet() -> anyhow::Result<()> {
    let h = harness().await?;
    let mut events = h.session.subscribe();

    let user = h.auth.restore().await;

    assert!(user.is_none());
    assert!(!h.session.is_authenticated());
    assert!(drain(&mut events).is_empty());
    assert_eq!(h.api.calls("profile"), 1);
    assert_eq!(h.api.refresh_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn can_login_after_failed_restore() -> anyhow::Result<()> {
    let h = harness().await?;
    assert!(h.auth.restore().await.is_none());

    h.auth.login(EMAIL, PASSWORD).await?;
    h.api.expire();
    let page = h.tasks.list(1, 10).await?;

    assert_eq!(page.count, 0);
    assert!(h.session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn can_show_server_registration_errors_per_field() -> anyhow::Result<()> {
    let h = harness().await?;
    let registration = Registration {
        email: TAKEN_EMAIL.to_string(),
        username: "bob".to_string(),
        password: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
    };

    let err = h.auth.register(&registration).await.unwrap_err();

    let errors = err.field_errors().expect("validation errors");
    assert_eq!(
        errors.field("email"),
        Some("A user with that email already exists.")
    );
    assert!(!h.session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn can_register_without_signing_in() -> anyhow::Result<()> {
    let h = harness().await?;
    let mut events = h.session.subscribe();
    let registration = Registration {
        email: "new@b.com".to_string(),
        username: "newbie".to_string(),
        password: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
    };

    h.auth.register(&registration).await?;

    assert_eq!(h.api.calls("register"), 1);
    assert!(!h.session.is_authenticated());
    assert!(drain(&mut events).is_empty());
    Ok(())
}

#[tokio::test]
async fn can_drop_tokens_when_profile_lookup_fails_after_login() -> anyhow::Result<()> {
    let h = harness().await?;
    let mut events = h.session.subscribe();
    h.api.fail_profile();

    let err = h.auth.login(EMAIL, PASSWORD).await.unwrap_err();

    assert!(matches!(err, ApiError::Server { .. }));
    assert_eq!(h.api.calls("login"), 1);
    assert_eq!(h.api.calls("profile"), 1);
    assert_eq!(h.api.refresh_calls(), 0);
    assert!(!h.session.is_authenticated());
    assert!(h.client.credential().is_empty());
    assert!(drain(&mut events).is_empty());
    Ok(())
}
