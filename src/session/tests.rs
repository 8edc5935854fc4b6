use super::*;

fn admin() -> User {
    User {
        id: 1,
        name: "Admin".into(),
        email: Some("admin@example.org".into()),
        role: Some("admin".into()),
        is_admin: false,
    }
}

fn listener() -> User {
    User {
        id: 2,
        name: "Listener".into(),
        email: None,
        role: Some("user".into()),
        is_admin: false,
    }
}

#[test]
fn admin_flag_comes_from_role_or_flag() {
    assert!(admin().is_admin());
    assert!(!listener().is_admin());
    let flagged = User {
        is_admin: true,
        ..listener()
    };
    assert!(flagged.is_admin());
}

#[test]
fn begin_and_end_drive_derived_flags() {
    let ctx = SessionContext::new();
    assert!(!ctx.is_authenticated());
    assert!(!ctx.is_admin());

    ctx.begin("tok".into(), admin());
    assert!(ctx.is_authenticated());
    assert!(ctx.is_admin());
    assert_eq!(ctx.token().as_deref(), Some("tok"));

    let clone = ctx.clone();
    clone.end();
    assert!(!ctx.is_authenticated());
    assert!(ctx.user().is_none());
    assert!(ctx.token().is_none());
}

#[test]
fn update_user_ignored_without_session() {
    let ctx = SessionContext::new();
    ctx.update_user(admin());
    assert!(ctx.user().is_none());

    ctx.begin("tok".into(), listener());
    ctx.update_user(admin());
    assert_eq!(ctx.user().map(|u| u.id), Some(1));
}

#[test]
fn store_round_trips_and_clears() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("state").join("session.toml"));

    let ctx = SessionContext::with_store(store.clone());
    assert!(!ctx.is_authenticated());
    ctx.begin("secret".into(), admin());
    assert!(store.path().exists());

    let restored = SessionContext::with_store(store.clone());
    assert_eq!(restored.token().as_deref(), Some("secret"));
    assert!(restored.is_admin());

    restored.end();
    assert!(!store.path().exists());
    assert!(!SessionContext::with_store(store).is_authenticated());
}

#[test]
fn corrupt_or_partial_store_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.toml");

    std::fs::write(&path, "token = [not toml").unwrap();
    let store = SessionStore::new(&path);
    assert_eq!(store.load(), Session::default());
    assert!(!path.exists());

    std::fs::write(&path, "token = \"orphan\"\n").unwrap();
    assert_eq!(store.load(), Session::default());
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn stored_session_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let fresh = dir.path().join("new").join("session.toml");
    SessionContext::with_store(SessionStore::new(&fresh)).begin("secret".into(), admin());
    let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0, "session file mode {mode:o}");

    // A file left world-readable is tightened on the next save.
    let old = dir.path().join("old.toml");
    std::fs::write(&old, "").unwrap();
    std::fs::set_permissions(&old, std::fs::Permissions::from_mode(0o644)).unwrap();
    SessionStore::new(&old)
        .save(&Session {
            token: Some("secret".into()),
            user: Some(admin()),
        })
        .unwrap();
    let mode = std::fs::metadata(&old).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0, "session file mode {mode:o}");
}
