//! Builder, configuration and engine tests

use super::*;
use crate::config::{PolicyConfig, WildcardQueryPolicy};
use crate::definitions::ResourceOptions;
use crate::error::{AuthzError, ErrorKind};
use crate::query::Query;
use crate::types::Principal;
use std::sync::Arc;

fn admin_and_user() -> PolicyBuilder {
    let mut builder = PolicyBuilder::new();
    builder
        .role("admin", &[], |admin| {
            admin.can("administrate")?;
            Ok(())
        })
        .unwrap();
    builder
        .role("user", &["admin"], |user| {
            user.can("view_charts")?.cannot("have_fun")?;
            Ok(())
        })
        .unwrap();
    builder
}

#[test]
fn test_duplicate_role() {
    let mut builder = admin_and_user();
    let result = builder.role("admin", &[], |_| Ok(()));

    assert!(matches!(result, Err(AuthzError::DuplicateRole { .. })));
    assert_eq!(builder.len(), 2);
}

#[test]
fn test_failed_role_is_not_registered() {
    let mut builder = PolicyBuilder::new();
    let result = builder.role("admin", &[], |admin| {
        admin.can("see")?;
        admin.can("see")?;
        Ok(())
    });

    assert!(result.is_err());
    assert!(builder.is_empty());
}

#[test]
fn test_parent_declared_after_child() {
    let mut builder = PolicyBuilder::new();
    builder
        .role("user", &["admin"], |user| {
            user.can("view")?;
            Ok(())
        })
        .unwrap();
    builder
        .role("admin", &[], |admin| {
            admin.can("administrate")?;
            Ok(())
        })
        .unwrap();

    let config = builder.build().unwrap();
    assert!(config.can("user", &Query::action("administrate")).unwrap());
    assert_eq!(config.role_names().collect::<Vec<_>>(), vec!["user", "admin"]);
}

#[test]
fn test_unknown_parent() {
    let mut builder = PolicyBuilder::new();
    builder.role("user", &["ghost"], |_| Ok(())).unwrap();

    let err = builder.build().unwrap_err();
    assert_eq!(
        err,
        AuthzError::UnknownParent {
            role: "user".to_string(),
            parent: "ghost".to_string(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::BadConfiguration);
}

#[test]
fn test_depth_limit_from_config() {
    let mut builder = PolicyBuilder::with_config(PolicyConfig::default().with_max_inheritance_depth(1));
    builder.role("a", &[], |_| Ok(())).unwrap();
    builder.role("b", &["a"], |_| Ok(())).unwrap();
    builder.role("c", &["b"], |_| Ok(())).unwrap();

    let err = builder.build().unwrap_err();
    assert!(matches!(err, AuthzError::InheritanceDepthExceeded { max_depth: 1, .. }));
}

#[test]
fn test_role_not_found() {
    let config = admin_and_user().build().unwrap();
    let err = config.can("ghost", &Query::action("see")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownRole);
}

#[test]
fn test_wildcard_query_policy() {
    let mut builder = PolicyBuilder::with_config(
        PolicyConfig::default().with_wildcard_queries(WildcardQueryPolicy::Reject),
    );
    builder
        .role("admin", &[], |admin| {
            admin.can("see")?;
            admin.resource("charts", ResourceOptions::default())?;
            Ok(())
        })
        .unwrap();
    let config = builder.build().unwrap();

    let err = config.can("admin", &Query::action("see")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadMatch);
    assert!(config.can("admin", &Query::action("show").on("charts")).unwrap());
}

#[test]
fn test_wildcard_query_evaluated_by_default() {
    let config = admin_and_user().build().unwrap();
    assert!(config.can("admin", &Query::action("administrate")).unwrap());
}

#[test]
fn test_decide_explains() {
    let config = admin_and_user().build().unwrap();

    let rule = config.decide("user", &Query::action("administrate")).unwrap().unwrap();
    assert_eq!(rule.role(), "admin");
    assert!(config.decide("user", &Query::action("fly")).unwrap().is_none());
}

#[test]
fn test_principal_can() {
    let config = admin_and_user().build().unwrap();
    let query = Query::action("view_charts");

    assert!(config.principal_can(&Principal::new("u1", ["admin", "user"]), &query).unwrap());
    assert!(!config.principal_can(&Principal::new("u2", ["admin"]), &query).unwrap());
    assert!(!config.principal_can(&Principal::new("u3", Vec::<String>::new()), &query).unwrap());

    let err = config
        .principal_can(&Principal::new("u4", ["ghost"]), &query)
        .unwrap_err();
    assert!(matches!(err, AuthzError::RoleNotFound { .. }));
}

#[test]
fn test_principal_can_ignores_role_order() {
    let config = admin_and_user().build().unwrap();
    let query = Query::action("administrate");

    let known_first = vec!["admin".to_string(), "ghost".to_string()];
    let unknown_first = vec!["ghost".to_string(), "admin".to_string()];

    let expected = Err(AuthzError::RoleNotFound {
        role: "ghost".to_string(),
    });
    assert_eq!(config.principal_can(&known_first, &query), expected);
    assert_eq!(config.principal_can(&unknown_first, &query), expected);

    let engine = PolicyEngine::new();
    engine.install(config);
    assert_eq!(engine.principal_can(&known_first, &query), expected);
}

#[test]
fn test_principal_attributes_do_not_affect_decisions() {
    let config = admin_and_user().build().unwrap();
    let plain = Principal::new("u1", ["admin"]);
    let tagged = plain
        .clone()
        .with_attribute("admin", serde_json::json!(true))
        .with_attribute("roles", serde_json::json!(["user"]));

    for action in ["administrate", "view_charts", "have_fun"] {
        let query = Query::action(action);
        assert_eq!(
            config.principal_can(&plain, &query),
            config.principal_can(&tagged, &query)
        );
    }
}

#[test]
fn test_engine_not_configured() {
    let engine = PolicyEngine::new();

    assert!(!engine.is_configured());
    assert_eq!(engine.configuration().unwrap_err(), AuthzError::NotConfigured);
    assert_eq!(
        engine.can("admin", &Query::action("administrate")),
        Err(AuthzError::NotConfigured)
    );
}

#[test]
fn test_engine_install_and_clear() {
    let engine = PolicyEngine::new();
    engine.configure(admin_and_user()).unwrap();
    assert!(engine.can("user", &Query::action("administrate")).unwrap());

    let snapshot = engine.configuration().unwrap();
    engine.clear();

    assert!(!engine.is_configured());
    assert_eq!(engine.can("user", &Query::action("administrate")), Err(AuthzError::NotConfigured));
    // readers keep their snapshot
    assert!(snapshot.can("user", &Query::action("administrate")).unwrap());
}

#[test]
fn test_engine_failed_configure_keeps_previous() {
    let engine = PolicyEngine::new();
    let installed = engine.configure(admin_and_user()).unwrap();

    let mut broken = PolicyBuilder::new();
    broken.role("user", &["ghost"], |_| Ok(())).unwrap();
    assert!(engine.configure(broken).is_err());

    assert!(Arc::ptr_eq(&installed, &engine.configuration().unwrap()));
}

#[test]
fn test_configuration_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Configuration>();
    assert_send_sync::<PolicyEngine>();
}

#[test]
fn test_global_engine_is_shared() {
    assert!(std::ptr::eq(PolicyEngine::global(), PolicyEngine::global()));
}
