//! Integration tests for precedence decisions over built policies

#[cfg(test)]
mod integration_tests {
    use rolegate::definitions::ResourceOptions;
    use rolegate::{Configuration, PolicyBuilder, Query};

    fn sort_example() -> Configuration {
        let mut builder = PolicyBuilder::new();
        builder
            .role("admin", &[], |admin| {
                admin.resource_with("users", ResourceOptions::default(), |users| {
                    users.can("work")?;
                    Ok(())
                })?;
                admin.can("see")?;
                admin.scope("api", |api| {
                    api.resource_with("users", ResourceOptions::default(), |users| {
                        users.cannot("work")?;
                        users.can("rest")?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_precedence_order() {
        let config = sort_example();
        let rules = config.role("admin").unwrap().rules();
        assert_eq!(rules.len(), 18);

        let sorted: Vec<String> = rules.sort().iter().map(|r| r.to_string()).collect();
        assert_eq!(
            sorted,
            vec![
                "api:/users/work->deny",
                "api:/users/create->allow",
                "api:/users/delete->allow",
                "api:/users/edit->allow",
                "api:/users/index->allow",
                "api:/users/new->allow",
                "api:/users/rest->allow",
                "api:/users/show->allow",
                "api:/users/update->allow",
                "*:/users/create->allow",
                "*:/users/delete->allow",
                "*:/users/edit->allow",
                "*:/users/index->allow",
                "*:/users/new->allow",
                "*:/users/show->allow",
                "*:/users/update->allow",
                "*:/users/work->allow",
                "*:/*/see->allow",
            ]
        );

        // sorting leaves the book in declaration order
        assert_eq!(rules.keys().next(), Some("*:/users/create"));
    }

    #[test]
    fn test_scoped_deny_overrides_unscoped_allow() {
        let config = sort_example();

        assert!(!config.can("admin", &Query::action("work").on("users")).unwrap());
        assert!(!config.can("admin", &Query::action("work").on("users").within("api")).unwrap());
        assert!(config.can("admin", &Query::action("work").on("users").within("web")).unwrap());
        assert!(config.can("admin", &Query::action("rest").on("users").within("api")).unwrap());
        assert!(!config.can("admin", &Query::action("rest").on("users").within("web")).unwrap());
    }

    #[test]
    fn test_wildcard_rule_applies_everywhere() {
        let config = sort_example();

        assert!(config.can("admin", &Query::action("see")).unwrap());
        assert!(config.can("admin", &Query::action("see").on("posts").within("web")).unwrap());
    }

    #[test]
    fn test_default_deny() {
        let config = sort_example();

        assert!(!config.can("admin", &Query::action("fly")).unwrap());
        assert!(!config.can("admin", &Query::action("show").on("posts")).unwrap());
        // a wildcard query action only matches wildcard rule actions
        assert!(!config.can("admin", &Query::new().on("users")).unwrap());
    }

    #[test]
    fn test_explicit_deny_beats_wildcard_allow() {
        let mut builder = PolicyBuilder::new();
        builder
            .role("editor", &[], |editor| {
                editor.can("publish")?;
                editor.scope("admin", |admin| {
                    admin.resource_with("users", ResourceOptions::only(["show"]), |users| {
                        users.cannot("publish")?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        let config = builder.build().unwrap();

        let query = Query::action("publish").on("users").within("admin");
        assert!(!config.can("editor", &query).unwrap());
        assert_eq!(
            config.decide("editor", &query).unwrap().unwrap().key(),
            "admin:/users/publish"
        );
        assert!(config.can("editor", &Query::action("publish").on("posts")).unwrap());
    }

    #[test]
    fn test_inherited_rules_participate_in_precedence() {
        let mut builder = PolicyBuilder::new();
        builder
            .role("support", &[], |support| {
                support.can("view_charts")?;
                support.cannot("edit_account")?;
                Ok(())
            })
            .unwrap();
        builder
            .role("support_senior", &["support"], |senior| {
                senior.scope("api", |api| {
                    api.resource("charts", ResourceOptions::only(["view"]))?;
                    Ok(())
                })?;
                senior.resource("charts", ResourceOptions::only(["view"]))?;
                Ok(())
            })
            .unwrap();
        let config = builder.build().unwrap();

        assert!(config.can("support_senior", &Query::action("view_charts")).unwrap());
        assert!(config.can("support_senior", &Query::action("view_charts").within("api")).unwrap());
        assert!(config.can("support_senior", &Query::action("view").on("charts").within("api")).unwrap());
        assert!(!config.can("support_senior", &Query::action("edit_account")).unwrap());
        assert!(!config.can("support", &Query::action("view").on("charts")).unwrap());
    }
}
