//! Image and Kubernetes object naming.

/// `{service}:{branch}.{commit}`
pub fn build_tag(service: &str, branch: &str, commit: &str) -> String {
    format!("{service}:{branch}.{commit}")
}

/// Like [`build_tag`], but an explicit `tag` replaces `{branch}.{commit}`.
pub fn build_tag_with_override(
    service: &str,
    branch: &str,
    commit: &str,
    tag: Option<&str>,
) -> String {
    match tag {
        Some(tag) => format!("{service}:{tag}"),
        None => build_tag(service, branch, commit),
    }
}

/// Name of the service's base config map.
pub fn config_map_name(service: &str) -> String {
    format!("{service}-config")
}

/// Name of the service's secret.
pub fn secret_name(service: &str) -> String {
    format!("{service}-secret")
}

/// Registry path images are pushed to, e.g. `eu.gcr.io/my-project`.
pub fn remote(registry: &str, project: &str) -> String {
    format!("{registry}/{project}")
}

pub fn remote_tag(remote: &str, build_tag: &str) -> String {
    format!("{remote}/{build_tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tag_joins_branch_and_commit() {
        assert_eq!(build_tag("svc", "main", "abc1234"), "svc:main.abc1234");
    }

    #[test]
    fn override_replaces_branch_and_commit() {
        assert_eq!(
            build_tag_with_override("svc", "main", "abc1234", Some("v1.2")),
            "svc:v1.2"
        );
        assert_eq!(
            build_tag_with_override("svc", "main", "abc1234", None),
            "svc:main.abc1234"
        );
    }

    #[test]
    fn config_and_secret_names() {
        assert_eq!(config_map_name("svc"), "svc-config");
        assert_eq!(secret_name("svc"), "svc-secret");
    }

    #[test]
    fn remote_tag_prefixes_registry_and_project() {
        let remote = remote("eu.gcr.io", "flatfox");
        assert_eq!(remote, "eu.gcr.io/flatfox");
        assert_eq!(
            remote_tag(&remote, "svc:main.abc1234"),
            "eu.gcr.io/flatfox/svc:main.abc1234"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn ident() -> impl Strategy<Value = String> {
            "[a-z0-9][a-z0-9_-]{0,29}"
        }

        proptest! {
            #[test]
            fn build_tag_layout(service in ident(), branch in ident(), commit in "[0-9a-f]{7}") {
                let tag = build_tag(&service, &branch, &commit);
                prop_assert_eq!(&tag, &format!("{service}:{branch}.{commit}"));
                prop_assert!(tag.starts_with(&service));
                prop_assert!(tag.ends_with(&commit));
            }

            #[test]
            fn derived_names_keep_service_prefix(service in ident()) {
                prop_assert!(config_map_name(&service).starts_with(&service));
                prop_assert!(secret_name(&service).starts_with(&service));
                prop_assert_ne!(config_map_name(&service), secret_name(&service));
            }
        }
    }
}
