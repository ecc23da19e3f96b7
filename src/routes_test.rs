use super::*;

#[test]
fn protected_routes_require_auth() {
    for path in [DASHBOARD, REPORT, PROFILE, ADMIN, ANALYTICS, APPEALS] {
        assert_eq!(requirement(path), Some(RouteRequirement::RequiresAuth), "{path}");
    }
}

#[test]
fn entry_points_are_guest_only() {
    assert_eq!(requirement(LOGIN), Some(RouteRequirement::GuestOnly));
    assert_eq!(requirement(REGISTER), Some(RouteRequirement::GuestOnly));
}

#[test]
fn public_and_unknown_routes_have_no_requirement() {
    for path in [HOME, ABOUT, CONTACT, PRIVACY, TERMS, "/no-such-page"] {
        assert_eq!(requirement(path), None, "{path}");
    }
}

#[test]
fn nested_paths_inherit_requirement() {
    assert_eq!(requirement("/admin/users"), Some(RouteRequirement::RequiresAuth));
    assert_eq!(requirement("/report/42"), Some(RouteRequirement::RequiresAuth));
}

#[test]
fn matching_ignores_case() {
    assert_eq!(requirement("/Dashboard"), Some(RouteRequirement::RequiresAuth));
    assert_eq!(requirement("/ADMIN/users"), Some(RouteRequirement::RequiresAuth));
    assert_eq!(requirement("/Login"), Some(RouteRequirement::GuestOnly));
    assert_eq!(requirement("/Reporting"), None);
}

#[test]
fn multibyte_paths_do_not_match_by_accident() {
    assert_eq!(requirement("/admi\u{e9}x"), None);
    assert_eq!(requirement("/\u{e9}"), None);
}

#[test]
fn prefix_without_separator_does_not_match() {
    assert_eq!(requirement("/reporting"), None);
    assert_eq!(requirement("/loginhelp"), None);
}

#[test]
fn query_fragment_and_trailing_slash_are_ignored() {
    assert_eq!(normalize("/dashboard/?tab=score#top"), "/dashboard");
    assert_eq!(normalize("/"), "/");
    assert_eq!(normalize(""), "/");
    assert_eq!(requirement("/login?next=/dashboard"), Some(RouteRequirement::GuestOnly));
}
