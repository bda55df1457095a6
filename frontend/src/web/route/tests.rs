use super::*;

#[test]
fn parses_static_routes() {
    assert_eq!(AppRoute::from_url("/"), AppRoute::Home);
    assert_eq!(AppRoute::from_url("/login"), AppRoute::Login);
    assert_eq!(AppRoute::from_url("/devices"), AppRoute::Devices);
    assert_eq!(AppRoute::from_url("/competitions/new"), AppRoute::CompetitionNew);
    assert_eq!(AppRoute::from_url("/nope"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_url("/competitions/a/b/c"), AppRoute::NotFound);
}

#[test]
fn parses_competition_params() {
    assert_eq!(
        AppRoute::from_url("/competitions/e2e-1"),
        AppRoute::CompetitionDetail("e2e-1".to_string())
    );
    assert_eq!(
        AppRoute::from_url("/competitions/e2e-1/edit"),
        AppRoute::CompetitionEdit("e2e-1".to_string())
    );
}

#[test]
fn trailing_slash_is_tolerated() {
    assert_eq!(
        AppRoute::from_url("/competitions/e2e-1/"),
        AppRoute::CompetitionDetail("e2e-1".to_string())
    );
    assert_eq!(AppRoute::from_url("/login/"), AppRoute::Login);
}

#[test]
fn oauth_callback_extracts_query() {
    let route = AppRoute::from_url("/auth/fitbit/callback?code=abc%2F1&state=xyz");
    match route {
        AppRoute::OauthCallback(provider, params) => {
            assert_eq!(provider, "fitbit");
            assert_eq!(params.code.as_deref(), Some("abc/1"));
            assert_eq!(params.state.as_deref(), Some("xyz"));
            assert!(params.oauth_token.is_none());
            assert!(!params.is_empty());
        }
        other => panic!("unexpected route: {:?}", other),
    }

    let route = AppRoute::from_url("/auth/garmin/callback?oauth_token=t1&oauth_verifier=v+2");
    match route {
        AppRoute::OauthCallback(_, params) => {
            assert_eq!(params.oauth_token.as_deref(), Some("t1"));
            assert_eq!(params.oauth_verifier.as_deref(), Some("v 2"));
        }
        other => panic!("unexpected route: {:?}", other),
    }
}

#[test]
fn oauth_callback_without_params_is_empty() {
    let route = AppRoute::from_url("/auth/fitbit/callback");
    match route {
        AppRoute::OauthCallback(_, params) => assert!(params.is_empty()),
        other => panic!("unexpected route: {:?}", other),
    }
}

#[test]
fn guard_flags() {
    assert!(!AppRoute::Login.requires_auth());
    assert!(AppRoute::Home.requires_auth());
    assert!(AppRoute::Devices.requires_auth());
    assert!(AppRoute::CompetitionNew.requires_auth());
    assert!(AppRoute::Login.should_redirect_when_authenticated());
}

#[test]
fn to_path_round_trips() {
    for route in [
        AppRoute::Home,
        AppRoute::Login,
        AppRoute::CompetitionNew,
        AppRoute::CompetitionEdit("e2e-1".into()),
        AppRoute::CompetitionDetail("e2e-1".into()),
        AppRoute::Devices,
    ] {
        assert_eq!(AppRoute::from_url(&route.to_path()), route);
    }
}

#[test]
fn malformed_percent_sequences_pass_through() {
    assert_eq!(
        AppRoute::from_url("/competitions/a%ZZb"),
        AppRoute::CompetitionDetail("a%ZZb".to_string())
    );
}

#[test]
fn multibyte_text_after_percent_is_kept() {
    // '%' 后两字节内出现多字节字符不得 panic，原文透传
    assert_eq!(
        AppRoute::from_url("/competitions/a%aé"),
        AppRoute::CompetitionDetail("a%aé".to_string())
    );
    match AppRoute::from_url("/auth/fitbit/callback?code=%aé") {
        AppRoute::OauthCallback(_, params) => {
            assert_eq!(params.code.as_deref(), Some("%aé"));
        }
        other => panic!("unexpected route: {:?}", other),
    }
    // 截断的序列同样透传
    assert_eq!(
        AppRoute::from_url("/competitions/abc%4"),
        AppRoute::CompetitionDetail("abc%4".to_string())
    );
}
