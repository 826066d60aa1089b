//! URL パースのプロパティテスト

use proptest::prelude::*;
use shiguredo_httpline::parse_url;

// ========================================
// 部品の復元
// ========================================

// 生成した部品を連結した URL から各部品が復元される
proptest! {
    #[test]
    fn prop_url_decomposition(
        scheme in pbt::scheme(),
        host in pbt::hostname(),
        port in proptest::option::of(pbt::port()),
        path in pbt::origin_path(),
        query in proptest::option::of(pbt::query()),
        fragment in proptest::option::of(pbt::fragment()),
    ) {
        let mut input = format!("{}://{}", scheme, host);
        if let Some(p) = &port {
            input.push(':');
            input.push_str(p);
        }
        input.push_str(&path);
        if let Some(q) = &query {
            input.push('?');
            input.push_str(q);
        }
        if let Some(f) = &fragment {
            input.push('#');
            input.push_str(f);
        }

        let url = parse_url(&input).expect("valid url");
        prop_assert_eq!(url.schema.as_deref(), Some(scheme.as_str()));
        prop_assert_eq!(url.host.as_deref(), Some(host.as_str()));
        prop_assert_eq!(url.port.as_deref(), port.as_deref());
        prop_assert_eq!(url.path.as_deref(), Some(path.as_str()));
        prop_assert_eq!(url.query.as_deref(), query.as_deref());
        prop_assert_eq!(url.hash.as_deref(), fragment.as_deref());
        prop_assert_eq!(url.auth, None);
    }
}

// userinfo 付き authority
proptest! {
    #[test]
    fn prop_url_userinfo(
        userinfo in "[a-z0-9]{1,8}(:[a-z0-9]{1,8})?",
        host in pbt::hostname(),
    ) {
        let input = format!("http://{}@{}/", userinfo, host);
        let url = parse_url(&input).expect("valid url");
        prop_assert_eq!(url.auth.as_deref(), Some(userinfo.as_str()));
        prop_assert_eq!(url.host.as_deref(), Some(host.as_str()));
    }
}

// origin-form はスキームとホストを持たない
proptest! {
    #[test]
    fn prop_url_origin_form(path in pbt::origin_path(), query in proptest::option::of(pbt::query())) {
        let mut input = path.clone();
        if let Some(q) = &query {
            input.push('?');
            input.push_str(q);
        }
        let url = parse_url(&input).expect("valid url");
        prop_assert_eq!(url.schema, None);
        prop_assert_eq!(url.host, None);
        prop_assert_eq!(url.path.as_deref(), Some(path.as_str()));
        prop_assert_eq!(url.query.as_deref(), query.as_deref());
    }
}

// ========================================
// 不正入力でパニックしない
// ========================================

proptest! {
    #[test]
    fn prop_url_parse_no_panic(input in "[ -~]{0,128}") {
        let _ = parse_url(&input);
    }
}
