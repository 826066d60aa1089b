#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::parse_url;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(url) = parse_url(s) {
            // 各部品は入力の部分文字列 (存在すれば非空とは限らない)
            for part in [&url.schema, &url.auth, &url.host, &url.port, &url.path, &url.query, &url.hash] {
                if let Some(part) = part {
                    assert!(part.len() <= s.len());
                }
            }
            // ポートと userinfo はホストと同時にしか現れない
            if url.port.is_some() {
                assert!(url.host.is_some());
            }
            if url.auth.is_some() {
                assert!(url.host.is_some());
            }
        }
    }
});
