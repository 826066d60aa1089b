#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::date::HttpDate;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(date) = HttpDate::parse(s) {
            let _ = date.day_of_week();
            let _ = date.unix_timestamp();
            let _ = date.to_datetime_string();

            // Display 出力を再パース (ラウンドトリップ)
            let displayed = date.to_string();
            let reparsed = HttpDate::parse(&displayed).unwrap();
            assert_eq!(date, reparsed);
        }
    }
});
