#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::{Parser, ReadBuffer};

fuzz_target!(|data: &[u8]| {
    // データを一度に feed
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::new();
    buffer.feed(data);
    let whole = parser.parse_status_line(&mut buffer);

    // データを分割して feed (ストリーミングシナリオ)
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::new();
    let mut chunked = Ok(None);
    for chunk in data.chunks(7) {
        buffer.feed(chunk);
        chunked = parser.parse_status_line(&mut buffer);
        if !matches!(chunked, Ok(None)) {
            break;
        }
    }

    // 分割方法に依存しない
    if let Ok(Some(line)) = &whole {
        assert_eq!(chunked, Ok(Some(line.clone())));
    }
});
