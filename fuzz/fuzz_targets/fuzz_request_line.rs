#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::{Parser, ReadBuffer};

fuzz_target!(|data: &[u8]| {
    // データを一度に feed
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::new();
    buffer.feed(data);
    let whole = parser.parse_request_line(&mut buffer);

    // データを分割して feed (ストリーミングシナリオ)
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::new();
    let mut chunked = Ok(None);
    for chunk in data.chunks(5) {
        buffer.feed(chunk);
        chunked = parser.parse_request_line(&mut buffer);
        if !matches!(chunked, Ok(None)) {
            break;
        }
    }

    // 分割方法に依存しない
    if let Ok(Some(line)) = &whole {
        assert_eq!(chunked, Ok(Some(line.clone())));
    }

    // 小容量バッファでのコンパクション経路
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::with_capacity(32);
    for chunk in data.chunks(9) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let accepted = buffer.feed(rest);
            rest = &rest[accepted..];
            match parser.parse_request_line(&mut buffer) {
                Ok(Some(_)) | Ok(None) => {}
                Err(_) => return,
            }
            if accepted == 0 {
                // パースしても空きが増えない入力は打ち切る
                return;
            }
        }
    }
});
