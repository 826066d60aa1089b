#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::{HeadersParse, Parser, ReadBuffer};

/// ストリーミングシナリオの入力
#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    chunk_size: u8,
    small_capacity: u8,
}

fuzz_target!(|input: Input| {
    let chunk_size = usize::from(input.chunk_size).max(1);
    let capacity = usize::from(input.small_capacity).max(16);

    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::with_capacity(capacity);
    let mut line_parsed = false;

    // リクエストライン → ヘッダーブロックの順に最後まで駆動する
    for chunk in input.data.chunks(chunk_size) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let accepted = buffer.feed(rest);
            rest = &rest[accepted..];
            if !line_parsed {
                match parser.parse_request_line(&mut buffer) {
                    Ok(Some(_)) => line_parsed = true,
                    Ok(None) => {}
                    Err(_) => return,
                }
                if !line_parsed {
                    if accepted == 0 {
                        return;
                    }
                    continue;
                }
            }
            loop {
                match parser.parse_headers(&mut buffer) {
                    Ok(HeadersParse::Complete(_)) => {
                        // 次のメッセージへ
                        parser.reset();
                        line_parsed = false;
                        break;
                    }
                    Ok(HeadersParse::Batch(_)) => {}
                    Ok(HeadersParse::Again(_)) => break,
                    Err(_) => return,
                }
            }
            if accepted == 0 {
                return;
            }
        }
    }
});
