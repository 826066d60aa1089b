#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_httpline::{HeadersParse, Parser, ReadBuffer};

fn collect(data: &[u8], chunk_size: usize, capacity: usize) -> Result<Option<Vec<String>>, ()> {
    let mut parser = Parser::new();
    let mut buffer = ReadBuffer::with_capacity(capacity);
    let mut headers = Vec::new();

    for chunk in data.chunks(chunk_size) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let accepted = buffer.feed(rest);
            rest = &rest[accepted..];
            loop {
                match parser.parse_headers(&mut buffer) {
                    Ok(HeadersParse::Complete(flushed)) => {
                        headers.extend(flushed);
                        return Ok(Some(headers));
                    }
                    Ok(HeadersParse::Batch(flushed)) => headers.extend(flushed),
                    Ok(HeadersParse::Again(flushed)) => {
                        headers.extend(flushed);
                        break;
                    }
                    Err(_) => return Err(()),
                }
            }
            if accepted == 0 {
                return Ok(None);
            }
        }
    }
    Ok(None)
}

fuzz_target!(|data: &[u8]| {
    // 同じ入力なら、分割サイズと容量が違っても連結結果は一致する
    let base = collect(data, data.len().max(1), 16 * 1024);
    for (chunk_size, capacity) in [(1, 16 * 1024), (13, 64), (3, 48)] {
        let other = collect(data, chunk_size, capacity);
        match (&base, &other) {
            // 小容量側だけが容量系エラーになるのは許容する
            (Ok(Some(a)), Ok(Some(b))) => assert_eq!(a, b),
            _ => {}
        }
    }
});
