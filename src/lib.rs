//! # shiguredo_httpline
//!
//! 依存なしの HTTP/1.x プリアンブル (開始行とヘッダーブロック) インクリメンタルパーサー
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **インクリメンタル**: 入力がどのように分割されて届いても同じ結果
//! - **固定容量バッファ**: 読み込みバッファは拡張されず、コンパクションで空きを作る
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_httpline::{HeadersParse, Parser, ReadBuffer};
//!
//! let mut buffer = ReadBuffer::new();
//! let mut parser = Parser::new();
//!
//! // ソケットから読んだバイト列を feed する
//! buffer.feed(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n");
//!
//! // リクエストラインのパース (Ok(None) なら続きの入力を待つ)
//! let request = parser.parse_request_line(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.method.as_str(), "GET");
//! assert_eq!(request.url.path.as_deref(), Some("/index.html"));
//!
//! // ヘッダーブロックのパース
//! match parser.parse_headers(&mut buffer).unwrap() {
//!     HeadersParse::Complete(headers) => {
//!         assert_eq!(headers, vec!["Host: example.com".to_string()]);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod buffer;
pub mod date;
mod error;
mod host;
mod method;
mod parser;
mod scan;
mod span;
mod url;

pub use buffer::ReadBuffer;
pub use error::ParseError;
pub use method::Method;
pub use parser::{HeadersParse, Parser, RequestLine, StatusLine};
pub use url::{parse_url, Url};
