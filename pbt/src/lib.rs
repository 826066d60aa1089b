//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// URL 生成 (RFC 3986 のサブセット)
// ========================================

/// スキーム: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub fn scheme() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9+.-]{0,7}".prop_map(|s| s)
}

/// ホスト名 (reg-name のサブセット)
pub fn hostname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,14}\\.[a-z]{2,4}".prop_map(|s| s)
}

/// ポート番号
pub fn port() -> impl Strategy<Value = String> {
    (1u32..65536).prop_map(|p| p.to_string())
}

/// パスセグメント用の文字列 (pchar のサブセット)
pub fn path_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._~!$&'()*+,;=:@-]{1,16}".prop_map(|s| s)
}

/// origin-form のパス: "/" *( segment "/" )
pub fn origin_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(path_segment(), 0..=3)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// クエリ文字列 ("?" "#" を含まない)
pub fn query() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9=&._-]{1,24}".prop_map(|s| s)
}

/// フラグメント
pub fn fragment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._-]{1,16}".prop_map(|s| s)
}

// ========================================
// ヘッダー行生成 (RFC 9110 のサブセット)
// ========================================

/// ヘッダーフィールド名 (token のサブセット)
pub fn field_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,24}".prop_map(|s| s)
}

/// ヘッダーフィールド値 (可視 ASCII と空白、CR LF NUL を含まない)
pub fn field_value() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,60}[!-~])?".prop_map(|s| s)
}

/// ヘッダー行 1 本: "Name: value"
pub fn header_line() -> impl Strategy<Value = String> {
    (field_name(), field_value()).prop_map(|(name, value)| format!("{}: {}", name, value))
}

/// ヘッダーブロック: 0 本以上のヘッダー行
pub fn header_block(max_lines: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(header_line(), 0..=max_lines)
}

// ========================================
// 入力分割生成
// ========================================

/// `len` バイトの入力を切る位置の列 (昇順、重複なし)
pub fn split_points(len: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::btree_set(1..len.max(2), 0..=8)
        .prop_map(|set| set.into_iter().collect())
}

/// 入力を split_points で分割したチャンク列に変換する
pub fn chunks_of(input: &[u8], points: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for &p in points {
        if p > start && p < input.len() {
            chunks.push(input[start..p].to_vec());
            start = p;
        }
    }
    chunks.push(input[start..].to_vec());
    chunks
}
