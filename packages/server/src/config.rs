//! サーバ設定
//!
//! 環境変数から読み込みます。
//!
//! - `DATABASE_URL`: Postgres の接続 URL。未設定の場合はインメモリの
//!   ストアで起動します（ローカル実行用）。
//! - `AUTH_ENDPOINT`: 外部 auth サービスのベース URL。未設定の場合は
//!   全ての呼び出しを許可します。

/// サーバ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Postgres 接続 URL（None ならインメモリストア）
    pub database_url: Option<String>,
    /// 外部 auth サービスのベース URL（None なら全許可）
    pub auth_endpoint: Option<String>,
}

impl Config {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の lookup 関数から設定を読み込む（テスト用途）
    ///
    /// 空文字列は未設定と同じ扱いになります。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            database_url: non_empty("DATABASE_URL"),
            auth_endpoint: non_empty("AUTH_ENDPOINT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_all_variables_set() {
        // テスト項目: 設定済みの環境変数が読み込まれる
        // given (前提条件):
        let lookup = lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/idobata"),
            ("AUTH_ENDPOINT", "http://auth:9000"),
        ]);

        // when (操作):
        let config = Config::from_lookup(lookup);

        // then (期待する結果):
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/idobata")
        );
        assert_eq!(config.auth_endpoint.as_deref(), Some("http://auth:9000"));
    }

    #[test]
    fn test_missing_variables_default_to_none() {
        // テスト項目: 未設定の環境変数は None になる
        // given (前提条件):
        let lookup = lookup_from(&[]);

        // when (操作):
        let config = Config::from_lookup(lookup);

        // then (期待する結果):
        assert_eq!(config.database_url, None);
        assert_eq!(config.auth_endpoint, None);
    }

    #[test]
    fn test_empty_string_is_treated_as_unset() {
        // テスト項目: 空文字列は未設定と同じ扱いになる
        // given (前提条件):
        let lookup = lookup_from(&[("DATABASE_URL", "")]);

        // when (操作):
        let config = Config::from_lookup(lookup);

        // then (期待する結果):
        assert_eq!(config.database_url, None);
    }
}
