//! 外部認可サービスへの問い合わせ
//!
//! 全ての操作はコアロジックの前に 1 回だけ認可チェックを通ります。
//! 呼び出し元の資格情報（Authorization ヘッダ）と論理メソッド名を
//! 外部の auth サービスに渡し、許可・拒否の判定を受け取ります。

use async_trait::async_trait;
use thiserror::Error;

/// 認可チェックのエラー
#[derive(Debug, Error)]
pub enum AccessError {
    /// 呼び出しが拒否された
    #[error("access denied for {0}")]
    Denied(String),

    /// auth サービス自体に到達できない・応答が不正
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// 認可チェックのインターフェース
///
/// 実装は外部サービスへの問い合わせ（本番）か、
/// 常に許可するスタブ（ローカル・テスト）のいずれか。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessChecker: Send + Sync {
    /// 指定の論理メソッドの呼び出しが許可されているかを確認する
    async fn check<'a>(&self, token: Option<&'a str>, method: &str) -> Result<(), AccessError>;
}

/// HTTP 経由で外部 auth サービスへ問い合わせる実装
pub struct HttpAccessChecker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAccessChecker {
    /// 新しい HttpAccessChecker を作成
    ///
    /// `endpoint` は auth サービスのベース URL（例: `http://auth:9000`）。
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl AccessChecker for HttpAccessChecker {
    async fn check<'a>(&self, token: Option<&'a str>, method: &str) -> Result<(), AccessError> {
        let mut request = self
            .client
            .post(format!("{}/check", self.endpoint))
            .json(&serde_json::json!({ "method": method }));

        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AccessError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(AccessError::Denied(method.to_string()))
            }
            status => Err(AccessError::Unavailable(format!(
                "unexpected status {status}"
            ))),
        }
    }
}

/// 常に許可する実装（ローカル実行・テスト用）
pub struct AllowAllChecker;

#[async_trait]
impl AccessChecker for AllowAllChecker {
    async fn check<'a>(&self, _token: Option<&'a str>, _method: &str) -> Result<(), AccessError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allow_all_checker_always_permits() {
        // テスト項目: AllowAllChecker が全ての呼び出しを許可する
        // given (前提条件):
        let checker = AllowAllChecker;

        // when (操作):
        let result = checker.check(None, "SendMessage").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mock_checker_reports_denial() {
        // テスト項目: 拒否判定が呼び出し元へそのまま伝わる
        // given (前提条件): 全てを拒否する AccessChecker
        let mut checker = MockAccessChecker::new();
        checker
            .expect_check()
            .returning(|_, method| Err(AccessError::Denied(method.to_string())));

        // when (操作):
        let result = checker.check(Some("Bearer token"), "/api/chats").await;

        // then (期待する結果):
        assert!(matches!(result, Err(AccessError::Denied(method)) if method == "/api/chats"));
    }
}
