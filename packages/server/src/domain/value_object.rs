//! Value Object 定義
//!
//! 不変条件（非空など）をコンストラクタで強制します。
//! 不正な値を持つインスタンスは存在できません。

use super::error::DomainError;

/// チャット ID（ストアが採番する整数 ID）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(i64);

impl ChatId {
    /// 新しい ChatId を作成
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// 内部の整数値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザー名（前後の空白を除去した非空文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// 新しい Username を作成
    ///
    /// 前後の空白を除去し、空になった場合はエラーを返します。
    pub fn new(name: String) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyUsername);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 文字列スライスとして取得
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 内部の String を取得
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ本文（非空文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// 新しい MessageText を作成
    pub fn new(text: String) -> Result<Self, DomainError> {
        if text.is_empty() {
            return Err(DomainError::EmptyMessageText);
        }
        Ok(Self(text))
    }

    /// 文字列スライスとして取得
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 内部の String を取得
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
