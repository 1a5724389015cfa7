//! Postgres Chat Repository 実装
//!
//! sqlx の接続プールを使った ChatRepository の本番実装。
//! 複数ステートメントから成る操作は 1 つのトランザクション
//! （Postgres のデフォルトである read committed）で実行し、
//! 部分的な書き込みが残らないことを保証します。
//! スキーマは `migrations/` を参照。

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::{Chat, ChatId, ChatRepository, MessageText, RepositoryError, Username};

/// Postgres Chat Repository 実装
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// データベースへ接続し、マイグレーションを適用して作成する
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(storage)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    /// 既存のプールから作成する
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn create_chat(
        &self,
        name: &str,
        usernames: &[String],
    ) -> Result<ChatId, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let chat_id: i64 =
            sqlx::query_scalar("INSERT INTO chats (chat_name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&mut *tx)
                .await
                .map_err(storage)?;

        for username in usernames {
            // 既存ユーザーはそのまま、未知のユーザーは新規登録する
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
                    .bind(username)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(storage)?;

            let user_id = match existing {
                Some(id) => id,
                None => {
                    sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
                        .bind(username)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(storage)?
                }
            };

            sqlx::query("INSERT INTO users_in_chats (chat_id, user_id) VALUES ($1, $2)")
                .bind(chat_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;

        Ok(ChatId::new(chat_id))
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let is_deleted: Option<bool> =
            sqlx::query_scalar("SELECT is_deleted FROM chats WHERE id = $1")
                .bind(chat_id.value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage)?;

        match is_deleted {
            Some(false) => {}
            _ => return Err(RepositoryError::ChatNotFound(chat_id.value())),
        }

        sqlx::query("UPDATE chats SET is_deleted = TRUE WHERE id = $1")
            .bind(chat_id.value())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        Ok(())
    }

    async fn get_user_chats(&self, username: &Username) -> Result<Vec<Chat>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT c.id, c.chat_name \
             FROM chats c \
             JOIN users_in_chats uc ON uc.chat_id = c.id \
             JOIN users u ON u.id = uc.user_id \
             WHERE u.username = $1 AND c.is_deleted = FALSE \
             ORDER BY c.id",
        )
        .bind(username.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;

        let mut chats = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            let usernames: Vec<String> = sqlx::query_scalar(
                "SELECT u.username \
                 FROM users u \
                 JOIN users_in_chats uc ON uc.user_id = u.id \
                 WHERE uc.chat_id = $1 \
                 ORDER BY u.username",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(storage)?;

            chats.push(Chat {
                id,
                name,
                usernames,
            });
        }

        tx.commit().await.map_err(storage)?;

        Ok(chats)
    }

    async fn save_message(
        &self,
        chat_id: ChatId,
        from: &Username,
        text: &MessageText,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // 永続化と同一トランザクション内でチャットの存在と
        // メンバーシップを再検証する
        let user_id = check_chat_tx(&mut tx, chat_id, from).await?;

        sqlx::query(
            "INSERT INTO messages (chat_id, user_id, message_text) VALUES ($1, $2, $3)",
        )
        .bind(chat_id.value())
        .bind(user_id)
        .bind(text.as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        Ok(())
    }

    async fn check_chat(
        &self,
        chat_id: ChatId,
        username: &Username,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        check_chat_tx(&mut tx, chat_id, username).await?;
        tx.commit().await.map_err(storage)?;
        Ok(())
    }
}

/// チャットが存在し（削除されておらず）、ユーザーがそのメンバーで
/// あることを検証し、ユーザー ID を返す
async fn check_chat_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    chat_id: ChatId,
    username: &Username,
) -> Result<i64, RepositoryError> {
    let is_deleted: Option<bool> = sqlx::query_scalar("SELECT is_deleted FROM chats WHERE id = $1")
        .bind(chat_id.value())
        .fetch_optional(&mut **tx)
        .await
        .map_err(storage)?;

    match is_deleted {
        Some(false) => {}
        _ => return Err(RepositoryError::ChatNotFound(chat_id.value())),
    }

    let user_id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(storage)?;

    let Some(user_id) = user_id else {
        return Err(RepositoryError::UserNotFound(
            username.as_str().to_string(),
        ));
    };

    let member: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM users_in_chats WHERE chat_id = $1 AND user_id = $2",
    )
    .bind(chat_id.value())
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(storage)?;

    if member.is_none() {
        return Err(RepositoryError::NotAMember {
            username: username.as_str().to_string(),
            chat_id: chat_id.value(),
        });
    }

    Ok(user_id)
}
