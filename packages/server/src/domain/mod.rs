//! ドメイン層
//!
//! チャット・ユーザー・メッセージのドメインモデルと、
//! データアクセスのインターフェース（Repository trait）を定義します。

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{Chat, OutboundMessage};
pub use error::{DomainError, RepositoryError};
pub use repository::ChatRepository;
pub use value_object::{ChatId, MessageText, Username};
