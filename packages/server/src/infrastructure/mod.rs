//! Infrastructure 層
//!
//! - `registry`: 部屋ごとの接続集合と保留キュー（インメモリ）
//! - `repository`: ChatRepository の具体的な実装（Postgres / InMemory）
//! - `auth`: 外部認可サービスへの問い合わせ
//! - `dto`: プロトコルごとの Data Transfer Object

pub mod auth;
pub mod dto;
pub mod registry;
pub mod repository;
