//! Typed - 型付き Activity API
//!
//! chain の一番内側（実際に activity を実行するリンク）。
//!
//! # 二層構造
//! - **表層（Typed）**: `Activity` trait - 入出力の型を静的に持つ
//! - **内部（Dyn）**: `DynActivity` trait - object-safe, type erasure
//!
//! `ActivityRegistry` は `FunctionRef` で `DynActivity` を引き、
//! `ActivityInbound` として chain の終端になる。

pub mod activity;
pub mod registry;

pub use self::activity::{Activity, DynActivity, TypedActivity};
pub use self::registry::{ActivityRegistry, DispatchError, RegistryError};
