//! Domain model - interceptor が扱う per-call データ
//!
//! - **function**: 実行対象関数の識別子（transaction 名の元）
//! - **args**: activity の位置引数（Record / Value / Bytes の tagged variant）
//! - **info**: orchestration engine が提供する実行メタデータ
//! - **errors**: activity が返すエラーのハンドル
//! - **keys**: scope に書き込む tag / context のキー

pub mod args;
pub mod errors;
pub mod function;
pub mod info;
pub mod keys;

pub use self::args::{ActivityArg, args_to_json};
pub use self::errors::{ActivityError, MessageError};
pub use self::function::FunctionRef;
pub use self::info::{ActivityInfo, WorkflowIdentity};
pub use self::keys::ContextMap;
