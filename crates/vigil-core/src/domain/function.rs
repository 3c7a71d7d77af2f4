//! FunctionRef - activity 関数の識別子

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the function an activity invocation targets.
///
/// `module` is the dotted module path and `qualname` the qualified name
/// inside it (e.g. `Class.method`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionRef {
    pub module: String,
    pub qualname: String,
}

impl FunctionRef {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
        }
    }

    /// Monitoring transaction name: `<module>.<qualname>`.
    pub fn transaction_name(&self) -> String {
        format!("{}.{}", self.module, self.qualname)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.qualname)
    }
}
