//! 错误分类 (按错误码范围)

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx, and anything outside the known ranges
    General,
    /// 7xxx
    Table,
    /// 95xx, failures of the external order API
    Upstream,
    /// 9xxx
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            7000..8000 => Self::Table,
            9500..9600 => Self::Upstream,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Table => "table",
            Self::Upstream => "upstream",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
