//! 网络与检查点错误类型定义

use ndarray_npy::{ReadNpzError, WriteNpzError};
use thiserror::Error;

/// 网络构建、参数加载相关错误
#[derive(Debug, Error)]
pub enum NnError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 读取 NPZ 快照失败
    #[error("读取参数快照失败: {0}")]
    NpzReadError(#[from] ReadNpzError),

    /// 写入 NPZ 快照失败
    #[error("写入参数快照失败: {0}")]
    NpzWriteError(#[from] WriteNpzError),

    /// 快照中缺少参数
    #[error("参数快照中缺少 {0}")]
    MissingParameter(String),

    /// 快照中存在模型结构之外的参数
    #[error("参数快照中存在多余的 {0}")]
    UnexpectedParameter(String),

    /// 参数形状不匹配
    #[error("参数 {name} 形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}
