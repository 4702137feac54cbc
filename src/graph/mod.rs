/*
 * @Description  : 可移植计算图格式与前向追踪导出
 *
 * 对处于评估模式的模型执行一次前向传播，把实际执行到的算子序列
 * 连同当前参数值冻结进一个自包含的二进制文件。该文件不依赖 nn
 * 模块即可被执行（见 runtime 模块）。
 */

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nn::{Sequential, Stage, StageOp};

/// 计算图相关错误
#[derive(Debug, Error)]
pub enum GraphError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 编解码错误
    #[error("计算图编解码失败: {0}")]
    CodecError(#[from] bincode::Error),

    /// 输入形状不匹配
    #[error("输入形状不匹配: 期望宽度 {expected}, 实际 {got}")]
    InputWidthMismatch { expected: usize, got: usize },

    /// 追踪用的代表性输入必须恰好是一个样本
    #[error("追踪输入必须是单个样本 [1, 宽度]，实际形状 {got:?}")]
    BadTraceInput { got: Vec<usize> },
}

/// 计算图算子：参数值在导出时被冻结进算子本身
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GraphOp {
    /// 矩阵乘法：`y = x · W`
    MatMul { weights: Array2<f32> },
    /// 行广播加偏置：`y = x + b`
    BiasAdd { bias: Array2<f32> },
    /// 逐元素 `max(0, x)`
    Relu,
}

/// 追踪得到的可移植计算图：算子序列 + 冻结参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracedGraph {
    /// 单个样本展平后的输入宽度
    pub input_width: usize,
    /// 输出分数向量宽度（类别数）
    pub output_width: usize,
    /// 按执行顺序排列的算子
    pub ops: Vec<GraphOp>,
}

impl TracedGraph {
    /// 把计算图序列化到文件（bincode 二进制格式）
    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        let file = BufWriter::new(File::create(path)?);
        bincode::serialize_into(file, self)?;
        Ok(())
    }

    /// 从文件反序列化计算图
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let file = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(file)?)
    }
}

/// 追踪一次前向传播，导出可移植计算图
///
/// # 参数
/// - `model`: 训练完成的模型（按评估模式执行，不触碰梯度状态）
/// - `sample`: 代表性输入，形状必须是 [1, input_width]
///
/// # 返回
/// 记录了执行算子与冻结参数的 [`TracedGraph`]
pub fn trace(model: &Sequential, sample: &Array2<f32>) -> Result<TracedGraph, GraphError> {
    if sample.nrows() != 1 || sample.ncols() == 0 {
        return Err(GraphError::BadTraceInput {
            got: sample.shape().to_vec(),
        });
    }

    let input_width = sample.ncols();
    let mut ops = Vec::new();
    let mut cur = sample.clone();

    for stage in model.stages() {
        match stage {
            Stage::Linear(linear) => {
                ops.push(GraphOp::MatMul {
                    weights: linear.weights().clone(),
                });
                ops.push(GraphOp::BiasAdd {
                    bias: linear.bias().clone(),
                });
            }
            Stage::Relu(_) => ops.push(GraphOp::Relu),
        }
        // 真实执行这一步，让形状错误在追踪期就暴露
        cur = stage.infer(&cur);
    }

    Ok(TracedGraph {
        input_width,
        output_width: cur.ncols(),
        ops,
    })
}
