/*
 * @Description  : 独立的计算图执行器
 *
 * 只认识 graph 模块定义的算子序列与 ndarray 数组，
 * 完全不依赖 nn 模块——加载导出的图文件后即可脱离原模型做推理。
 */

use std::path::Path;

use ndarray::{Array1, Array2, Axis};

use crate::graph::{GraphError, GraphOp, TracedGraph};

/// 计算图执行器
///
/// # 使用示例
/// ```ignore
/// let runtime = GraphRuntime::load(Path::new("fashion_mlp.graph"))?;
/// let scores = runtime.run_sample(&image)?; // image: [784]
/// ```
pub struct GraphRuntime {
    graph: TracedGraph,
}

impl GraphRuntime {
    /// 从图文件加载执行器
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        Ok(Self {
            graph: TracedGraph::load(path)?,
        })
    }

    /// 直接由内存中的计算图构建执行器
    pub fn from_graph(graph: TracedGraph) -> Self {
        Self { graph }
    }

    /// 输入宽度（单个样本展平后的维度）
    pub fn input_width(&self) -> usize {
        self.graph.input_width
    }

    /// 输出宽度（类别数）
    pub fn output_width(&self) -> usize {
        self.graph.output_width
    }

    /// 对一批输入执行计算图
    ///
    /// # 参数
    /// - `input`: [batch, input_width]
    ///
    /// # 返回
    /// 分数数组 [batch, output_width]
    pub fn run(&self, input: &Array2<f32>) -> Result<Array2<f32>, GraphError> {
        if input.ncols() != self.graph.input_width {
            return Err(GraphError::InputWidthMismatch {
                expected: self.graph.input_width,
                got: input.ncols(),
            });
        }

        let mut cur = input.clone();
        for op in &self.graph.ops {
            cur = match op {
                GraphOp::MatMul { weights } => cur.dot(weights),
                GraphOp::BiasAdd { bias } => cur + bias,
                GraphOp::Relu => cur.mapv(|v| v.max(0.0)),
            };
        }
        Ok(cur)
    }

    /// 对单个样本执行计算图
    ///
    /// # 参数
    /// - `input`: [input_width]
    ///
    /// # 返回
    /// 分数向量 [output_width]
    pub fn run_sample(&self, input: &Array1<f32>) -> Result<Array1<f32>, GraphError> {
        let batched = input.view().insert_axis(Axis(0)).to_owned();
        let scores = self.run(&batched)?;
        Ok(scores.index_axis(Axis(0), 0).to_owned())
    }
}
