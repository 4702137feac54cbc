/*
 * @Description  : Sequential - 阶段的有序堆叠
 *
 * 模型 = 按序应用每个阶段：output = stage_n(...stage_1(input))。
 * 参数整体以「命名映射」的形式导出/装载，供检查点模块使用。
 */

use std::collections::HashMap;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::layer::{Linear, Relu, Stage, StageOp};
use super::NnError;

/// Sequential - 阶段的有序堆叠
///
/// # 使用示例
/// ```ignore
/// let mut model = fashion_mlp(42);
/// let logits = model.forward(&x_batch);      // 训练模式
/// let scores = model.infer(&x_batch);        // 评估模式
/// ```
pub struct Sequential {
    stages: Vec<Stage>,
}

impl Sequential {
    /// 由阶段列表构建模型
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// 训练模式前向传播：按序应用每个阶段并缓存反向所需中间量
    pub fn forward(&mut self, x: &Array2<f32>) -> Array2<f32> {
        self.stages
            .iter_mut()
            .fold(x.clone(), |cur, stage| stage.forward(&cur))
    }

    /// 评估模式前向传播：只读，不触碰梯度状态
    pub fn infer(&self, x: &Array2<f32>) -> Array2<f32> {
        self.stages
            .iter()
            .fold(x.clone(), |cur, stage| stage.infer(&cur))
    }

    /// 反向传播：从损失对输出的梯度出发，逆序穿过所有阶段，
    /// 各阶段在内部缓存自己的参数梯度
    ///
    /// # 返回
    /// 损失对模型输入的梯度（训练循环通常丢弃）
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Array2<f32> {
        self.stages
            .iter_mut()
            .rev()
            .fold(grad_output.clone(), |grad, stage| stage.backward(&grad))
    }

    /// 清零所有阶段的参数梯度
    pub fn zero_grad(&mut self) {
        for stage in &mut self.stages {
            stage.zero_grad();
        }
    }

    /// 梯度下降更新所有阶段的参数
    pub fn update_parameters(&mut self, learning_rate: f32) {
        for stage in &mut self.stages {
            stage.update_parameters(learning_rate);
        }
    }

    /// 导出全部命名参数（所有 Linear 阶段的权重与偏置）
    pub fn state_dict(&self) -> Vec<(String, Array2<f32>)> {
        self.stages
            .iter()
            .flat_map(StageOp::state_dict)
            .collect()
    }

    /// 从命名参数映射整体替换模型参数
    ///
    /// 结构兼容性由调用方负责：缺少参数、形状不符或存在
    /// 模型结构之外的参数都会返回错误。
    pub fn load_state_dict(
        &mut self,
        params: Vec<(String, Array2<f32>)>,
    ) -> Result<(), NnError> {
        let mut params: HashMap<String, Array2<f32>> = params.into_iter().collect();
        for stage in &mut self.stages {
            stage.load_state(&mut params)?;
        }
        if let Some(name) = params.into_keys().next() {
            return Err(NnError::UnexpectedParameter(name));
        }
        Ok(())
    }

    /// 可学习标量参数总数
    pub fn num_parameters(&self) -> usize {
        self.stages.iter().map(StageOp::num_parameters).sum()
    }

    /// 阶段列表（计算图追踪需要逐阶段检视）
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// 构建 FashionMNIST 分类网络：784 → 512 (ReLU) → 512 (ReLU) → 10 (ReLU)
///
/// 注意：最后的 ReLU 直接作用在类别分数上——这忠实复刻了原始教程的
/// 网络定义，训练与导出两条流水线必须使用同一结构。
///
/// # 参数
/// - `seed`: 随机种子，保证初始化可重复
pub fn fashion_mlp(seed: u64) -> Sequential {
    let mut rng = StdRng::seed_from_u64(seed);
    Sequential::new(vec![
        Stage::Linear(Linear::new(784, 512, "fc1", &mut rng)),
        Stage::Relu(Relu::new()),
        Stage::Linear(Linear::new(512, 512, "fc2", &mut rng)),
        Stage::Relu(Relu::new()),
        Stage::Linear(Linear::new(512, 10, "fc3", &mut rng)),
        Stage::Relu(Relu::new()),
    ])
}
