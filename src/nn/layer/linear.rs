/*
 * @Description  : Linear (全连接) 层
 *
 * PyTorch 风格的全连接层：`output = x @ W + b`，
 * 反向传播显式实现（∇W = xᵀ·g，∇b = Σ_rows g，∇x = g·Wᵀ）。
 */

use std::collections::HashMap;

use ndarray::{Array2, Axis};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::Rng;

use super::StageOp;
use crate::nn::NnError;

/// Linear (全连接) 层
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
///
/// 参数命名沿用 `{name}_W` / `{name}_b` 约定，
/// 参数快照与加载都以该名字为键。
pub struct Linear {
    /// 层名称前缀（决定参数键名）
    name: String,
    /// 权重参数 [in_features, out_features]
    weights: Array2<f32>,
    /// 偏置参数 [1, out_features]
    bias: Array2<f32>,
    /// 最近一次 backward 得到的权重梯度
    grad_weights: Array2<f32>,
    /// 最近一次 backward 得到的偏置梯度
    grad_bias: Array2<f32>,
    /// 训练模式下缓存的输入（backward 需要）
    cached_input: Option<Array2<f32>>,
}

impl Linear {
    /// 创建新的 Linear 层
    ///
    /// 权重用 Kaiming 均匀初始化（适合 ReLU），偏置零初始化。
    ///
    /// # 参数
    /// - `in_features`: 输入特征维度
    /// - `out_features`: 输出特征维度
    /// - `name`: 层名称前缀
    /// - `rng`: 随机数发生器（由模型构建方统一播种，保证可重复）
    pub fn new(in_features: usize, out_features: usize, name: &str, rng: &mut StdRng) -> Self {
        let bound = (6.0 / in_features as f32).sqrt();
        let dist = Uniform::new(-bound, bound);
        let weights = Array2::from_shape_fn((in_features, out_features), |_| rng.sample(dist));

        Self {
            name: name.to_string(),
            weights,
            bias: Array2::zeros((1, out_features)),
            grad_weights: Array2::zeros((in_features, out_features)),
            grad_bias: Array2::zeros((1, out_features)),
            cached_input: None,
        }
    }

    /// 获取输入特征维度
    pub fn in_features(&self) -> usize {
        self.weights.nrows()
    }

    /// 获取输出特征维度
    pub fn out_features(&self) -> usize {
        self.weights.ncols()
    }

    /// 获取权重 [in_features, out_features]
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// 获取偏置 [1, out_features]
    pub fn bias(&self) -> &Array2<f32> {
        &self.bias
    }

    /// 权重参数键名
    pub fn weights_key(&self) -> String {
        format!("{}_W", self.name)
    }

    /// 偏置参数键名
    pub fn bias_key(&self) -> String {
        format!("{}_b", self.name)
    }

    /// 从命名映射中取走一个参数并做形状校验
    fn take_param(
        params: &mut HashMap<String, Array2<f32>>,
        key: &str,
        expected: &[usize],
    ) -> Result<Array2<f32>, NnError> {
        let value = params
            .remove(key)
            .ok_or_else(|| NnError::MissingParameter(key.to_string()))?;
        if value.shape() != expected {
            return Err(NnError::ShapeMismatch {
                name: key.to_string(),
                expected: expected.to_vec(),
                got: value.shape().to_vec(),
            });
        }
        Ok(value)
    }
}

impl StageOp for Linear {
    fn forward(&mut self, x: &Array2<f32>) -> Array2<f32> {
        self.cached_input = Some(x.clone());
        x.dot(&self.weights) + &self.bias
    }

    fn infer(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.weights) + &self.bias
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Array2<f32> {
        let x = self
            .cached_input
            .take()
            .expect("Linear::backward 必须在 forward 之后调用");

        self.grad_weights = x.t().dot(grad_output);
        self.grad_bias = grad_output.sum_axis(Axis(0)).insert_axis(Axis(0));

        grad_output.dot(&self.weights.t())
    }

    fn update_parameters(&mut self, learning_rate: f32) {
        self.weights.scaled_add(-learning_rate, &self.grad_weights);
        self.bias.scaled_add(-learning_rate, &self.grad_bias);
    }

    fn zero_grad(&mut self) {
        self.grad_weights.fill(0.0);
        self.grad_bias.fill(0.0);
    }

    fn state_dict(&self) -> Vec<(String, Array2<f32>)> {
        vec![
            (self.weights_key(), self.weights.clone()),
            (self.bias_key(), self.bias.clone()),
        ]
    }

    fn load_state(
        &mut self,
        params: &mut HashMap<String, Array2<f32>>,
    ) -> Result<(), NnError> {
        self.weights = Self::take_param(params, &self.weights_key(), self.weights.shape())?;
        self.bias = Self::take_param(params, &self.bias_key(), self.bias.shape())?;
        Ok(())
    }

    fn num_parameters(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}
