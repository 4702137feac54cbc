/*
 * @Description  : 梯度下降优化器实现
 */

use super::Optimizer;
use crate::nn::Sequential;

/// SGD (随机梯度下降) 优化器
///
/// 纯梯度下降：θ = θ - α * ∇θ，无动量、无学习率衰减。
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// 创建新的 SGD 优化器
    ///
    /// # 参数
    /// - `learning_rate`: 学习率，整个训练过程固定不变
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for SGD {
    fn zero_grad(&mut self, model: &mut Sequential) {
        model.zero_grad();
    }

    fn step(&mut self, model: &mut Sequential) {
        model.update_parameters(self.learning_rate);
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }
}
