/*
 * @Description  : 优化器模块，PyTorch 风格的梯度优化 API
 */

mod sgd;

pub use sgd::SGD;

use super::Sequential;

/// Optimizer trait（PyTorch 风格）
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SGD::new(1e-3);
///
/// // 训练循环
/// let logits = model.forward(&x);
/// let (loss, grad) = cross_entropy_with_grad(&logits, &y);
/// optimizer.zero_grad(&mut model);
/// model.backward(&grad);
/// optimizer.step(&mut model);
/// ```
pub trait Optimizer {
    /// 清零模型中所有参数的梯度
    fn zero_grad(&mut self, model: &mut Sequential);

    /// 按当前缓存的梯度更新模型参数
    fn step(&mut self, model: &mut Sequential);

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);
}
