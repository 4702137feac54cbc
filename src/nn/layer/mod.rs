/*
 * @Description  : 网络阶段（layer）模块
 *
 * 模型是阶段的有序堆叠，阶段种类是封闭集合：
 * - Linear: 持有可学习的权重矩阵与偏置向量
 * - Relu  : 无状态的逐元素非线性
 *
 * 用 enum_dispatch 做静态分发，避免 trait object 开销。
 */

use std::collections::HashMap;

use enum_dispatch::enum_dispatch;
use ndarray::Array2;

mod linear;
mod relu;

pub use linear::Linear;
pub use relu::Relu;

use super::NnError;

/// 网络阶段的封闭集合
#[enum_dispatch]
pub enum Stage {
    Linear(Linear),
    Relu(Relu),
}

/// 阶段统一接口
///
/// `forward` 为训练模式（缓存反向传播所需的中间量），
/// `infer` 为评估模式（只读，不触碰任何梯度状态）。
#[enum_dispatch(Stage)]
pub trait StageOp {
    /// 训练模式前向传播
    ///
    /// 输入输出第一维均为 batch。阶段间的形状兼容性由构建时的维度
    /// 选择保证，调用时不做校验（不匹配会在矩阵乘法内部 panic）。
    fn forward(&mut self, x: &Array2<f32>) -> Array2<f32>;

    /// 评估模式前向传播（不缓存、不产生梯度状态）
    fn infer(&self, x: &Array2<f32>) -> Array2<f32>;

    /// 反向传播：给定对本阶段输出的梯度，计算并缓存参数梯度，
    /// 返回对本阶段输入的梯度
    ///
    /// # Panics
    /// 如果在 `forward` 之前调用
    fn backward(&mut self, grad_output: &Array2<f32>) -> Array2<f32>;

    /// 梯度下降更新：θ ← θ − lr·∇θ（无参数的阶段为空操作）
    fn update_parameters(&mut self, _learning_rate: f32) {}

    /// 清零已缓存的参数梯度
    fn zero_grad(&mut self) {}

    /// 导出本阶段的命名参数（`{名称}_W` / `{名称}_b`）
    fn state_dict(&self) -> Vec<(String, Array2<f32>)> {
        Vec::new()
    }

    /// 从命名参数映射中取走并装载本阶段的参数
    fn load_state(
        &mut self,
        _params: &mut HashMap<String, Array2<f32>>,
    ) -> Result<(), NnError> {
        Ok(())
    }

    /// 可学习标量参数总数
    fn num_parameters(&self) -> usize {
        0
    }
}
