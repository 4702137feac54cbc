/*
 * @Description  : ReLU 非线性阶段
 *
 * 逐元素 `max(0, x)`，无可学习参数；
 * 训练模式下缓存掩码供反向传播使用。
 */

use ndarray::Array2;

use super::StageOp;

/// ReLU 阶段
///
/// `output[i] = max(0, input[i])`
#[derive(Default)]
pub struct Relu {
    /// 训练模式下缓存的导数掩码（x > 0 处为 1，否则为 0）
    mask: Option<Array2<f32>>,
}

impl Relu {
    /// 创建新的 ReLU 阶段
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageOp for Relu {
    fn forward(&mut self, x: &Array2<f32>) -> Array2<f32> {
        self.mask = Some(x.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }));
        x.mapv(|v| v.max(0.0))
    }

    fn infer(&self, x: &Array2<f32>) -> Array2<f32> {
        x.mapv(|v| v.max(0.0))
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Array2<f32> {
        let mask = self
            .mask
            .take()
            .expect("Relu::backward 必须在 forward 之后调用");
        grad_output * &mask
    }
}
