/*
 * @Description  : 训练循环与评估循环
 *
 * 训练：逐批 forward → 交叉熵(含梯度) → backward → SGD 更新，
 *       每隔 log_every 个批次打印一次批损失与进度计数。
 * 评估：只走 infer（不产生梯度状态），累计总损失与 top-1 命中数。
 */

use crate::data::DataLoader;
use crate::nn::loss::{cross_entropy, cross_entropy_with_grad, predicted_classes};
use crate::nn::optimizer::Optimizer;
use crate::nn::Sequential;

/// 超参数集合：整个训练过程固定，无调度、无衰减
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// 学习率
    pub learning_rate: f32,
    /// 批大小
    pub batch_size: usize,
    /// 轮数（每轮完整遍历一次训练集）
    pub epochs: usize,
    /// 每隔多少个批次打印一次进度（0 = 不打印）
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            batch_size: 64,
            epochs: 5,
            log_every: 100,
        }
    }
}

/// 评估结果
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    /// 平均损失（总损失 ÷ 样本数）
    pub avg_loss: f32,
    /// top-1 预测命中数
    pub correct: usize,
    /// 样本总数
    pub total: usize,
}

impl EvalReport {
    /// 准确率（命中 ÷ 总数），取值 [0, 1]
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }
}

/// 训练一轮：按数据集顺序遍历一遍训练集
///
/// # 返回
/// 本轮所有批次损失的平均值
pub fn train_one_epoch(
    model: &mut Sequential,
    loader: &DataLoader,
    optimizer: &mut dyn Optimizer,
    log_every: usize,
) -> f32 {
    let total = loader.len();
    let mut seen = 0usize;
    let mut loss_sum = 0.0f32;
    let mut num_batches = 0usize;

    for (batch_idx, (x_batch, y_batch)) in loader.iter().enumerate() {
        let logits = model.forward(&x_batch);
        let (loss, grad) = cross_entropy_with_grad(&logits, &y_batch);

        optimizer.zero_grad(model);
        model.backward(&grad);
        optimizer.step(model);

        seen += x_batch.nrows();
        loss_sum += loss;
        num_batches += 1;

        // 纯观测性输出，不影响训练状态
        if log_every > 0 && batch_idx % log_every == 0 {
            println!("loss: {loss:>9.6}  [{seen:>5}/{total:>5}]");
        }
    }

    if num_batches == 0 {
        0.0
    } else {
        loss_sum / num_batches as f32
    }
}

/// 评估：遍历一遍数据集，累计总损失与 top-1 命中数
///
/// 对模型参数只读，不留下任何梯度状态。
pub fn evaluate(model: &Sequential, loader: &DataLoader) -> EvalReport {
    let mut loss_sum = 0.0f32;
    let mut correct = 0usize;
    let mut total = 0usize;

    for (x_batch, y_batch) in loader.iter() {
        let scores = model.infer(&x_batch);
        loss_sum += cross_entropy(&scores, &y_batch) * x_batch.nrows() as f32;

        for (pred, &label) in predicted_classes(&scores).iter().zip(&y_batch) {
            if *pred == label {
                correct += 1;
            }
        }
        total += x_batch.nrows();
    }

    EvalReport {
        avg_loss: if total == 0 {
            0.0
        } else {
            loss_sum / total as f32
        },
        correct,
        total,
    }
}
