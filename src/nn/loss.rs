/*
 * @Description  : 交叉熵损失与预测辅助函数
 *
 * softmax + 交叉熵按 batch 取均值，数值上用减最大值稳定。
 * 标签为类别索引（非 one-hot）。
 */

use ndarray::{Array2, Axis};

/// 计算一个 batch 的平均交叉熵损失（评估用，无梯度）
///
/// # 参数
/// - `logits`: 类别分数 [batch, num_classes]
/// - `labels`: 真实类别索引，长度 = batch
///
/// # Panics
/// 如果 labels 长度与 batch 不一致
pub fn cross_entropy(logits: &Array2<f32>, labels: &[usize]) -> f32 {
    let (loss, _) = cross_entropy_stats(logits, labels, false);
    loss
}

/// 计算平均交叉熵损失及其对 logits 的梯度（训练用）
///
/// 梯度为 `(softmax(logits) − one_hot(labels)) / batch`。
///
/// # 返回
/// (平均损失, 梯度 [batch, num_classes])
pub fn cross_entropy_with_grad(
    logits: &Array2<f32>,
    labels: &[usize],
) -> (f32, Array2<f32>) {
    let (loss, grad) = cross_entropy_stats(logits, labels, true);
    (loss, grad.expect("梯度已请求"))
}

fn cross_entropy_stats(
    logits: &Array2<f32>,
    labels: &[usize],
    with_grad: bool,
) -> (f32, Option<Array2<f32>>) {
    let batch = logits.nrows();
    assert_eq!(
        batch,
        labels.len(),
        "cross_entropy: logits 的 batch ({}) 与标签数 ({}) 必须一致",
        batch,
        labels.len()
    );

    let mut loss_sum = 0.0f32;
    let mut grad = with_grad.then(|| Array2::zeros(logits.raw_dim()));

    for (i, row) in logits.axis_iter(Axis(0)).enumerate() {
        let label = labels[i];
        // 数值稳定：log-sum-exp 前先减最大值
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp_sum: f32 = row.iter().map(|&v| (v - max).exp()).sum();
        let log_sum_exp = max + exp_sum.ln();

        loss_sum += log_sum_exp - row[label];

        if let Some(grad) = grad.as_mut() {
            for (j, &v) in row.iter().enumerate() {
                let softmax = (v - max).exp() / exp_sum;
                let target = if j == label { 1.0 } else { 0.0 };
                grad[[i, j]] = (softmax - target) / batch as f32;
            }
        }
    }

    (loss_sum / batch as f32, grad)
}

/// 每个样本的 top-1 预测类别（最大分数所在下标，并列取最小下标）
pub fn predicted_classes(scores: &Array2<f32>) -> Vec<usize> {
    scores
        .axis_iter(Axis(0))
        .map(|row| {
            let mut best = (0, f32::NEG_INFINITY);
            for (idx, &v) in row.iter().enumerate() {
                if v > best.1 {
                    best = (idx, v);
                }
            }
            best.0
        })
        .collect()
}
