//! 交叉熵损失单元测试

use approx::assert_abs_diff_eq;
use ndarray::{array, Axis};

use crate::nn::loss::{cross_entropy, cross_entropy_with_grad, predicted_classes};

#[test]
fn test_cross_entropy_uniform_logits() {
    // 全零 logits → softmax 均匀分布 → 损失 = ln(10)
    let logits = ndarray::Array2::<f32>::zeros((4, 10));
    let labels = vec![0, 3, 7, 9];
    let loss = cross_entropy(&logits, &labels);
    assert_abs_diff_eq!(loss, 10.0f32.ln(), epsilon = 1e-5);
}

#[test]
fn test_cross_entropy_confident_prediction() {
    // logits 极度偏向正确类别时损失趋近 0
    let logits = array![[20.0, 0.0, 0.0]];
    let loss = cross_entropy(&logits, &[0]);
    assert!(loss < 1e-6, "损失应趋近 0，实际 {loss}");

    // 偏向错误类别时损失巨大
    let wrong = cross_entropy(&logits, &[1]);
    assert!(wrong > 10.0);
}

#[test]
fn test_cross_entropy_loss_nonnegative() {
    let logits = array![[1.0, -2.0, 0.5], [0.1, 0.2, 0.3]];
    assert!(cross_entropy(&logits, &[2, 0]) >= 0.0);
}

#[test]
fn test_grad_rows_sum_to_zero() {
    // softmax − one_hot 每行求和为 0（概率和 1 减去 one-hot 和 1）
    let logits = array![[0.3, -1.2, 2.0], [1.0, 1.0, 1.0]];
    let (_, grad) = cross_entropy_with_grad(&logits, &[1, 2]);
    for row in grad.axis_iter(Axis(0)) {
        assert_abs_diff_eq!(row.sum(), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_grad_matches_finite_difference() {
    let logits = array![[0.5, -0.3, 1.2, 0.0]];
    let labels = vec![2];
    let (_, grad) = cross_entropy_with_grad(&logits, &labels);

    let eps = 1e-3f32;
    for j in 0..4 {
        let mut plus = logits.clone();
        plus[[0, j]] += eps;
        let mut minus = logits.clone();
        minus[[0, j]] -= eps;
        let numeric =
            (cross_entropy(&plus, &labels) - cross_entropy(&minus, &labels)) / (2.0 * eps);
        assert_abs_diff_eq!(grad[[0, j]], numeric, epsilon = 1e-3);
    }
}

#[test]
fn test_grad_with_and_without_matches() {
    let logits = array![[0.1, 0.9], [2.0, -2.0]];
    let labels = vec![1, 0];
    let (loss_a, _) = cross_entropy_with_grad(&logits, &labels);
    let loss_b = cross_entropy(&logits, &labels);
    assert_abs_diff_eq!(loss_a, loss_b, epsilon = 1e-6);
}

#[test]
fn test_predicted_classes() {
    let scores = array![
        [0.1, 0.9, 0.0],
        [5.0, 1.0, 2.0],
        [0.0, 0.0, 0.0] // 并列时取最小下标
    ];
    assert_eq!(predicted_classes(&scores), vec![1, 0, 0]);
}

#[test]
#[should_panic(expected = "必须一致")]
fn test_label_count_mismatch_panics() {
    let logits = ndarray::Array2::<f32>::zeros((3, 10));
    let _ = cross_entropy(&logits, &[0, 1]);
}
