//! 训练/评估循环单元测试（合成数据，不依赖真实数据集）

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{DataLoader, TensorDataset};
use crate::nn::layer::{Linear, Relu, Stage};
use crate::nn::{evaluate, train_one_epoch, Sequential, TrainConfig, SGD};

/// 合成的线性可分三分类问题：类别 k 的样本在第 k 维上取大值
fn synthetic_loader(n: usize, seed: u64) -> DataLoader {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((n, 6));
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 3;
        for j in 0..6 {
            features[[i, j]] = rng.gen_range(-0.2..0.2f32);
        }
        features[[i, class]] += 2.0;
        labels.push(class);
    }
    DataLoader::new(TensorDataset::new(features, labels), 16)
}

fn small_model(seed: u64) -> Sequential {
    let mut rng = StdRng::seed_from_u64(seed);
    Sequential::new(vec![
        Stage::Linear(Linear::new(6, 16, "fc1", &mut rng)),
        Stage::Relu(Relu::new()),
        Stage::Linear(Linear::new(16, 3, "fc2", &mut rng)),
    ])
}

#[test]
fn test_train_config_defaults() {
    let config = TrainConfig::default();
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.epochs, 5);
    assert_eq!(config.log_every, 100);
    assert!((config.learning_rate - 1e-3).abs() < 1e-9);
}

#[test]
fn test_loss_trends_downward_over_epochs() {
    let loader = synthetic_loader(96, 0);
    let mut model = small_model(42);
    let mut sgd = SGD::new(0.1);

    let mut epoch_losses = Vec::new();
    for _ in 0..8 {
        epoch_losses.push(train_one_epoch(&mut model, &loader, &mut sgd, 0));
    }

    // 整体趋势下降（不要求逐批单调）
    assert!(
        epoch_losses.last().unwrap() < epoch_losses.first().unwrap(),
        "损失应呈下降趋势: {epoch_losses:?}"
    );
}

#[test]
fn test_evaluate_bounds_and_counts() {
    let loader = synthetic_loader(48, 1);
    let model = small_model(7);

    let report = evaluate(&model, &loader);
    assert_eq!(report.total, 48);
    assert!(report.correct <= report.total);
    assert!((0.0..=1.0).contains(&report.accuracy()));
    assert!(report.avg_loss >= 0.0);
}

#[test]
fn test_training_improves_accuracy() {
    let loader = synthetic_loader(96, 2);
    let mut model = small_model(3);
    let mut sgd = SGD::new(0.1);

    for _ in 0..15 {
        train_one_epoch(&mut model, &loader, &mut sgd, 0);
    }

    let report = evaluate(&model, &loader);
    assert!(
        report.accuracy() > 0.9,
        "线性可分问题训练后准确率应很高，实际 {:.2}",
        report.accuracy()
    );
}

#[test]
fn test_evaluate_does_not_mutate_model() {
    let loader = synthetic_loader(32, 3);
    let model = small_model(9);
    let before = model.state_dict();
    let _ = evaluate(&model, &loader);
    assert_eq!(before, model.state_dict());
}
