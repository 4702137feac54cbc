/*
 * @Description  : 端到端集成测试
 *
 * 快速用例在合成数据上走完整条链路：
 * 训练 → 快照 → 重建装载 → 追踪导出 → 独立运行时推理，
 * 两条路径必须给出相同的 top-1 预测。
 *
 * 标注 `#[ignore]` 的用例使用真实 FashionMNIST（需要网络/缓存），
 * 复现教程的经典结论：测试集第 0 个样本被预测为 "Ankle boot"。
 */

use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fashion_mlp::data::{DataLoader, FashionMnistDataset, TensorDataset, CLASS_NAMES};
use fashion_mlp::graph::trace;
use fashion_mlp::nn::layer::{Linear, Relu, Stage};
use fashion_mlp::nn::{
    checkpoint, evaluate, predicted_classes, train_one_epoch, Sequential, SGD,
};
use fashion_mlp::runtime::GraphRuntime;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir()
        .join("fashion_mlp_tests")
        .join(format!("e2e_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("创建临时目录失败");
    dir
}

/// 合成的 10 类可分问题，输入宽度与 FashionMNIST 无关，
/// 只为快速验证整条链路
fn synthetic_loader(n: usize, width: usize, seed: u64) -> DataLoader {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((n, width));
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 10;
        for j in 0..width {
            features[[i, j]] = rng.gen_range(-0.1..0.1f32);
        }
        features[[i, class]] += 1.5;
        labels.push(class);
    }
    DataLoader::new(TensorDataset::new(features, labels), 20)
}

fn small_model(seed: u64) -> Sequential {
    let mut rng = StdRng::seed_from_u64(seed);
    Sequential::new(vec![
        Stage::Linear(Linear::new(12, 32, "fc1", &mut rng)),
        Stage::Relu(Relu::new()),
        Stage::Linear(Linear::new(32, 10, "fc2", &mut rng)),
    ])
}

#[test]
fn test_full_pipeline_on_synthetic_data() {
    let dir = temp_dir();
    let ckpt_path = dir.join("synthetic.npz");
    let graph_path = dir.join("synthetic.graph");

    // 1. 训练
    let loader = synthetic_loader(200, 12, 0);
    let mut model = small_model(42);
    let mut sgd = SGD::new(0.1);
    let first_epoch_loss = train_one_epoch(&mut model, &loader, &mut sgd, 0);
    let mut last_epoch_loss = first_epoch_loss;
    for _ in 0..12 {
        last_epoch_loss = train_one_epoch(&mut model, &loader, &mut sgd, 0);
    }
    assert!(last_epoch_loss < first_epoch_loss, "训练损失应下降");

    let report = evaluate(&model, &loader);
    assert!(report.accuracy() > 0.9, "实际 {:.2}", report.accuracy());

    // 2. 快照 → 重建装载
    checkpoint::save(&model, &ckpt_path).expect("保存快照失败");
    let mut restored = small_model(7);
    checkpoint::load(&mut restored, &ckpt_path).expect("装载快照失败");

    // 3. 追踪导出 → 独立运行时
    let (sample, label) = loader.iter().next().map(|(x, y)| {
        (x.index_axis(Axis(0), 0).insert_axis(Axis(0)).to_owned(), y[0])
    }).expect("取样本失败");

    let traced = trace(&restored, &sample).expect("追踪失败");
    traced.save(&graph_path).expect("保存图文件失败");
    let runtime = GraphRuntime::load(&graph_path).expect("加载图文件失败");

    // 4. 两条路径分数一致、top-1 一致，且等于真实标签
    let model_scores = restored.infer(&sample);
    let runtime_scores = runtime.run(&sample).expect("运行时推理失败");
    for j in 0..10 {
        assert_abs_diff_eq!(
            runtime_scores[[0, j]],
            model_scores[[0, j]],
            epsilon = 1e-5
        );
    }
    let predicted = predicted_classes(&runtime_scores)[0];
    assert_eq!(predicted, predicted_classes(&model_scores)[0]);
    assert_eq!(predicted, label);

    let _ = fs::remove_dir_all(&dir);
}

/// 经典端到端结论：训练收敛后，测试集第 0 个样本（Ankle boot）
/// 在原模型与导出图两条路径上都被预测为 "Ankle boot"。
///
/// 首次运行需要网络下载数据集，训练全量数据耗时数分钟。
#[test]
#[ignore = "需要网络下载 FashionMNIST 并完整训练"]
fn test_ankle_boot_end_to_end() {
    use fashion_mlp::nn::{fashion_mlp, TrainConfig};

    let dir = temp_dir();
    let ckpt_path = dir.join("fashion.npz");
    let graph_path = dir.join("fashion.graph");

    let config = TrainConfig::default();
    let train_data = FashionMnistDataset::train().expect("加载训练集失败");
    let test_data = FashionMnistDataset::test().expect("加载测试集失败");

    let train_loader = DataLoader::new(train_data.into_tensor_dataset(), config.batch_size);

    let mut model = fashion_mlp(42);
    let mut sgd = SGD::new(config.learning_rate);
    for epoch in 0..config.epochs {
        let avg = train_one_epoch(&mut model, &train_loader, &mut sgd, config.log_every);
        println!("Epoch {}: 批均损失 = {avg:.6}", epoch + 1);
    }

    checkpoint::save(&model, &ckpt_path).expect("保存快照失败");
    let mut restored = fashion_mlp(0);
    checkpoint::load(&mut restored, &ckpt_path).expect("装载快照失败");

    // 经典样本：测试集第 0 个是 Ankle boot（类别 9）
    let (image, label) = test_data.get(0).expect("获取样本失败");
    assert_eq!(CLASS_NAMES[label], "Ankle boot");
    let sample = image.insert_axis(Axis(0));

    let model_pred = predicted_classes(&restored.infer(&sample))[0];

    let traced = trace(&restored, &sample).expect("追踪失败");
    traced.save(&graph_path).expect("保存图文件失败");
    let runtime = GraphRuntime::load(&graph_path).expect("加载图文件失败");
    let runtime_pred = predicted_classes(&runtime.run(&sample).expect("运行时推理失败"))[0];

    assert_eq!(model_pred, runtime_pred);
    assert_eq!(CLASS_NAMES[model_pred], "Ankle boot");

    let _ = fs::remove_dir_all(&dir);
}
