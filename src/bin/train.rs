//! # FashionMNIST 训练流水线
//!
//! 对应教程的第一个笔记本：
//! - 加载 FashionMNIST（首次运行自动下载到 `~/.cache/fashion_mlp/`）
//! - 训练 784 → 512 → 512 → 10 的 MLP（交叉熵 + SGD）
//! - 每轮在测试集上评估，最后把参数快照写入 `fashion_mlp.npz`
//!
//! ## 运行
//! ```bash
//! cargo run --release --bin train
//! ```

use std::error::Error;
use std::path::Path;
use std::time::Instant;

use fashion_mlp::data::{DataLoader, FashionMnistDataset};
use fashion_mlp::nn::{
    checkpoint, evaluate, fashion_mlp, train_one_epoch, TrainConfig, SGD,
};

/// 参数快照输出路径（推理流水线从同一路径读取）
const CHECKPOINT_PATH: &str = "fashion_mlp.npz";

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== FashionMNIST 训练流水线 ===\n");

    // 1. 加载数据
    println!("[1/4] 加载 FashionMNIST 数据集...");
    let load_start = Instant::now();
    let train_data = FashionMnistDataset::train()?;
    let test_data = FashionMnistDataset::test()?;
    println!(
        "  ✓ 训练集: {} 样本，测试集: {} 样本 ({:.1}s)",
        train_data.len(),
        test_data.len(),
        load_start.elapsed().as_secs_f32()
    );

    // 2. 配置
    let config = TrainConfig::default();
    println!("\n[2/4] 配置：");
    println!("  - Batch: {}", config.batch_size);
    println!("  - Epochs: {}", config.epochs);
    println!("  - 学习率: {}", config.learning_rate);

    let train_loader =
        DataLoader::new(train_data.into_tensor_dataset(), config.batch_size);
    let test_loader = DataLoader::new(test_data.into_tensor_dataset(), config.batch_size);

    // 3. 构建网络并训练
    let mut model = fashion_mlp(42);
    let mut optimizer = SGD::new(config.learning_rate);
    println!("\n  网络: 784 -> 512 (ReLU) -> 512 (ReLU) -> 10 (ReLU)");
    println!("  参数: {} 个", model.num_parameters());

    println!("\n[3/4] 开始训练...\n");
    for epoch in 0..config.epochs {
        println!("Epoch {}\n-------------------------------", epoch + 1);
        let epoch_start = Instant::now();

        let avg_batch_loss =
            train_one_epoch(&mut model, &train_loader, &mut optimizer, config.log_every);

        let report = evaluate(&model, &test_loader);
        println!(
            "测试集: 准确率 = {:.1}% ({}/{}), 平均损失 = {:.6}, 批均损失 = {:.6}, {:.1}s\n",
            report.accuracy() * 100.0,
            report.correct,
            report.total,
            report.avg_loss,
            avg_batch_loss,
            epoch_start.elapsed().as_secs_f32()
        );
    }

    // 4. 保存参数快照
    println!("[4/4] 保存参数快照...");
    checkpoint::save(&model, Path::new(CHECKPOINT_PATH))?;
    println!("  ✓ 已保存到 {CHECKPOINT_PATH}");
    println!("\n完成！");
    Ok(())
}
