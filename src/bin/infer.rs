//! # FashionMNIST 推理/导出流水线
//!
//! 对应教程的第二个笔记本：
//! - 重建与训练时结构相同的模型，从 `fashion_mlp.npz` 整体装载参数
//! - 用测试集第 0 个样本追踪一次前向传播，导出可移植计算图
//!   `fashion_mlp.graph`
//! - 用独立的图执行器（不经过 nn 模块）对同一样本推理，
//!   对比预测类别与真实标签
//!
//! ## 运行
//! ```bash
//! cargo run --release --bin infer   # 需要先运行 train
//! ```

use std::error::Error;
use std::path::Path;

use ndarray::Axis;

use fashion_mlp::data::FashionMnistDataset;
use fashion_mlp::graph;
use fashion_mlp::nn::{checkpoint, fashion_mlp, predicted_classes};
use fashion_mlp::runtime::GraphRuntime;

/// 训练流水线写出的参数快照
const CHECKPOINT_PATH: &str = "fashion_mlp.npz";
/// 导出的可移植计算图文件
const GRAPH_PATH: &str = "fashion_mlp.graph";

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== FashionMNIST 推理/导出流水线 ===\n");

    // 1. 重建模型并装载训练好的参数
    println!("[1/4] 装载参数快照 {CHECKPOINT_PATH} ...");
    let mut model = fashion_mlp(42);
    checkpoint::load(&mut model, Path::new(CHECKPOINT_PATH))?;
    println!("  ✓ {} 个参数已装载", model.num_parameters());

    // 2. 取测试集第 0 个样本作为代表性输入
    println!("\n[2/4] 加载测试样本...");
    let test_data = FashionMnistDataset::test()?;
    let (image, label) = test_data.get(0)?;
    let sample = image.view().insert_axis(Axis(0)).to_owned(); // [1, 784]

    // 3. 追踪一次前向传播并导出计算图
    println!("\n[3/4] 追踪前向传播并导出计算图...");
    let traced = graph::trace(&model, &sample)?;
    traced.save(Path::new(GRAPH_PATH))?;
    println!(
        "  ✓ 已导出 {GRAPH_PATH}（{} 个算子，输入宽度 {}，输出宽度 {}）",
        traced.ops.len(),
        traced.input_width,
        traced.output_width
    );

    // 4. 用独立运行时执行导出的图
    println!("\n[4/4] 独立运行时推理...");
    let runtime = GraphRuntime::load(Path::new(GRAPH_PATH))?;
    let scores = runtime.run(&sample)?;
    let predicted = predicted_classes(&scores)[0];

    println!(
        "\n预测: \"{}\", 实际: \"{}\"",
        FashionMnistDataset::class_name(predicted),
        FashionMnistDataset::class_name(label)
    );
    Ok(())
}
