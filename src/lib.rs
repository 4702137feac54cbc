//! # Fashion MLP
//!
//! `fashion_mlp` 是一个教学用的 FashionMNIST 前馈分类器项目：
//! 用一个由 Linear / ReLU 阶段顺序堆叠而成的小网络完成图像分类，
//! 并演示完整的「训练 → 评估 → 参数快照 → 计算图导出 → 独立运行时推理」流程。
//!
//! 模块划分：
//! - [`data`]: FashionMNIST 数据集加载（IDX 格式、自动下载）与批量迭代
//! - [`nn`]: 网络阶段、交叉熵损失、SGD 优化器、训练/评估循环、参数检查点
//! - [`graph`]: 可移植计算图格式与前向追踪导出
//! - [`runtime`]: 不依赖 [`nn`] 的计算图执行器

pub mod data;
pub mod graph;
pub mod nn;
pub mod runtime;
