//! 数据加载模块
//!
//! 提供 FashionMNIST 数据集加载、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`FashionMnistDataset`]: FashionMNIST 服饰图像数据集（10 类）
//! - [`TensorDataset`]: 持有特征和标签的不可变数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`transforms`]: 数据变换函数（像素归一化等）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use fashion_mlp::data::{DataLoader, FashionMnistDataset};
//!
//! let train = FashionMnistDataset::train()?.into_tensor_dataset();
//! let loader = DataLoader::new(train, 64);
//!
//! for (x_batch, y_batch) in loader.iter() {
//!     // x_batch: [batch, 784]，y_batch: 类别索引
//! }
//! ```

mod dataloader;
pub mod datasets;
pub mod download;
pub mod error;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{DataLoader, TensorDataset};
pub use datasets::{default_data_dir, FashionMnistDataset, CLASS_NAMES};
pub use error::DataError;
