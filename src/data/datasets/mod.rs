//! 内置数据集

mod fashion_mnist;

pub use fashion_mnist::{default_data_dir, FashionMnistDataset, CLASS_NAMES};
