//! FashionMNIST 服饰图像数据集
//!
//! 支持：
//! - IDX 二进制格式解析（支持 .gz 压缩）
//! - 像素归一化 (0-255 → 0-1)
//! - 可选自动下载（带 MD5 校验）

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use ndarray::{Array1, Array2};

use crate::data::dataloader::TensorDataset;
use crate::data::download::download_file;
use crate::data::error::DataError;
use crate::data::transforms::normalize_pixels;

/// FashionMNIST 下载地址（官方 S3 镜像）
const FASHION_MNIST_BASE_URL: &str =
    "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/";

/// FashionMNIST 文件清单: (文件名, MD5)
const FASHION_MNIST_FILES: [(&str, &str); 4] = [
    (
        "train-images-idx3-ubyte.gz",
        "8d4fb7e6c68d591d4c3dfef9ec88bf0d",
    ),
    (
        "train-labels-idx1-ubyte.gz",
        "25c81989df183df01b3e8a0aad5dffbe",
    ),
    (
        "t10k-images-idx3-ubyte.gz",
        "bef4ecab320f06d8554ea6380940ec79",
    ),
    (
        "t10k-labels-idx1-ubyte.gz",
        "bb300cfdad3c16e7a12a480ee83cd310",
    ),
];

/// FashionMNIST 的 10 个固定类别名
pub const CLASS_NAMES: [&str; 10] = [
    "T-shirt/top",
    "Trouser",
    "Pullover",
    "Dress",
    "Coat",
    "Sandal",
    "Shirt",
    "Sneaker",
    "Bag",
    "Ankle boot",
];

/// FashionMNIST 服饰图像数据集
///
/// 包含 60,000 个训练样本和 10,000 个测试样本。
/// 每个样本是 28x28 的灰度图像（加载后展平为 784 维并归一化到 [0,1]），
/// 标签为 0-9 的类别索引（见 [`CLASS_NAMES`]）。
#[derive(Debug, Clone)]
pub struct FashionMnistDataset {
    /// 图像数据 [N, 784]，像素值已归一化到 [0, 1]
    images: Array2<f32>,
    /// 标签数据 [N]，类别索引 0-9
    labels: Vec<usize>,
}

impl FashionMnistDataset {
    /// 完整加载 API
    ///
    /// # 参数
    /// - `root`: 数据目录，None 则使用默认 (~/.cache/fashion_mlp/datasets/fashion_mnist)
    /// - `train`: true=训练集(60000), false=测试集(10000)
    /// - `download`: true=自动下载缺失文件
    pub fn load(root: Option<&Path>, train: bool, download: bool) -> Result<Self, DataError> {
        let data_dir = root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_data_dir().join("fashion_mnist"));

        // 确定文件名
        let (images_file, labels_file) = if train {
            ("train-images-idx3-ubyte", "train-labels-idx1-ubyte")
        } else {
            ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte")
        };

        // 检查文件是否存在，必要时下载
        let images_path = ensure_file(&data_dir, images_file, download)?;
        let labels_path = ensure_file(&data_dir, labels_file, download)?;

        // 解析 IDX 文件
        let images_raw = parse_idx_images(&images_path)?;
        let labels = parse_idx_labels(&labels_path)?;

        if images_raw.nrows() != labels.len() {
            return Err(DataError::SampleCountMismatch {
                images: images_raw.nrows(),
                labels: labels.len(),
            });
        }

        // 归一化像素值 [0, 255] -> [0, 1]
        let images = normalize_pixels(images_raw);

        Ok(Self { images, labels })
    }

    /// 便捷 API：加载训练集（默认路径，自动下载）
    pub fn train() -> Result<Self, DataError> {
        Self::load(None, true, true)
    }

    /// 便捷 API：加载测试集（默认路径，自动下载）
    pub fn test() -> Result<Self, DataError> {
        Self::load(None, false, true)
    }

    /// 返回数据集中的样本数量
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// 数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 获取第 index 个样本
    ///
    /// # 返回
    /// (image, label) 元组
    /// - image: [784]，已归一化
    /// - label: 类别索引 0-9
    pub fn get(&self, index: usize) -> Result<(Array1<f32>, usize), DataError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        let image = self.images.row(index).to_owned();
        Ok((image, self.labels[index]))
    }

    /// 单个样本展平后的输入维度
    pub fn input_width(&self) -> usize {
        self.images.ncols()
    }

    /// 类别总数
    pub fn num_classes(&self) -> usize {
        CLASS_NAMES.len()
    }

    /// 类别索引对应的名称
    ///
    /// # Panics
    /// 如果 index >= 10
    pub fn class_name(index: usize) -> &'static str {
        CLASS_NAMES[index]
    }

    /// 获取所有图像（用于批量处理）
    pub fn images(&self) -> &Array2<f32> {
        &self.images
    }

    /// 获取所有标签（用于批量处理）
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// 转换为 [`TensorDataset`]，供 `DataLoader` 批量迭代
    pub fn into_tensor_dataset(self) -> TensorDataset {
        TensorDataset::new(self.images, self.labels)
    }
}

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fashion_mlp")
        .join("datasets")
}

/// 确保文件存在，必要时下载
fn ensure_file(data_dir: &Path, base_name: &str, download: bool) -> Result<PathBuf, DataError> {
    // 优先检查解压后的文件
    let uncompressed_path = data_dir.join(base_name);
    if uncompressed_path.exists() {
        return Ok(uncompressed_path);
    }

    // 检查 .gz 文件
    let gz_name = format!("{base_name}.gz");
    let gz_path = data_dir.join(&gz_name);
    if gz_path.exists() {
        return Ok(gz_path);
    }

    // 文件不存在，尝试下载
    if download {
        std::fs::create_dir_all(data_dir).map_err(DataError::IoError)?;
        let url = format!("{FASHION_MNIST_BASE_URL}{gz_name}");
        let expected_md5 = FASHION_MNIST_FILES
            .iter()
            .find(|(name, _)| *name == gz_name)
            .map(|(_, md5)| *md5);
        download_file(&url, &gz_path, expected_md5)?;
        Ok(gz_path)
    } else {
        Err(DataError::FileNotFound(uncompressed_path))
    }
}

/// 打开 IDX 文件，透明处理 .gz 压缩
fn open_idx(path: &Path) -> Result<Box<dyn Read>, DataError> {
    let file = File::open(path).map_err(|_| DataError::FileNotFound(path.to_path_buf()))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// 解析 IDX 图像文件
///
/// IDX 格式：
/// - [0-3] magic number (0x00000803 = 2051)
/// - [4-7] number of images
/// - [8-11] number of rows
/// - [12-15] number of columns
/// - [16+] pixel data (unsigned byte)
fn parse_idx_images(path: &Path) -> Result<Array2<f32>, DataError> {
    let mut reader = open_idx(path)?;
    let mut header = [0u8; 16];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    // 解析头部（大端序）
    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != 2051 {
        return Err(DataError::FormatError(format!(
            "无效的 magic number: {magic} (期望 2051)"
        )));
    }

    let num_images = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
    let num_rows = u32::from_be_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let num_cols = u32::from_be_bytes([header[12], header[13], header[14], header[15]]) as usize;

    if num_rows != 28 || num_cols != 28 {
        return Err(DataError::FormatError(format!(
            "无效的图像尺寸: {num_rows}x{num_cols} (期望 28x28)"
        )));
    }

    // 读取像素数据
    let pixel_count = num_images * 28 * 28;
    let mut pixels = vec![0u8; pixel_count];
    reader
        .read_exact(&mut pixels)
        .map_err(|e| DataError::FormatError(format!("读取像素数据失败: {e}")))?;

    // 转换为 f32 数组 [N, 784]
    let data: Vec<f32> = pixels.into_iter().map(f32::from).collect();
    Array2::from_shape_vec((num_images, 784), data)
        .map_err(|e| DataError::FormatError(format!("构建图像数组失败: {e}")))
}

/// 解析 IDX 标签文件
///
/// IDX 格式：
/// - [0-3] magic number (0x00000801 = 2049)
/// - [4-7] number of labels
/// - [8+] label data (unsigned byte, 0-9)
fn parse_idx_labels(path: &Path) -> Result<Vec<usize>, DataError> {
    let mut reader = open_idx(path)?;
    let mut header = [0u8; 8];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    // 解析头部（大端序）
    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != 2049 {
        return Err(DataError::FormatError(format!(
            "无效的 magic number: {magic} (期望 2049)"
        )));
    }

    let num_labels = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;

    // 读取标签数据
    let mut labels = vec![0u8; num_labels];
    reader
        .read_exact(&mut labels)
        .map_err(|e| DataError::FormatError(format!("读取标签数据失败: {e}")))?;

    for (i, &label) in labels.iter().enumerate() {
        if label > 9 {
            return Err(DataError::FormatError(format!(
                "标签越界: 第 {i} 个标签为 {label} (期望 0-9)"
            )));
        }
    }

    Ok(labels.into_iter().map(usize::from).collect())
}
