/*
 * @Description  : DataLoader - PyTorch 风格的数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle，默认关闭，保持数据集顺序)
 * - 丢弃不完整批次 (drop_last)
 */

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// TensorDataset - 持有特征和标签的数据集
///
/// 构建后不可变；特征为 [N, D] 数组，标签为长度 N 的类别索引。
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(features, labels);
/// println!("样本数: {}", dataset.len());
/// ```
#[derive(Clone)]
pub struct TensorDataset {
    features: Array2<f32>,
    labels: Vec<usize>,
}

impl TensorDataset {
    /// 创建新的 TensorDataset
    ///
    /// # 参数
    /// - `features`: 特征数组，第一维为样本数
    /// - `labels`: 类别索引，长度必须与 features 的样本数一致
    ///
    /// # Panics
    /// 如果 features 和 labels 的样本数不一致
    pub fn new(features: Array2<f32>, labels: Vec<usize>) -> Self {
        assert_eq!(
            features.nrows(),
            labels.len(),
            "TensorDataset: features 和 labels 的样本数必须一致，得到 {} vs {}",
            features.nrows(),
            labels.len()
        );
        Self { features, labels }
    }

    /// 获取样本数量
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// 检查数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 获取特征数组引用
    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    /// 获取标签引用
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
}

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// 每次 `iter()` 都会从头开始产生一轮（epoch）的批次序列，
/// 默认按数据集顺序迭代。
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 64);
///
/// for (x_batch, y_batch) in loader.iter() {
///     let logits = model.forward(&x_batch);
///     // ...
/// }
/// ```
pub struct DataLoader {
    dataset: TensorDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl DataLoader {
    /// 创建新的 DataLoader
    ///
    /// # 参数
    /// - `dataset`: 数据集
    /// - `batch_size`: 批大小
    ///
    /// # Panics
    /// 如果 `batch_size` 为 0
    pub fn new(dataset: TensorDataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取批大小
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 创建迭代器（一轮 = 对数据集的一次完整遍历）
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        // 生成索引
        let n = self.dataset.len();
        let mut indices: Vec<usize> = (0..n).collect();

        // 如果需要打乱
        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = (Array2<f32>, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.loader.dataset.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);

        // 如果 drop_last 且批次不完整，则跳过
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }

        self.current_batch += 1;

        // 提取批次数据
        let batch_indices = &self.indices[start..end];
        let features_batch = self
            .loader
            .dataset
            .features
            .select(Axis(0), batch_indices);
        let labels_batch: Vec<usize> = batch_indices
            .iter()
            .map(|&idx| self.loader.dataset.labels[idx])
            .collect();

        Some((features_batch, labels_batch))
    }
}
