//! 数据变换函数
//!
//! 提供常用的数据预处理操作。

use ndarray::Array2;

/// 将 0-255 像素值归一化到 0-1
///
/// # 参数
/// - `pixels`: 输入数组，值范围 [0, 255]
///
/// # 返回
/// 归一化后的数组，值范围 [0, 1]
pub fn normalize_pixels(pixels: Array2<f32>) -> Array2<f32> {
    pixels / 255.0
}
