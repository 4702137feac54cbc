/*
 * @Description  : 参数检查点 - NPZ 命名数组快照
 *
 * 训练结束后把整套命名参数写入一个 NPZ 文件；
 * 推理前构建结构相同的模型，再从该文件整体覆盖参数。
 * 快照中不存版本号或形状标签，结构兼容性由调用方负责。
 */

use std::fs::File;
use std::path::Path;

use ndarray::Array2;
use ndarray_npy::{NpzReader, NpzWriter};

use super::{NnError, Sequential};

/// 把模型的全部命名参数保存为 NPZ 快照
pub fn save(model: &Sequential, path: &Path) -> Result<(), NnError> {
    let file = File::create(path)?;
    let mut npz = NpzWriter::new(file);
    for (name, value) in model.state_dict() {
        npz.add_array(name.as_str(), &value)?;
    }
    npz.finish()?;
    Ok(())
}

/// 从 NPZ 快照整体覆盖模型参数
///
/// 快照与模型结构不匹配（缺参数、多参数、形状不符）时返回错误。
pub fn load(model: &mut Sequential, path: &Path) -> Result<(), NnError> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file)?;

    let mut params = Vec::new();
    for entry_name in npz.names()? {
        let value: Array2<f32> = npz.by_name(&entry_name)?;
        // 某些版本的 NPZ 写入器会给条目追加 .npy 后缀
        let name = entry_name
            .strip_suffix(".npy")
            .unwrap_or(&entry_name)
            .to_string();
        params.push((name, value));
    }

    model.load_state_dict(params)
}
