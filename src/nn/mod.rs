/*
 * @Description  : 负责神经网络（neural network）的构建与训练
 *
 * 网络被表达为一个封闭阶段集合（Linear / ReLU）的有序堆叠，
 * 每个阶段实现显式的 forward / backward，不依赖通用自动微分。
 */

pub mod checkpoint;
mod error;
pub mod layer;
mod loss;
mod model;
pub mod optimizer;
mod train;

pub use error::NnError;
pub use layer::{Linear, Relu, Stage, StageOp};
pub use loss::{cross_entropy, cross_entropy_with_grad, predicted_classes};
pub use model::{fashion_mlp, Sequential};
pub use optimizer::{Optimizer, SGD};
pub use train::{evaluate, train_one_epoch, EvalReport, TrainConfig};

#[cfg(test)]
mod tests;
