//! nn 模块单元测试

mod loss;
mod train;
