//! 2D 池化參數簽名

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::signature::push_ints;
use crate::{OpKind, Signature};

/// 維度列表
pub type Dims = Vec<i32>;

/// 池化演算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolingAlgorithm {
    /// 最大值池化
    Max,
    /// 平均池化（填充位置計入分母）
    AvgIncludePadding,
    /// 平均池化（填充位置不計入分母）
    AvgExcludePadding,
}

impl PoolingAlgorithm {
    /// 穩定的整數代碼（文字鍵使用）
    pub fn code(&self) -> i32 {
        match self {
            PoolingAlgorithm::Max => 0,
            PoolingAlgorithm::AvgIncludePadding => 1,
            PoolingAlgorithm::AvgExcludePadding => 2,
        }
    }
}

impl fmt::Display for PoolingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolingAlgorithm::Max => "max",
            PoolingAlgorithm::AvgIncludePadding => "avg_include_padding",
            PoolingAlgorithm::AvgExcludePadding => "avg_exclude_padding",
        };
        f.write_str(name)
    }
}

/// 2D 池化前向運算的參數簽名
///
/// 不做任何數值檢查：零或負數的維度照樣可作為鍵，
/// 形狀合法性由運算建構端負責。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pooling2DParams {
    /// 輸入維度
    pub src_dims: Dims,

    /// 輸出維度
    pub dst_dims: Dims,

    /// 核心高度
    pub kernel_h: i32,

    /// 核心寬度
    pub kernel_w: i32,

    /// 垂直步幅
    pub stride_y: i32,

    /// 水平步幅
    pub stride_x: i32,

    /// 上方填充
    pub pad_lh: i32,

    /// 左方填充
    pub pad_lw: i32,

    /// 下方填充
    pub pad_rh: i32,

    /// 右方填充
    pub pad_rw: i32,

    /// 池化演算法
    pub algorithm: PoolingAlgorithm,
}

impl Pooling2DParams {
    /// 創建新的簽名（1x1 核心、步幅 1、無填充、最大值池化）
    pub fn new(src_dims: Dims, dst_dims: Dims) -> Self {
        Self {
            src_dims,
            dst_dims,
            kernel_h: 1,
            kernel_w: 1,
            stride_y: 1,
            stride_x: 1,
            pad_lh: 0,
            pad_lw: 0,
            pad_rh: 0,
            pad_rw: 0,
            algorithm: PoolingAlgorithm::Max,
        }
    }

    /// 建構器模式：設置核心尺寸
    pub fn with_kernel(mut self, kernel_h: i32, kernel_w: i32) -> Self {
        self.kernel_h = kernel_h;
        self.kernel_w = kernel_w;
        self
    }

    /// 建構器模式：設置步幅
    pub fn with_stride(mut self, stride_y: i32, stride_x: i32) -> Self {
        self.stride_y = stride_y;
        self.stride_x = stride_x;
        self
    }

    /// 建構器模式：設置填充（上、左、下、右）
    pub fn with_padding(mut self, pad_lh: i32, pad_lw: i32, pad_rh: i32, pad_rw: i32) -> Self {
        self.pad_lh = pad_lh;
        self.pad_lw = pad_lw;
        self.pad_rh = pad_rh;
        self.pad_rw = pad_rw;
        self
    }

    /// 建構器模式：設置演算法
    pub fn with_algorithm(mut self, algorithm: PoolingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl Signature for Pooling2DParams {
    const KIND: OpKind = OpKind::Pooling2DFwd;

    fn write_fields(&self, out: &mut String) {
        push_ints(out, &self.src_dims);
        push_ints(out, &self.dst_dims);
        push_ints(
            out,
            &[
                self.kernel_h,
                self.kernel_w,
                self.stride_y,
                self.stride_x,
                self.pad_lh,
                self.pad_lw,
                self.pad_rh,
                self.pad_rw,
                self.algorithm.code(),
            ],
        );
    }
}
