// 该文件是 Renhai （人海） 项目的一部分。
// src/model.rs - 检测模型
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use anyhow::{Context, Result};

use crate::frame::LetterboxFrame;

/// COCO 数据集中 "person" 类别的索引
pub const PERSON_CLASS_ID: usize = 0;
/// 默认置信度阈值
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// 单个行人检测结果
#[derive(Debug, Clone)]
pub struct Detection {
  /// 边界框 [x_min, y_min, x_max, y_max]，原图像素坐标
  pub bbox: [f32; 4],
  /// 置信度
  pub score: f32,
}

/// 行人检测器。输入为归一化帧，返回的边界框已映射回原图像素坐标，
/// 信箱填充与缩放不会泄漏给调用方。
pub trait Detector {
  fn detect(&self, frame: &LetterboxFrame, confidence_threshold: f32) -> Result<Vec<Detection>>;
}

mod stub;
pub use self::stub::StubDetector;

#[cfg(feature = "model_yolov8")]
mod yolov8;
#[cfg(feature = "model_yolov8")]
pub use self::yolov8::{Yolov8, Yolov8Builder, Yolov8Error};

/// 根据描述创建检测器：
/// - "stub" 或 "stub:N" 为脚本化的测试检测器
/// - *.onnx 为 YOLOv8 ONNX 模型文件
pub fn create_detector(source: &str) -> Result<Box<dyn Detector>> {
  if source == "stub" {
    return Ok(Box::new(StubDetector::empty()));
  }

  if let Some(rest) = source.strip_prefix("stub:") {
    let count: usize = rest
      .parse()
      .with_context(|| format!("无效的桩检测器人数: {}", rest))?;
    return Ok(Box::new(StubDetector::with_count(count)));
  }

  if source.to_lowercase().ends_with(".onnx") {
    #[cfg(feature = "model_yolov8")]
    {
      let model = Yolov8Builder::new(source).build()?;
      return Ok(Box::new(model));
    }
    #[cfg(not(feature = "model_yolov8"))]
    anyhow::bail!("未启用 model_yolov8 特性，无法加载模型: {}", source);
  }

  anyhow::bail!("无法识别的检测器: {}", source)
}
