// 该文件是 Renhai （人海） 项目的一部分。
// src/task.rs - 检测任务流水线
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

use image::RgbImage;
use tracing::info;

use crate::model::{DEFAULT_CONFIDENCE_THRESHOLD, Detection, Detector};
use crate::occupancy::{
  DEFAULT_AVG_AREA_PER_PERSON, DEFAULT_IMAGE_AREA, OccupancyEstimator, OccupancyLevel,
};
use crate::output::annotate;
use crate::preprocess::{DEFAULT_TARGET_SIZE, LETTERBOX_FILL, LetterboxConfig, letterbox};

/// 检测任务参数
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  /// letterbox 目标边长
  pub target_size: u32,
  /// 检测置信度阈值
  pub confidence_threshold: f32,
  /// 拥挤度估计的参考图像面积（像素）
  pub image_area: f32,
  /// 单人平均占用面积（像素）
  pub avg_area_per_person: f32,
  /// letterbox 填充颜色
  pub fill: [u8; 3],
}

impl Default for PipelineConfig {
  fn default() -> Self {
    PipelineConfig {
      target_size: DEFAULT_TARGET_SIZE,
      confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
      image_area: DEFAULT_IMAGE_AREA,
      avg_area_per_person: DEFAULT_AVG_AREA_PER_PERSON,
      fill: LETTERBOX_FILL,
    }
  }
}

/// 一次检测任务的完整结果
#[derive(Debug)]
pub struct DetectionReport {
  /// 原图坐标下的检测框
  pub detections: Vec<Detection>,
  /// 检测到的人数
  pub count: usize,
  /// 拥挤程度等级
  pub level: OccupancyLevel,
  /// 拥挤度百分比
  pub occupancy_percent: f32,
  /// 标注后的图像
  pub annotated: RgbImage,
}

/// 对单张图像执行完整的检测任务：预处理、推理、拥挤度估计与标注。
pub fn run_detection(
  image: &RgbImage,
  detector: &dyn Detector,
  config: &PipelineConfig,
) -> anyhow::Result<DetectionReport> {
  info!("开始检测任务...");
  let letterbox_config = LetterboxConfig {
    target_size: config.target_size,
    fill: config.fill,
  };
  let frame = letterbox(image, &letterbox_config);

  info!("输入帧预处理完成，开始推理...");
  let now = std::time::Instant::now();
  let detections = detector.detect(&frame, config.confidence_threshold)?;
  info!("推理完成，耗时: {:.2?}", now.elapsed());

  let estimator = OccupancyEstimator::new(config.image_area, config.avg_area_per_person);
  let count = detections.len();
  let level = estimator.classify(count);
  let occupancy_percent = estimator.occupancy_percent(count);
  info!("检测到 {} 人，拥挤程度: {}", count, level);

  let annotated = annotate(image, &detections);

  Ok(DetectionReport {
    detections,
    count,
    level,
    occupancy_percent,
    annotated,
  })
}
