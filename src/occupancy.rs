// 该文件是 Renhai （人海） 项目的一部分。
// src/occupancy.rs - 拥挤度分级
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

use tracing::debug;

/// 拥挤度计算的默认参考图像面积（像素平方）
pub const DEFAULT_IMAGE_AREA: f32 = 640.0 * 640.0;
/// 单人平均占用面积的默认值（像素平方）
pub const DEFAULT_AVG_AREA_PER_PERSON: f32 = 15000.0;

const MEDIUM_PERCENT: f32 = 25.0;
const HIGH_PERCENT: f32 = 60.0;

/// 场景拥挤程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyLevel {
  Low,
  Medium,
  High,
}

impl std::fmt::Display for OccupancyLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      OccupancyLevel::Low => write!(f, "Low"),
      OccupancyLevel::Medium => write!(f, "Medium"),
      OccupancyLevel::High => write!(f, "High"),
    }
  }
}

/// 按检测人数估计场景拥挤程度。
///
/// 占用百分比 = 人数 × 单人平均面积 ÷ 参考面积 × 100，
/// 低于 25% 为 Low，[25%, 60%) 为 Medium，60% 及以上为 High。
#[derive(Debug, Clone)]
pub struct OccupancyEstimator {
  image_area: f32,
  avg_area_per_person: f32,
}

impl Default for OccupancyEstimator {
  fn default() -> Self {
    Self::new(DEFAULT_IMAGE_AREA, DEFAULT_AVG_AREA_PER_PERSON)
  }
}

impl OccupancyEstimator {
  pub fn new(image_area: f32, avg_area_per_person: f32) -> Self {
    Self {
      image_area,
      avg_area_per_person,
    }
  }

  pub fn occupancy_percent(&self, count: usize) -> f32 {
    (count as f32 * self.avg_area_per_person / self.image_area) * 100.0
  }

  pub fn classify(&self, count: usize) -> OccupancyLevel {
    // 空场景不参与百分比计算
    if count == 0 {
      return OccupancyLevel::Low;
    }

    let percent = self.occupancy_percent(count);
    debug!("检测人数: {}, 占用百分比: {:.1}%", count, percent);

    if percent < MEDIUM_PERCENT {
      OccupancyLevel::Low
    } else if percent < HIGH_PERCENT {
      OccupancyLevel::Medium
    } else {
      OccupancyLevel::High
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_count_is_low_for_any_parameters() {
    for estimator in [
      OccupancyEstimator::default(),
      OccupancyEstimator::new(1.0, 1.0),
      OccupancyEstimator::new(100.0, 1_000_000.0),
    ] {
      assert_eq!(estimator.classify(0), OccupancyLevel::Low);
    }
  }

  #[test]
  fn default_parameters_band_counts() {
    let estimator = OccupancyEstimator::default();
    // 4 人 -> 约 14.6%
    assert_eq!(estimator.classify(4), OccupancyLevel::Low);
    // 10 人 -> 约 36.6%
    assert_eq!(estimator.classify(10), OccupancyLevel::Medium);
    // 17 人 -> 约 62.3%
    assert_eq!(estimator.classify(17), OccupancyLevel::High);
  }

  #[test]
  fn percent_formula_matches_definition() {
    let estimator = OccupancyEstimator::default();
    let percent = estimator.occupancy_percent(10);
    assert!((percent - 36.621).abs() < 0.01);
  }

  #[test]
  fn exact_lower_boundaries_belong_to_upper_band() {
    // 1 × 15000 / 60000 = 25.0% 整
    let estimator = OccupancyEstimator::new(60_000.0, 15_000.0);
    assert_eq!(estimator.classify(1), OccupancyLevel::Medium);

    // 3 × 15000 / 75000 = 60.0% 整
    let estimator = OccupancyEstimator::new(75_000.0, 15_000.0);
    assert_eq!(estimator.classify(3), OccupancyLevel::High);
  }

  #[test]
  fn display_matches_reported_labels() {
    assert_eq!(OccupancyLevel::Low.to_string(), "Low");
    assert_eq!(OccupancyLevel::Medium.to_string(), "Medium");
    assert_eq!(OccupancyLevel::High.to_string(), "High");
  }
}
