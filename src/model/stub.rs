// 该文件是 Renhai （人海） 项目的一部分。
// src/model/stub.rs - 桩检测器
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

use anyhow::Result;
use tracing::debug;

use crate::frame::LetterboxFrame;
use crate::model::{Detection, Detector};

const STUB_DEFAULT_SCORE: f32 = 0.9;
const STUB_CELL_INSET: f32 = 0.2;

/// 脚本化检测器：按网格在原图内确定性地放置 N 个行人框。
/// 用于测试与无模型环境下的演示。
#[derive(Debug, Clone)]
pub struct StubDetector {
  count: usize,
  score: f32,
}

impl StubDetector {
  pub fn empty() -> Self {
    Self::with_count(0)
  }

  pub fn with_count(count: usize) -> Self {
    Self {
      count,
      score: STUB_DEFAULT_SCORE,
    }
  }

  pub fn with_score(mut self, score: f32) -> Self {
    self.score = score;
    self
  }
}

impl Detector for StubDetector {
  fn detect(&self, frame: &LetterboxFrame, confidence_threshold: f32) -> Result<Vec<Detection>> {
    if self.count == 0 || self.score < confidence_threshold {
      debug!("桩检测器返回空结果");
      return Ok(Vec::new());
    }

    let width = frame.orig_width() as f32;
    let height = frame.orig_height() as f32;

    let cols = (self.count as f32).sqrt().ceil() as usize;
    let rows = self.count.div_ceil(cols);
    let cell_w = width / cols as f32;
    let cell_h = height / rows as f32;

    let mut detections = Vec::with_capacity(self.count);
    for i in 0..self.count {
      let col = (i % cols) as f32;
      let row = (i / cols) as f32;
      let inset_x = cell_w * STUB_CELL_INSET;
      let inset_y = cell_h * STUB_CELL_INSET;
      detections.push(Detection {
        bbox: [
          col * cell_w + inset_x,
          row * cell_h + inset_y,
          (col + 1.0) * cell_w - inset_x,
          (row + 1.0) * cell_h - inset_y,
        ],
        score: self.score,
      });
    }

    debug!("桩检测器返回 {} 个检测", detections.len());
    Ok(detections)
  }
}
