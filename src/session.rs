// 该文件是 Renhai （人海） 项目的一部分。
// src/session.rs - 交互会话与显示状态
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

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, imageops::FilterType};
use thiserror::Error;
use tracing::{info, warn};

use crate::input::{ImageLoadError, load_image};
use crate::model::Detector;
use crate::task::{DetectionReport, PipelineConfig, run_detection};

/// 预览图边长
pub const PREVIEW_SIZE: u32 = 300;
/// 预览占位颜色（浅灰）
pub const PLACEHOLDER_COLOR: [u8; 3] = [209, 213, 219];

const INITIAL_COUNT_TEXT: &str = "0";
const INITIAL_OCCUPANCY_TEXT: &str = "N/A";

#[derive(Error, Debug)]
pub enum SessionError {
  #[error("未选择图像，无法执行检测")]
  NoImageSelected,
  #[error("图像加载错误: {0}")]
  ImageLoad(#[from] ImageLoadError),
  #[error("检测失败: {0}")]
  Detect(#[source] anyhow::Error),
}

/// 会话对外展示的状态。只有在操作完整成功后才会更新，
/// 失败的操作保留上一次的内容。
#[derive(Debug, Clone)]
pub struct DisplayState {
  /// 所选图像的预览
  pub input_preview: RgbImage,
  /// 标注结果的预览
  pub result_preview: RgbImage,
  /// 人数文本
  pub count_text: String,
  /// 拥挤程度文本
  pub occupancy_text: String,
}

impl Default for DisplayState {
  fn default() -> Self {
    DisplayState {
      input_preview: placeholder_preview(),
      result_preview: placeholder_preview(),
      count_text: INITIAL_COUNT_TEXT.to_string(),
      occupancy_text: INITIAL_OCCUPANCY_TEXT.to_string(),
    }
  }
}

fn placeholder_preview() -> RgbImage {
  RgbImage::from_pixel(PREVIEW_SIZE, PREVIEW_SIZE, Rgb(PLACEHOLDER_COLOR))
}

/// 把图像拉伸为固定尺寸的预览，不保留纵横比。
fn stretch_preview(image: &RgbImage) -> RgbImage {
  image::imageops::resize(image, PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Triangle)
}

struct SelectedImage {
  path: PathBuf,
  image: RgbImage,
}

/// 一次交互会话：持有当前选择的图像与显示状态。
/// 两个触发入口分别是 [`Session::select_image`] 与 [`Session::run_detection`]。
pub struct Session {
  selected: Option<SelectedImage>,
  display: DisplayState,
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}

impl Session {
  pub fn new() -> Self {
    Session {
      selected: None,
      display: DisplayState::default(),
    }
  }

  pub fn display(&self) -> &DisplayState {
    &self.display
  }

  pub fn selected_path(&self) -> Option<&Path> {
    self.selected.as_ref().map(|selected| selected.path.as_path())
  }

  /// 选择一张图像作为后续检测的输入。加载成功后更新输入预览，
  /// 加载失败则保持会话状态不变。
  pub fn select_image(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
    let path = path.into();
    let image = load_image(&path)?;
    info!("已选择图像: {}", path.display());

    self.display.input_preview = stretch_preview(&image);
    self.selected = Some(SelectedImage { path, image });

    Ok(())
  }

  /// 对当前选择的图像执行检测，并在成功后更新显示状态。
  pub fn run_detection(
    &mut self,
    detector: &dyn Detector,
    config: &PipelineConfig,
  ) -> Result<DetectionReport, SessionError> {
    let Some(selected) = self.selected.as_ref() else {
      warn!("未选择图像，忽略检测请求");
      return Err(SessionError::NoImageSelected);
    };

    let report =
      run_detection(&selected.image, detector, config).map_err(SessionError::Detect)?;

    // 只有完整成功后才更新显示状态
    self.display.result_preview = stretch_preview(&report.annotated);
    self.display.count_text = report.count.to_string();
    self.display.occupancy_text = report.level.to_string();

    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frame::LetterboxFrame;
  use crate::model::{Detection, StubDetector};

  struct FailingDetector;

  impl Detector for FailingDetector {
    fn detect(
      &self,
      _frame: &LetterboxFrame,
      _confidence_threshold: f32,
    ) -> anyhow::Result<Vec<Detection>> {
      anyhow::bail!("推理后端不可用")
    }
  }

  fn saved_scene(dir: &tempfile::TempDir, count_hint: u32) -> PathBuf {
    let path = dir.path().join(format!("scene-{count_hint}.png"));
    let image = RgbImage::from_pixel(640, 480, Rgb([255, 255, 255]));
    image.save(&path).unwrap();
    path
  }

  #[test]
  fn initial_display_shows_placeholders() {
    let session = Session::new();
    let display = session.display();

    assert_eq!(display.count_text, "0");
    assert_eq!(display.occupancy_text, "N/A");
    assert_eq!(
      display.input_preview.dimensions(),
      (PREVIEW_SIZE, PREVIEW_SIZE)
    );
    assert_eq!(
      *display.input_preview.get_pixel(0, 0),
      Rgb(PLACEHOLDER_COLOR)
    );
    assert_eq!(
      *display.result_preview.get_pixel(150, 150),
      Rgb(PLACEHOLDER_COLOR)
    );
    assert!(session.selected_path().is_none());
  }

  #[test]
  fn select_with_missing_file_leaves_session_unchanged() {
    let mut session = Session::new();
    let result = session.select_image("/no/such/scene.png");

    assert!(matches!(result, Err(SessionError::ImageLoad(_))));
    assert!(session.selected_path().is_none());
    assert_eq!(
      *session.display().input_preview.get_pixel(0, 0),
      Rgb(PLACEHOLDER_COLOR)
    );
  }

  #[test]
  fn select_updates_input_preview_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved_scene(&dir, 0);

    let mut session = Session::new();
    session.select_image(&path).unwrap();

    assert_eq!(session.selected_path(), Some(path.as_path()));
    let display = session.display();
    assert_eq!(
      display.input_preview.dimensions(),
      (PREVIEW_SIZE, PREVIEW_SIZE)
    );
    assert_eq!(*display.input_preview.get_pixel(0, 0), Rgb([255, 255, 255]));
    // 检测相关的显示保持初始值
    assert_eq!(display.count_text, "0");
    assert_eq!(display.occupancy_text, "N/A");
    assert_eq!(
      *display.result_preview.get_pixel(0, 0),
      Rgb(PLACEHOLDER_COLOR)
    );
  }

  #[test]
  fn detection_without_selection_is_rejected() {
    let mut session = Session::new();
    let detector = StubDetector::empty();
    let result = session.run_detection(&detector, &PipelineConfig::default());

    assert!(matches!(result, Err(SessionError::NoImageSelected)));
    assert_eq!(session.display().count_text, "0");
    assert_eq!(session.display().occupancy_text, "N/A");
  }

  #[test]
  fn empty_scene_detection_updates_display() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved_scene(&dir, 0);

    let mut session = Session::new();
    session.select_image(&path).unwrap();

    let detector = StubDetector::empty();
    let report = session
      .run_detection(&detector, &PipelineConfig::default())
      .unwrap();

    assert_eq!(report.count, 0);
    let display = session.display();
    assert_eq!(display.count_text, "0");
    assert_eq!(display.occupancy_text, "Low");
    // 空场景的标注图与原图一致，预览为白色
    assert_eq!(*display.result_preview.get_pixel(0, 0), Rgb([255, 255, 255]));
  }

  #[test]
  fn failed_detection_keeps_previous_display() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved_scene(&dir, 10);

    let mut session = Session::new();
    session.select_image(&path).unwrap();

    let detector = StubDetector::with_count(10);
    session
      .run_detection(&detector, &PipelineConfig::default())
      .unwrap();
    assert_eq!(session.display().count_text, "10");
    assert_eq!(session.display().occupancy_text, "Medium");

    let result = session.run_detection(&FailingDetector, &PipelineConfig::default());
    assert!(matches!(result, Err(SessionError::Detect(_))));
    // 失败不回退也不清空，显示保持上一次成功的结果
    assert_eq!(session.display().count_text, "10");
    assert_eq!(session.display().occupancy_text, "Medium");
  }
}
