// 该文件是 Renhai （人海） 项目的一部分。
// src/model/yolov8.rs - YOLOv8 ONNX 模型
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

use std::sync::Mutex;

use anyhow::Context;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::frame::LetterboxFrame;
use crate::model::{Detection, Detector, PERSON_CLASS_ID};

const YOLOV8_NUM_INPUTS: usize = 1;
const YOLOV8_NUM_OUTPUTS: usize = 1;
const YOLOV8_CLASS_NUM: usize = 80;
const YOLOV8_BOX_ATTRS: usize = 4;
const YOLOV8_NMS_IOU: f32 = 0.45;
const YOLOV8_INTRA_THREADS: usize = 2;

pub struct Yolov8 {
  session: Mutex<Session>,
  nms_iou: f32,
}

#[derive(Error, Debug)]
pub enum Yolov8Error {
  #[error("模型加载错误: {0}")]
  ModelLoadError(#[from] std::io::Error),
  #[error("ONNX Runtime 错误: {0}")]
  OrtError(#[from] ort::Error),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
}

pub struct Yolov8Builder {
  model_path: String,
  nms_iou: f32,
  intra_threads: usize,
}

impl Yolov8Builder {
  pub fn new(model_path: impl Into<String>) -> Self {
    Yolov8Builder {
      model_path: model_path.into(),
      nms_iou: YOLOV8_NMS_IOU,
      intra_threads: YOLOV8_INTRA_THREADS,
    }
  }

  pub fn nms_iou(mut self, nms_iou: f32) -> Self {
    self.nms_iou = nms_iou;
    self
  }

  pub fn intra_threads(mut self, intra_threads: usize) -> Self {
    self.intra_threads = intra_threads;
    self
  }

  pub fn build(self) -> Result<Yolov8, Yolov8Error> {
    info!("加载模型文件: {}", self.model_path);
    let model_data = std::fs::read(&self.model_path)?;
    debug!(
      "模型文件大小: {:.2} MB",
      model_data.len() as f64 / (1024.0 * 1024.0)
    );

    info!("创建 ONNX Runtime 推理会话");
    let session = Session::builder()?
      .with_optimization_level(GraphOptimizationLevel::Level3)?
      .with_intra_threads(self.intra_threads)?
      .commit_from_memory(&model_data)?;

    let num_inputs = session.inputs.len();
    let num_outputs = session.outputs.len();

    if num_inputs != YOLOV8_NUM_INPUTS {
      error!(
        "预期模型输入数量为 {}, 实际为 {}",
        YOLOV8_NUM_INPUTS, num_inputs
      );
      return Err(Yolov8Error::ModelInvalid(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        YOLOV8_NUM_INPUTS, num_inputs
      )));
    }

    if num_outputs != YOLOV8_NUM_OUTPUTS {
      error!(
        "预期模型输出数量为 {}, 实际为 {}",
        YOLOV8_NUM_OUTPUTS, num_outputs
      );
      return Err(Yolov8Error::ModelInvalid(format!(
        "预期模型输出数量为 {}, 实际为 {}",
        YOLOV8_NUM_OUTPUTS, num_outputs
      )));
    }

    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);
    info!("模型加载完成");

    Ok(Yolov8 {
      session: Mutex::new(session),
      nms_iou: self.nms_iou,
    })
  }
}

impl Detector for Yolov8 {
  fn detect(
    &self,
    frame: &LetterboxFrame,
    confidence_threshold: f32,
  ) -> anyhow::Result<Vec<Detection>> {
    debug!("设置模型输入");
    let size = frame.size() as usize;
    let shape = [1usize, frame.channels(), size, size];
    let tensor =
      Tensor::from_array((shape, frame.as_chw().to_vec().into_boxed_slice()))?.into_dyn();

    debug!("执行模型推理");
    let mut session = self
      .session
      .lock()
      .map_err(|_| anyhow::anyhow!("推理会话锁中毒"))?;
    let outputs = session.run(ort::inputs!["images" => tensor])?;

    debug!("获取模型输出");
    let output = outputs.get("output0").context("模型缺少输出 output0")?;
    let (shape, data) = output.try_extract_tensor::<f32>()?;
    let dims: Vec<usize> = shape.as_ref().iter().map(|&d| d as usize).collect();

    let candidates = decode_output(data, &dims, confidence_threshold, frame)?;
    let detections = nms(candidates, self.nms_iou);
    debug!("检测到 {} 个人", detections.len());

    Ok(detections)
  }
}

/// 解码 YOLOv8 的 [1, 84, N] 输出：按列取出每个候选框的中心点坐标与
/// person 类别分数，过滤低置信度候选并映射回原图坐标。
fn decode_output(
  data: &[f32],
  dims: &[usize],
  confidence_threshold: f32,
  frame: &LetterboxFrame,
) -> Result<Vec<Detection>, Yolov8Error> {
  const ATTRS: usize = YOLOV8_BOX_ATTRS + YOLOV8_CLASS_NUM;

  if dims.len() != 3 || dims[0] != 1 || dims[1] != ATTRS {
    return Err(Yolov8Error::ModelInvalid(format!(
      "预期模型输出形状为 [1, {}, N], 实际为 {:?}",
      ATTRS, dims
    )));
  }

  let num = dims[2];
  if data.len() != ATTRS * num {
    return Err(Yolov8Error::ModelInvalid(format!(
      "模型输出大小不匹配: 期望 {}, 实际 {}",
      ATTRS * num,
      data.len()
    )));
  }

  let mut candidates = Vec::new();
  for i in 0..num {
    let score = data[(YOLOV8_BOX_ATTRS + PERSON_CLASS_ID) * num + i];
    if score < confidence_threshold {
      continue;
    }

    let cx = data[i];
    let cy = data[num + i];
    let w = data[2 * num + i];
    let h = data[3 * num + i];

    let bbox = frame.to_original_box(cx, cy, w, h);
    if bbox[2] <= bbox[0] || bbox[3] <= bbox[1] {
      continue;
    }

    candidates.push(Detection { bbox, score });
  }

  Ok(candidates)
}

fn nms(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
  candidates.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

  let mut kept = Vec::with_capacity(candidates.len());
  while !candidates.is_empty() {
    let best = candidates.remove(0);
    candidates.retain(|det| iou(&best.bbox, &det.bbox) < iou_threshold);
    kept.push(best);
  }

  kept
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
  let x1 = a[0].max(b[0]);
  let y1 = a[1].max(b[1]);
  let x2 = a[2].min(b[2]);
  let y2 = a[3].min(b[3]);

  let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
  let area_a = (a[2] - a[0]) * (a[3] - a[1]);
  let area_b = (b[2] - b[0]) * (b[3] - b[1]);
  let union = area_a + area_b - intersection;

  if union > 0.0 { intersection / union } else { 0.0 }
}
