// 该文件是 Renhai （人海） 项目的一部分。
// src/main.rs - 项目主程序
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
use clap::Parser;

use renhai::model::create_detector;
use renhai::output::save_annotated_image;
use renhai::session::Session;
use renhai::task::PipelineConfig;

/// Renhai 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测器（ONNX 模型文件路径或桩检测器）
  /// 支持格式:
  /// - ONNX 模型: *.onnx
  /// - 桩检测器: stub 或 stub:<人数>
  #[arg(long, default_value = "yolov8s.onnx", value_name = "MODEL")]
  pub model: String,

  /// 输入图像文件路径
  #[arg(long, value_name = "FILE")]
  pub input: String,

  /// 标注图像的保存路径（可选）
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<String>,

  /// 置信度阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.3", value_name = "THRESHOLD")]
  pub confidence: f32,

  /// letterbox 目标边长（像素）
  #[arg(long, default_value = "640", value_name = "SIZE")]
  pub target_size: u32,

  /// 拥挤度估计的参考图像面积（像素）
  #[arg(long, default_value = "409600", value_name = "AREA")]
  pub image_area: f32,

  /// 单人平均占用面积（像素）
  #[arg(long, default_value = "15000", value_name = "AREA")]
  pub avg_area_per_person: f32,

  /// 以 JSON 形式输出检测报告
  #[arg(long)]
  pub json: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  println!("Renhai 人群检测与拥挤度估计");
  println!("==========================");
  println!("检测器: {}", args.model);
  println!("输入图像: {}", args.input);
  println!("置信度阈值: {}", args.confidence);
  println!();

  // 创建检测器
  println!("正在加载检测器...");
  let detector = create_detector(&args.model)?;
  println!("检测器就绪");

  let config = PipelineConfig {
    target_size: args.target_size,
    confidence_threshold: args.confidence,
    image_area: args.image_area,
    avg_area_per_person: args.avg_area_per_person,
    ..PipelineConfig::default()
  };

  // 选择图像并执行检测
  let mut session = Session::new();
  session.select_image(&args.input)?;
  let report = session.run_detection(detector.as_ref(), &config)?;

  if let Some(output) = &args.output {
    save_annotated_image(&report.annotated, output)?;
    println!("标注图像已保存: {}", output);
  }

  println!();
  println!("检测人数: {}", session.display().count_text);
  println!("拥挤程度: {}", session.display().occupancy_text);

  if args.json {
    let detections: Vec<_> = report
      .detections
      .iter()
      .map(|det| {
        serde_json::json!({
          "bbox": det.bbox,
          "score": det.score,
        })
      })
      .collect();
    let doc = serde_json::json!({
      "input": args.input,
      "count": report.count,
      "occupancy_level": report.level.to_string(),
      "occupancy_percent": report.occupancy_percent,
      "detections": detections,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
  }

  Ok(())
}
