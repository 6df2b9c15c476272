//! Project brief: the structured user input describing the desired video.

use crate::error::{DreamCrewError, Result};
use serde::{Deserialize, Serialize};

/// Industry presets offered by the brief form.
pub const INDUSTRIES: &[&str] = &[
    "通用科技 (General Tech)",
    "航空航天 (Aerospace)",
    "机器人 (Robotics)",
    "自动驾驶 (Autonomous Driving)",
    "集成电路/芯片 (IC/Chips)",
    "生物医药 (BioTech)",
    "新能源 (New Energy)",
    "量子计算 (Quantum Computing)",
    "智慧城市 (Smart City)",
];

/// Visual style presets.
pub const VISUAL_STYLES: &[&str] = &[
    "未来主义 / 赛博朋克 (Futuristic)",
    "极简科技 / 苹果风 (Minimalist Tech)",
    "硬核工业 / 机械感 (Industrial)",
    "人文纪录 / 温暖 (Documentary)",
    "数据可视化 / 抽象 (Data Viz)",
    "3D 动画 / 概念演示 (3D Concept)",
    "国潮 / 东方美学 (Oriental)",
];

/// Output/usage format presets. Everything past the first entry implies
/// special hardware the interaction-tech persona must weigh in on.
pub const USAGE_FORMATS: &[&str] = &[
    "标准屏幕 / 手机 / PC (Standard 16:9)",
    "大型 LED 大屏 (Large LED Wall)",
    "沉浸式折幕 / L幕 (Immersive L-Shape)",
    "数字沙盘 (Digital Sand Table)",
    "展厅互动展墙 (Interactive Wall)",
    "球幕 / 环幕 (Dome / 360 Ring)",
    "全息投影 (Hologram)",
];

/// Requested shot-count bands.
pub const SHOT_COUNTS: &[&str] = &[
    "10-15 镜 (精简 / 节奏快)",
    "20-25 镜 (标准 / 叙事完整)",
    "30-40 镜 (细腻 / 深度展示)",
    "50+ 镜 (电影级 / 复杂分镜)",
];

/// Default target duration for a new project.
pub const DEFAULT_DURATION: &str = "3 分钟 (标准展项演示)";

/// Structured user input describing the desired video project.
///
/// All fields are required before the project can advance to the discussion
/// step; there are no cross-field invariants beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brief {
    pub industry: String,
    pub topic: String,
    pub content_details: String,
    pub target_audience: String,
    pub visual_style: String,
    /// Target duration of the final video
    pub duration: String,
    pub key_message: String,
    /// Output carrier (LED wall, sand table, ...)
    pub usage_format: String,
    /// Requested shot-count band, one of [`SHOT_COUNTS`]
    pub shot_count: String,
}

impl Default for Brief {
    fn default() -> Self {
        Self {
            industry: INDUSTRIES[0].to_string(),
            topic: String::new(),
            content_details: String::new(),
            target_audience: String::new(),
            visual_style: VISUAL_STYLES[0].to_string(),
            duration: DEFAULT_DURATION.to_string(),
            key_message: String::new(),
            usage_format: USAGE_FORMATS[0].to_string(),
            shot_count: SHOT_COUNTS[1].to_string(),
        }
    }
}

impl Brief {
    /// Checks that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`DreamCrewError::IncompleteBrief`] naming the first empty
    /// field.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, &str); 9] = [
            ("industry", &self.industry),
            ("topic", &self.topic),
            ("content_details", &self.content_details),
            ("target_audience", &self.target_audience),
            ("visual_style", &self.visual_style),
            ("duration", &self.duration),
            ("key_message", &self.key_message),
            ("usage_format", &self.usage_format),
            ("shot_count", &self.shot_count),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DreamCrewError::IncompleteBrief { field: name });
            }
        }
        Ok(())
    }

    /// Parses the numeric band out of the chosen shot-count option.
    ///
    /// "20-25 镜 (标准)" yields `(20, 25)`; open-ended bands like "50+ 镜"
    /// yield `(50, 80)`. Unparsable input falls back to the standard band.
    pub fn shot_count_band(&self) -> (u32, u32) {
        let digits_end = self
            .shot_count
            .find(|c: char| !c.is_ascii_digit() && c != '-' && c != '+')
            .unwrap_or(self.shot_count.len());
        let band = &self.shot_count[..digits_end];

        if let Some(lower) = band.strip_suffix('+') {
            if let Ok(lo) = lower.parse::<u32>() {
                return (lo, lo + 30);
            }
        }
        if let Some((lo, hi)) = band.split_once('-') {
            if let (Ok(lo), Ok(hi)) = (lo.parse::<u32>(), hi.parse::<u32>()) {
                return (lo, hi);
            }
        }
        if let Ok(exact) = band.parse::<u32>() {
            return (exact, exact);
        }
        (20, 25)
    }

    /// Whether the chosen usage format implies special hardware
    /// (anything beyond a standard flat screen).
    pub fn requires_special_hardware(&self) -> bool {
        const HARDWARE_MARKERS: &[&str] =
            &["LED", "沙盘", "折幕", "互动展墙", "球幕", "环幕", "全息"];
        HARDWARE_MARKERS
            .iter()
            .any(|marker| self.usage_format.contains(marker))
    }
}
