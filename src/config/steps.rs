use serde::Deserialize;

use crate::config::ConfigError;

const STEPS_JSON: &str = include_str!("../assets/steps.json");

/// 步骤元数据（从 steps.json 读取）
#[derive(Debug, Clone, Deserialize)]
pub struct StepMeta {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// steps.json 顶层结构，顺序即执行顺序
#[derive(Debug, Clone, Deserialize)]
pub struct StepsConfig {
    pub steps: Vec<StepMeta>,
}

pub fn load_steps_config() -> Result<StepsConfig, ConfigError> {
    let config: StepsConfig = serde_json::from_str(STEPS_JSON)?;
    Ok(config)
}
