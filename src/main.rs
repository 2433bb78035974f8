//! 岛屿生成命令行。
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   生成配置 JSON（默认使用内置 generation.json）
//!   --seed <SEED>     覆盖种子（同时关闭随机种子）
//!   --random-seed     使用随机种子
//!   --width <W>       覆盖宽度
//!   --height <H>      覆盖高度
//!   --out <PATH>      预览 PNG 输出路径（默认 island.png）
//!   --scale <N>       每格像素数（默认 8）
//!   --events <PATH>   额外写出 JSON 事件日志
//!
//! 生成报告以 JSON 打印到标准输出。

use std::path::PathBuf;
use std::str::FromStr;
use std::process::ExitCode;

use lian_isle::config::generation::{load_default_generation_config, load_generation_config};
use lian_isle::config::palette::load_palette_config;
use lian_isle::core::logging;
use lian_isle::generation::{generate_with_params, RecordingSink, TeeSink, TileSink};
use lian_isle::rendering::{write_event_log, CanvasSink, ExportError, Palette};
use lian_isle::Error;

const DEFAULT_OUT: &str = "island.png";
const DEFAULT_SCALE: u32 = 8;

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Error> {
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => load_generation_config(&PathBuf::from(path))?,
        None => load_default_generation_config()?,
    };
    if let Some(seed) = parse_arg::<u64>(args, "--seed") {
        config.seed = seed;
        config.use_random_seed = false;
    }
    if has_flag(args, "--random-seed") {
        config.use_random_seed = true;
    }
    if let Some(width) = parse_arg::<u32>(args, "--width") {
        config.width = width;
    }
    if let Some(height) = parse_arg::<u32>(args, "--height") {
        config.height = height;
    }

    let out = PathBuf::from(parse_str_arg(args, "--out").unwrap_or_else(|| DEFAULT_OUT.to_string()));
    let mut scale = parse_arg::<u32>(args, "--scale").unwrap_or(DEFAULT_SCALE);
    if scale == 0 {
        log::warn!("--scale 必须 > 0，改用 1");
        scale = 1;
    }
    let events_path = parse_str_arg(args, "--events").map(PathBuf::from);

    let params = config.resolve()?;
    let palette = Palette::from_config(&load_palette_config()?);
    let mut canvas = CanvasSink::new(params.width, params.height, palette);
    let mut recording = events_path.as_ref().map(|_| RecordingSink::new());

    let outcome = {
        let mut sinks: Vec<&mut dyn TileSink> = vec![&mut canvas];
        if let Some(r) = recording.as_mut() {
            sinks.push(r);
        }
        generate_with_params(&params, &mut TeeSink::new(sinks))?
    };

    canvas.save_png(&out, scale)?;
    log::info!("预览图已保存: {} ({} 个装饰物)", out.display(), canvas.prop_count());

    if let (Some(path), Some(recording)) = (&events_path, &recording) {
        write_event_log(recording, path)?;
        log::info!("事件日志已保存: {} ({} 条)", path.display(), recording.events.len());
    }

    let report = outcome.report.to_json().map_err(ExportError::from)?;
    println!("{report}");
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// 解析 `flag` 后面的值；给了 flag 但值缺失或无法解析时告警并忽略
fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    let raw = parse_str_arg(args, flag)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("{flag} 的值 {raw:?} 无法解析，已忽略");
            None
        }
    }
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    let i = args.iter().position(|a| a == flag)?;
    let value = args.get(i + 1).cloned();
    if value.is_none() {
        log::warn!("{flag} 缺少参数值，已忽略");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_args_parse_or_are_ignored() {
        assert_eq!(parse_arg::<u64>(&args(&["isle", "--seed", "7"]), "--seed"), Some(7));
        assert_eq!(parse_arg::<u64>(&args(&["isle", "--seed", "abc"]), "--seed"), None);
        assert_eq!(parse_arg::<u32>(&args(&["isle", "--width", "-3"]), "--width"), None);
        assert_eq!(parse_arg::<u32>(&args(&["isle", "--width"]), "--width"), None);
        assert_eq!(parse_arg::<u32>(&args(&["isle"]), "--width"), None);
    }

    #[test]
    fn string_args_take_the_next_token() {
        let a = args(&["isle", "--out", "map.png", "--random-seed"]);
        assert_eq!(parse_str_arg(&a, "--out").as_deref(), Some("map.png"));
        assert!(has_flag(&a, "--random-seed"));
        assert!(!has_flag(&a, "--events"));
    }
}
