//! longpress - 키릴 소수 언어 자판의 길게 누르기 후보 순위 계산

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use longpress::config::{load_config, save_config};
use longpress::pipeline::{execute, PipelineError, PipelineInputs};

/// 인구 가중 변형 순위 계산
#[derive(Parser, Debug)]
#[command(name = "longpress", version, about)]
struct Cli {
    /// 인구(화자 수) 표 (CSV 또는 JSON)
    #[arg(long, required_unless_present = "dump_config")]
    population: Option<PathBuf>,

    /// 언어별 문자 빈도 표 (CSV 또는 JSON)
    #[arg(long, required_unless_present = "dump_config")]
    frequencies: Option<PathBuf>,

    /// 기준 문자 → 변형 매핑 표, 또는 언어별 키 매핑 JSON 디렉터리
    #[arg(long, required_unless_present = "dump_config")]
    mapping: Option<PathBuf>,

    /// 출력 디렉터리
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// 설정 파일 (없으면 기본값)
    #[arg(long, default_value = "longpress.json")]
    config: PathBuf,

    /// 현재 설정을 이 경로에 저장하고 종료
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    // 로깅 초기화 (기본 info)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("오류: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = load_config(&cli.config)?;

    if let Some(path) = &cli.dump_config {
        save_config(&config, path)?;
        log::info!("설정 저장: {}", path.display());
        return Ok(());
    }

    let inputs = PipelineInputs::from_paths(cli.population, cli.frequencies, cli.mapping)?;

    let output = execute(&inputs, &config, &cli.out_dir)?;
    let diagnostics = &output.diagnostics;
    if !diagnostics.missing_population.is_empty() {
        log::warn!("인구 항목이 없는 언어: {}", diagnostics.missing_population.join(", "));
    }
    if !diagnostics.out_of_band.is_empty() {
        log::warn!("Σf가 범위를 벗어난 언어: {}", diagnostics.out_of_band.join(", "));
    }
    log::info!(
        "완료: 변형 {}개, 기준 문자 {}개, 충돌 {}개 → {}",
        output.weights.len(),
        output.groups.len(),
        output.conflicts.len(),
        cli.out_dir.display()
    );
    Ok(())
}
