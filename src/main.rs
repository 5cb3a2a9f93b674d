use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::Path;
use thyroid_risk::config::cli::{BatchArgs, Command, PredictArgs};
use thyroid_risk::core::{batch, presenter};
use thyroid_risk::utils::logger;
use thyroid_risk::{CliConfig, FeatureSchema, PredictionEngine, RiskError, RiskSettings};

const TEXT_BAR_WIDTH: usize = 40;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 設定檔錯誤時 logger 尚未初始化，直接輸出到 stderr
    let file = match config.file_config() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    let verbose = config.verbose(&file);
    if config.json_logs(&file) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting thyroid-risk CLI");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let outcome = match &config.command {
        Command::Schema => print_schemas(config.schema_id(&file)),
        command => match config.settings(&file) {
            Ok(settings) => match command {
                Command::Predict(args) => run_predict(&settings, args).await,
                Command::Batch(args) => run_batch(&settings, args).await,
                Command::Schema => Ok(()),
            },
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = outcome {
        match e.downcast_ref::<RiskError>() {
            Some(risk_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    risk_error,
                    risk_error.category(),
                    risk_error.severity()
                );
                eprintln!("❌ {}", risk_error.user_friendly_message());
                eprintln!("💡 Suggestion: {}", risk_error.recovery_suggestion());
                std::process::exit(risk_error.exit_code());
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_schemas(selected: Option<&str>) -> anyhow::Result<()> {
    match selected {
        Some(id) => print!("{}", FeatureSchema::by_id(id)?),
        None => {
            for schema in FeatureSchema::all() {
                println!("{}", schema);
            }
        }
    }
    Ok(())
}

async fn run_predict(settings: &RiskSettings, args: &PredictArgs) -> anyhow::Result<()> {
    let engine = PredictionEngine::from_config(settings)?;
    let schema = engine.collector().schema();

    let prediction = engine.predict(&args.inputs()).await?;
    let report = presenter::PredictionReport::new(
        &prediction.model_name,
        &prediction.features,
        &prediction.result,
    );

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        println!("Thyroid Cancer Recurrence Prediction ({})", schema.id);
        for line in presenter::summary_lines(&prediction.result) {
            println!("{}", line);
        }
        println!();
        for line in presenter::bar_chart_text(&prediction.result, TEXT_BAR_WIDTH) {
            println!("{}", line);
        }
    }

    if let Some(path) = &settings.chart_path {
        let svg = presenter::bar_chart_svg(
            &prediction.result,
            settings.chart_width,
            settings.chart_height,
        );
        write_output(path, svg.as_bytes())
            .with_context(|| format!("failed to write chart to {}", path))?;
        tracing::info!("📁 Chart saved to: {}", path);
    }

    if let Some(path) = &settings.report_path {
        write_output(path, report.to_json_pretty()?.as_bytes())
            .with_context(|| format!("failed to write report to {}", path))?;
        tracing::info!("📁 Report saved to: {}", path);
    }

    Ok(())
}

async fn run_batch(settings: &RiskSettings, args: &BatchArgs) -> anyhow::Result<()> {
    let engine = PredictionEngine::from_config(settings)?;

    let input = std::fs::File::open(&args.input)
        .with_context(|| format!("failed to open batch input {}", args.input))?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            ensure_parent(path)?;
            Box::new(
                std::fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path))?,
            )
        }
        None => Box::new(std::io::stdout()),
    };

    let summary = batch::score_csv(&engine, input, output).await?;
    eprintln!(
        "✅ Scored {} of {} rows ({} rejected)",
        summary.scored, summary.rows, summary.rejected
    );
    Ok(())
}

fn ensure_parent(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_output(path: &str, data: &[u8]) -> std::io::Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, data)
}
