use clap::Parser;
use echem_opt::{cli, config, error, interactive, render};
use echem_opt_common::{load_preview_from_path, FormModel, Session, Technique};
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Session { upload, output, format, metal, technique } => {
            let form = FormModel::new(
                metal.unwrap_or(config.default_metal_ion),
                technique.unwrap_or(config.default_technique),
            );
            let session = Session::new(form).with_preview_rows(config.preview_rows);
            let output_dir = config.resolve_output_dir(output.as_deref());
            log::debug!("output dir: {}, format: {}", output_dir.display(), format);

            interactive::run_session(session, upload.as_deref(), &output_dir, format)?;
        }

        Commands::Preview { file, rows } => {
            if !file.exists() {
                return Err(error::EchemOptError::FileNotFound(file.display().to_string()));
            }

            let rows = rows.unwrap_or(config.preview_rows).max(1);
            let preview = load_preview_from_path(&file, rows)?;
            println!("📄 {} ({}列, {}行)\n", preview.file_name, preview.columns.len(), preview.total_rows);
            println!("{}", render::format_preview(&preview));
        }

        Commands::Fields { technique } => {
            let techniques: Vec<Technique> = match technique {
                Some(t) => vec![t],
                None => Technique::ALL.to_vec(),
            };
            for technique in techniques {
                println!("{}\n", render::format_fields(technique));
            }
        }

        Commands::Config { set_output_dir, set_preview_rows, set_metal, set_technique, show } => {
            let mut config = config;

            if let Some(dir) = set_output_dir {
                config.set_output_dir(dir)?;
                println!("✔ 出力ディレクトリを設定しました");
            }

            if let Some(rows) = set_preview_rows {
                config.set_preview_rows(rows)?;
                println!("✔ プレビュー行数を設定しました");
            }

            if set_metal.is_some() || set_technique.is_some() {
                if let Some(metal) = set_metal {
                    config.default_metal_ion = metal;
                }
                if let Some(technique) = set_technique {
                    config.default_technique = technique;
                }
                config.save()?;
                println!("✔ 既定の選択を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!(
                    "  出力ディレクトリ: {}",
                    config.output_dir.as_ref().map(|d| d.display().to_string()).unwrap_or_else(|| "(カレント)".into())
                );
                println!("  プレビュー行数: {}", config.preview_rows);
                println!("  既定の重金属イオン: {}", config.default_metal_ion);
                println!("  既定の測定手法: {}", config.default_technique);
            }
        }
    }

    Ok(())
}
