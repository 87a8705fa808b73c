use clap::Parser;
use sheet_checklist::core::display::{detail_fields, display_name};
use sheet_checklist::core::export::export_records;
use sheet_checklist::core::mapper::SelectionForm;
use sheet_checklist::domain::model::NormalizedRecord;
use sheet_checklist::utils::logger;
use sheet_checklist::{
    AppConfig, ChecklistEngine, ChecklistError, CliConfig, Command, FileStore, HttpSheetSource,
};
use std::io::{BufRead, Write};

type Engine = ChecklistEngine<FileStore, HttpSheetSource>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.app_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let store = FileStore::new(config.storage.data_dir.clone());
    let source = HttpSheetSource::new(&config.http)?;
    let engine = ChecklistEngine::new(store, source);

    if let Err(e) = run(&engine, &config, cli.command).await {
        if e.is_user_error() {
            tracing::debug!("Command rejected: {:?}", e);
        } else {
            tracing::error!("❌ Command failed: {}", e);
        }

        eprintln!("❌ {}", e);
        if let ChecklistError::SelectionIncomplete(errors) = &e {
            eprintln!("   Missing: {}", errors);
        }
        eprintln!("💡 {}", e.recovery_suggestion());

        // 使用者錯誤回傳 1，系統錯誤回傳 2
        std::process::exit(if e.is_user_error() { 1 } else { 2 });
    }

    Ok(())
}

async fn run(engine: &Engine, config: &AppConfig, command: Command) -> sheet_checklist::Result<()> {
    match command {
        Command::Load { link } => {
            let rows = engine.submit_link(&link).await?;
            if rows == 0 {
                println!("⚠️ No rows were loaded. The sheet may be empty or could not be downloaded.");
            } else {
                println!("✅ Loaded {} rows", rows);
            }
            println!("Next: run `columns`, then `map`");
        }
        Command::Columns => {
            for header in engine.headers()? {
                println!("{}", header);
            }
        }
        Command::Map {
            name,
            split,
            first_name,
            last_name,
            keep,
        } => {
            let mut form = SelectionForm::new().keep(keep);
            form.set_split_name(split);
            if split {
                if name.is_some() {
                    tracing::warn!("--name is ignored together with --split");
                }
                form.set_first_name(first_name.unwrap_or_default());
                form.set_last_name(last_name.unwrap_or_default());
            } else {
                if first_name.is_some() || last_name.is_some() {
                    tracing::warn!("--first-name/--last-name need --split and are ignored");
                }
                form.set_name(name.unwrap_or_default());
            }

            let mapped = engine.apply_selection(&form)?;
            println!("✅ Mapped {} rows", mapped.len());
            print_preview(&mapped, config.preview.rows);
            println!("Has the data been loaded correctly? Run `list` to continue or `map` again to change columns.");
        }
        Command::Preview { rows, row } => {
            let preview = engine.preview(rows.unwrap_or(config.preview.rows))?;
            match row {
                Some(row_id) => {
                    let record = preview
                        .iter()
                        .find(|r| r.row_id == row_id)
                        .ok_or(ChecklistError::RecordNotFound(row_id))?;
                    print_detail(record);
                }
                None => {
                    print_preview(&preview, preview.len());
                    println!("Only the first {} rows have been loaded", preview.len());
                }
            }
        }
        Command::List {
            query,
            unchecked_only,
        } => {
            let checklist = engine.open_checklist()?;
            for record in checklist.filter(&query, unchecked_only) {
                print_row(record);
            }
            println!(
                "{}/{} checked",
                checklist.checked_count(),
                checklist.len()
            );
        }
        Command::Show { row_id } => {
            let checklist = engine.open_checklist()?;
            let record = checklist
                .get(row_id)
                .ok_or(ChecklistError::RecordNotFound(row_id))?;
            print_detail(record);
            println!("checked: {}", if record.check_list { "yes" } else { "no" });
        }
        Command::Toggle { row_id } => {
            let mut checklist = engine.open_checklist()?;
            checklist.toggle(row_id)?;
            if let Some(record) = checklist.get(row_id) {
                print_row(record);
            }
        }
        Command::Export { format, output } => {
            let checklist = engine.open_checklist()?;
            let rendered = export_records(checklist.records(), format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!("📁 Exported {} rows to {}", checklist.len(), path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Command::Clear { yes } => {
            if !yes && !confirm("This will clear all data. Confirm? [y/N] ")? {
                println!("Cancelled");
                return Ok(());
            }
            engine.repository().clear_all()?;
            println!("🗑️ All data cleared");
        }
        Command::Status => {
            let repo = engine.repository();
            let url = repo.load_source_url()?;
            let raw_rows = repo.load_raw_records()?.map(|r| r.len());
            let checklist = engine.open_checklist()?;

            println!("link:      {}", url.as_deref().unwrap_or("-"));
            println!(
                "rows:      {}",
                raw_rows.map_or_else(|| "-".to_string(), |n| n.to_string())
            );
            println!(
                "checklist: {}/{} checked",
                checklist.checked_count(),
                checklist.len()
            );
            println!("screen:    {}", engine.current_screen()?);
        }
    }

    Ok(())
}

fn print_row(record: &NormalizedRecord) {
    let mark = if record.check_list { "x" } else { " " };
    println!("[{}] {:>4}  {}", mark, record.row_id, display_name(record));
}

fn print_preview(records: &[NormalizedRecord], rows: usize) {
    for record in records.iter().take(rows) {
        println!("{:>4}  {}", record.row_id, display_name(record));
    }
}

fn print_detail(record: &NormalizedRecord) {
    for (label, value) in detail_fields(record) {
        println!("{}: {}", label, value);
    }
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
