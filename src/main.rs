use clap::Parser;
use std::process;
use txtexport::{Cli, OutputFormatter, OutputMode, TxtExport, TxtExportError, UserFriendlyError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let txtexport = match TxtExport::from_cli(&cli) {
        Ok(txtexport) => txtexport,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&txtexport);
    }

    match txtexport.export() {
        Ok(report) => {
            txtexport.output_formatter().print_export_summary(&report);

            if report.errors.is_empty() {
                0
            } else {
                2 // Success with warnings
            }
        }
        Err(e) => {
            txtexport.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &TxtExportError) -> i32 {
    match error {
        TxtExportError::ManifestMissing { .. } => 3,
        TxtExportError::Config { .. } => 4,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "txtexport.toml".to_string());

    match TxtExport::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  txtexport --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(txtexport: &TxtExport) -> i32 {
    let formatter = txtexport.output_formatter();
    let config = txtexport.config();
    let settings = config.export_settings();

    formatter.print_header("Dry run - no files will be written");
    formatter.detail("Mode", &config.output.mode.to_string());
    formatter.detail("Base directory", &settings.base_dir.display().to_string());
    formatter.detail("Manifest", &settings.manifest_path.display().to_string());
    formatter.detail("Output directory", &settings.output_dir.display().to_string());
    formatter.print_separator();

    match txtexport.dry_run() {
        Ok(plan) => {
            let files: usize = plan.iter().map(|(_, resolved)| resolved.files().len()).sum();
            let missing = plan.iter().filter(|(_, resolved)| resolved.is_missing()).count();
            formatter.print_separator();
            formatter.success(&format!(
                "{} files would be exported ({} entries not found)",
                files, missing
            ));
            0
        }
        Err(e) => {
            txtexport.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn print_startup_error(error: &TxtExportError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
