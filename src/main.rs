use ai_test_harness::cli::commands::{cmd_analyze, cmd_generate, cmd_run};
use ai_test_harness::cli::config::{Cli, Commands};
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output_dir,
            platform,
        } => {
            let all_clean = cmd_run(
                &config,
                &output_dir,
                &platform,
                cli.verbose,
                cli.trace.as_deref(),
            )?;
            if !all_clean {
                std::process::exit(1);
            }
        }
        Commands::Analyze { input, output_dir } => {
            let no_critical = cmd_analyze(&input, &output_dir, cli.verbose)?;
            if !no_critical {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            elements,
            app_type,
            output_dir,
        } => {
            cmd_generate(&elements, &app_type, &output_dir, cli.verbose)?;
        }
    }

    Ok(())
}
