//! Prediksi - Main Entry Point

use clap::Parser;
use prediksi::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prediksi=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            data,
            model,
            variant,
        }) => {
            cmd_serve(&host, port, data, model, variant).await?;
        }
        Some(Commands::Predict {
            data,
            model,
            variant,
            input,
            batch,
            output,
        }) => {
            cmd_predict(
                &data,
                &model,
                &variant,
                input.as_deref(),
                batch.as_deref(),
                output.as_deref(),
            )?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        None => {
            // Launching with no arguments brings up the form
            cmd_serve("0.0.0.0", 8080, None, None, None).await?;
        }
    }

    Ok(())
}
