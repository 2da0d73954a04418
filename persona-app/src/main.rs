use anyhow::Result;
use clap::Parser;
use persona_app::{Cli, Pipeline};
use persona_common::init_logging;
use persona_config::SettingsLoader;
use persona_social::ExhaustionPolicy;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logging = init_logging(cli.log_config())?;
    tracing::info!(log = %logging.path().display(), settings = %cli.settings.display(), "persona.start");

    // No settings, no run: report and stop before touching the network.
    let settings = match SettingsLoader::new().with_file(&cli.settings).load() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = ?err, "persona.settings.rejected");
            println!("{err}");
            logging.flush();
            std::process::exit(0);
        }
    };

    let mut pipeline = Pipeline::new(&settings);
    if cli.stop_on_empty_page {
        pipeline = pipeline.with_policy(ExhaustionPolicy::StopOnEmptyPage);
    }

    let summary = pipeline.run(&mut std::io::stdout()).await?;
    tracing::info!(posts = summary.posts, "persona.done");
    logging.flush();
    Ok(())
}
