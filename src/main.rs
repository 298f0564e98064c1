//! crd2jsonschema CLI binary

use anyhow::Result;

use crd2jsonschema::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout lists the written files
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crd2jsonschema=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = CliApp::app().get_matches();

    CliApp::run(&matches).await
}
