use anyhow::Result;
use std::thread;
use std::time::Duration;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::archive::ArchiveManager;
use crate::core::{setup, CheckerRegistry};
use crate::lsp::backend::Backend;
use crate::Config;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;
    config.init_logging();

    let mut checkers = CheckerRegistry::new();
    setup(&mut checkers);

    // Archives are loaded once the client sends `initialized`
    let archive_manager = ArchiveManager::new(&config);

    // Under the integration test, exit after a short delay so the test can read stdout to EOF
    if std::env::var("PKGREQ_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    log::info!("Starting pkgreq-ls with archive dirs {:?}", config.archive_dirs);

    let (service, socket) = LspService::build(move |client| {
        Backend::new(client, config, archive_manager, checkers)
    })
    .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
