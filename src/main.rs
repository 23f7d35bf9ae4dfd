use checkers_gui::config::{Cli, GuiConfig};
use checkers_gui::protocol::Decoder;
use checkers_gui::session::Session;
use checkers_gui::ui::{self, TerminalPresenter, UiExit, UiRequest};
use checkers_gui::{lifecycle, logging};
use clap::Parser;
use std::sync::{mpsc, Arc};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GuiConfig::from_cli(&cli)?;
    logging::init(&config.log_file, &config.log_filter)?;
    info!(?config, "checkers-gui starting");

    let session = Arc::new(Session::new(config.style));
    let (tx, rx) = mpsc::channel::<UiRequest>();

    let ui_session = Arc::clone(&session);
    let initial_status = config.initial_status.clone();
    let ui_handle = std::thread::spawn(move || {
        match ui::run(&ui_session, rx, initial_status) {
            Ok(UiExit::Closed) => {
                // ウィンドウを閉じたら親も終わらせる
                lifecycle::terminate_parent(ui_session.parent_pid());
                std::process::exit(0);
            }
            Ok(UiExit::Shutdown) => {}
            Err(e) => {
                error!(error = %e, "terminal UI failed");
                std::process::exit(1);
            }
        }
    });

    let mut decoder = Decoder::new(
        Arc::clone(&session),
        TerminalPresenter::new(tx.clone()),
        tokio::io::stdout(),
    )
    .with_poll_interval(config.poll_interval())
    .with_initial_status(config.initial_status.clone());

    let res = decoder.run(BufReader::new(tokio::io::stdin())).await;
    if let Err(e) = &res {
        error!(error = %e, "decoder stopped");
    }

    let _ = tx.send(UiRequest::Shutdown);
    if ui_handle.join().is_err() {
        error!("UI thread panicked");
    }
    res
}
